use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use weather_proxy_core::domain::{Snapshot, SnapshotId};
use weather_proxy_core::{Result, SnapshotStore};

/// PostgreSQL-backed snapshot log.
///
/// Every append is a single `INSERT ... RETURNING`, so concurrent appends
/// rely on the database for isolation and `latest` always observes
/// committed rows.
#[derive(Clone)]
pub struct SnapshotRepository {
    pool: PgPool,
}

impl SnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of stored snapshots
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM weather_snapshots")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("count")?)
    }
}

#[async_trait]
impl SnapshotStore for SnapshotRepository {
    async fn append(&self, payload: &str) -> Result<Snapshot> {
        let row = sqlx::query(
            r#"
            INSERT INTO weather_snapshots (payload, captured_at)
            VALUES ($1, $2)
            RETURNING id, payload, captured_at
            "#,
        )
        .bind(payload)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let snapshot = row_to_snapshot(row)?;
        tracing::debug!(id = %snapshot.id, "Weather snapshot stored");
        Ok(snapshot)
    }

    async fn latest(&self) -> Result<Option<Snapshot>> {
        let row = sqlx::query(
            r#"
            SELECT id, payload, captured_at
            FROM weather_snapshots
            ORDER BY captured_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_snapshot).transpose()
    }

    async fn health_check(&self) -> Result<()> {
        crate::postgres::health_check(&self.pool).await
    }
}

fn row_to_snapshot(row: PgRow) -> Result<Snapshot> {
    let id: i64 = row.try_get("id")?;
    let payload: String = row.try_get("payload")?;
    let captured_at: DateTime<Utc> = row.try_get("captured_at")?;

    Ok(Snapshot::new(SnapshotId(id), payload, captured_at))
}

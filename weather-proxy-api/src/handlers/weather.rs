use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;

use crate::{error::ApiResult, AppState};

/// `GET /weather`: the upstream JSON verbatim, or `204 No Content` when
/// nothing is available.
pub async fn get_current(State(state): State<AppState>) -> ApiResult<Response> {
    // axum drops this future when the client disconnects; the guard turns
    // that drop into cancellation of the fetch cycle
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let response = match state.weather.get_weather_data(&cancel).await? {
        Some(payload) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            payload,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

//! Integration tests against a real PostgreSQL instance.
//!
//! ```sh
//! cargo test -p weather-proxy-storage --test integration_tests --features integration-tests
//! ```

mod integration;

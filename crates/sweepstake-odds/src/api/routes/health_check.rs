use axum::http::StatusCode;
use log::debug;

/// Liveness only, the upstream platform is not contacted
pub async fn health() -> StatusCode {
    debug!("service is up");
    StatusCode::OK
}

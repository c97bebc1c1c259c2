use axum::http::StatusCode;

pub mod content;
pub mod submissions;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

use axum::{Router, http::header, response::IntoResponse, routing::get};

async fn health() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "OK")
}

async fn ping() -> &'static str {
    "pong"
}

/// Liveness routes mounted on every HTTP transport.
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ping", get(ping))
}

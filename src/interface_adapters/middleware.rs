use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

// Static cross-origin policy: any origin, method, and header. The service
// fronts a browser client served from a different origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

// Logs every request with a generated id, once on receipt and once with the
// outcome. The response passes through unaltered.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    tracing::debug!(%request_id, %method, %path, "request received");
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %request_id,
        %method,
        %path,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}

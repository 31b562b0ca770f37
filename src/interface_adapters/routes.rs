use axum::{middleware, routing::get, Router};

use crate::interface_adapters::handlers::{health, root};
use crate::interface_adapters::middleware::{cors_layer, log_requests};
use crate::interface_adapters::state::AppState;

// Versioned API router. Business routes mount here; the health probe is the
// one endpoint the bootstrap itself owns.
fn v1_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn app(state: AppState) -> Router {
    let prefix = state.settings.api_v1_prefix.clone();

    // Layers wrap outside-in as they are added: the request logger goes on
    // last so it is outermost and records every inbound request, CORS
    // preflights included.
    Router::new()
        .route("/", get(root))
        .nest(&prefix, v1_router())
        .layer(cors_layer())
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

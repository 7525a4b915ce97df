use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    handler::{create_message, health_check, list_conversation, websocket_handler},
    state::AppState,
};

/// Build the application router.
///
/// Exposed so integration tests can serve it in-process.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/conversations", post(create_message))
        .route("/api/conversations/{peer_id}", get(list_conversation))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

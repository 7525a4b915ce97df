//! Server bootstrap.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::{
    config::ServerConfig,
    domain::ConversationRepository,
    error::ServerError,
    infrastructure::{
        identity::JwtIdentityGate,
        repository::{InMemoryConversationRepository, JsonlConversationRepository},
    },
};

use super::{router::build_app, signal::shutdown_signal, state::AppState};

/// Wire up storage, the identity gate and the broadcaster from `config`.
pub async fn build_state(config: &ServerConfig) -> Result<Arc<AppState>, ServerError> {
    let conversations: Arc<dyn ConversationRepository> = match &config.data_file {
        Some(path) => Arc::new(JsonlConversationRepository::open(path).await?),
        None => {
            tracing::warn!("No data file configured; conversations are kept in memory only");
            Arc::new(InMemoryConversationRepository::new())
        }
    };
    let identity_gate = Arc::new(JwtIdentityGate::new(&config.jwt_secret));

    Ok(Arc::new(AppState::new(conversations, identity_gate)))
}

/// Run the server until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config).await?;
    let broadcaster = state.broadcaster.clone();
    let app = build_app(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stats = broadcaster.stats().await;
    tracing::info!(
        "Server stopped ({} live connections, {} rooms at shutdown)",
        stats.connections,
        stats.rooms
    );
    Ok(())
}

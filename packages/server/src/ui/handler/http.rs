//! HTTP API endpoint handlers (conversation store front door).

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{CreateMessageRequest, MessageDto},
    ui::{
        error::{ApiError, ApiResult},
        extractor::AuthenticatedUser,
        state::AppState,
    },
    usecase::{ListConversationUseCase, PostMessageUseCase},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `GET /api/conversations/{peer_id}`: the caller's conversation with `peer_id`, oldest first
pub async fn list_conversation(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(peer_id): Path<String>,
) -> ApiResult<Json<Vec<MessageDto>>> {
    let usecase = ListConversationUseCase::new(state.conversations.clone());
    let messages = usecase.execute(&caller, peer_id).await?;

    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

/// `POST /api/conversations`: persist a message from the caller
pub async fn create_message(
    AuthenticatedUser(sender): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageDto>)> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected message payload: {}", e);
        ApiError::BadRequest(e.body_text())
    })?;

    let (Some(receiver_id), Some(body)) = (request.receiver_id, request.body) else {
        return Err(ApiError::BadRequest(
            "Receiver ID and message are required".to_string(),
        ));
    };

    let usecase = PostMessageUseCase::new(state.conversations.clone());
    let message = usecase.execute(&sender, receiver_id, body).await?;

    tracing::info!(
        "Message {} stored from '{}' to '{}'",
        message.id,
        message.sender_id,
        message.receiver_id
    );
    Ok((StatusCode::CREATED, Json(MessageDto::from(&message))))
}

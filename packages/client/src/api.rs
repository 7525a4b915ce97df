//! Conversation store client (durable path).

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use venturechat_server::infrastructure::dto::http::{
    CreateMessageRequest, ErrorResponse, MessageDto,
};

use crate::error::ClientError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationApi: Send + Sync {
    /// Full history between the caller and `peer_id`, oldest first.
    async fn list(&self, peer_id: &str) -> Result<Vec<MessageDto>, ClientError>;

    /// Persist a message from the caller to `receiver_id`.
    async fn create(&self, receiver_id: &str, body: &str) -> Result<MessageDto, ClientError>;
}

/// [`ConversationApi`] over the server's HTTP endpoints.
pub struct HttpConversationApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpConversationApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ConversationApi for HttpConversationApi {
    async fn list(&self, peer_id: &str) -> Result<Vec<MessageDto>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/api/conversations/{peer_id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn create(&self, receiver_id: &str, body: &str) -> Result<MessageDto, ClientError> {
        let request = CreateMessageRequest {
            receiver_id: Some(receiver_id.to_string()),
            body: Some(body.to_string()),
        };
        let response = self
            .client
            .post(self.url("/api/conversations"))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(ClientError::Unauthenticated),
        StatusCode::BAD_REQUEST => {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| "bad request".to_string());
            Err(ClientError::Rejected(message))
        }
        other => {
            tracing::warn!("Conversation API answered {}", other);
            Err(ClientError::UnexpectedStatus(other.as_u16()))
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The bearer token is missing, expired or refused; the user has to
    /// sign in again.
    #[error("not authenticated")]
    Unauthenticated,

    #[error("rejected by server: {0}")]
    Rejected(String),

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error("message is empty")]
    EmptyMessage,

    #[error("invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("terminal error: {0}")]
    Terminal(String),
}

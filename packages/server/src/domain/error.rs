//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// RoomKey validation error
    #[error("RoomKey cannot be empty")]
    RoomKeyEmpty,

    /// RoomKey too long error
    #[error("RoomKey cannot exceed {max} characters (got {actual})")]
    RoomKeyTooLong { max: usize, actual: usize },

    /// MessageBody validation error
    #[error("MessageBody cannot be empty")]
    MessageBodyEmpty,

    /// MessageBody too long error
    #[error("MessageBody cannot exceed {max} characters (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },

    /// MessageId validation error
    #[error("MessageId cannot be empty")]
    MessageIdEmpty,

    /// MessageId invalid format error (not a valid UUID format)
    #[error("MessageId must be a valid UUID format (got: {0})")]
    MessageIdInvalidFormat(String),
}

/// Errors related to Message construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Sender and receiver are the same participant
    #[error("Sender and receiver must differ (both are '{0}')")]
    SelfAddressed(String),
}

/// Errors returned by the identity gate
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer credential was supplied
    #[error("Missing bearer credential")]
    MissingCredential,

    /// Credential could not be verified (bad signature, expired, malformed)
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
}

/// Errors raised by conversation repositories
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying storage failed (I/O)
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be encoded or decoded
    #[error("Storage record is corrupt: {0}")]
    Corrupt(String),
}

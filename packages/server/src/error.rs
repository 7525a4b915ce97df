//! Server bootstrap errors.

use thiserror::Error;

use crate::domain::RepositoryError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open conversation store: {0}")]
    Storage(#[from] RepositoryError),
}

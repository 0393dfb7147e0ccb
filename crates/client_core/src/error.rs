use shared::{domain::OwnerId, error::ErrorCode};
use thiserror::Error;

/// Failure of a single call against the remote collection.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a usable response: unreachable host, timeout, or a body
    /// that could not be decoded.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("server rejected {operation} with status {status}")]
    ServerRejected {
        operation: &'static str,
        status: u16,
    },
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("owner {0} is not loaded")]
    UnknownOwner(OwnerId),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("the list has not been loaded yet")]
    NotReady,
}

impl SyncError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Remote(RemoteError::NetworkFailure(_)) => ErrorCode::NetworkFailure,
            Self::Remote(RemoteError::ServerRejected { .. }) => ErrorCode::ServerRejected,
            Self::State(StateError::UnknownOwner(_)) => ErrorCode::UnknownOwner,
            Self::Validation(_) => ErrorCode::Validation,
            Self::NotReady => ErrorCode::NotReady,
        }
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NetworkFailure,
    ServerRejected,
    UnknownOwner,
    Validation,
    NotReady,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkFailure => "network_failure",
            Self::ServerRejected => "server_rejected",
            Self::UnknownOwner => "unknown_owner",
            Self::Validation => "validation",
            Self::NotReady => "not_ready",
        }
    }
}

/// What the presentation layer is handed when an intent fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}: {message}", .code.as_str())]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

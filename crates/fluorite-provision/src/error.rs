//! Provisioning error types

use thiserror::Error;

/// Failure taxonomy for a provisioning run.
///
/// Derived heuristically from provider CLI exit status and stderr text; the
/// upstream CLIs do not guarantee a stable machine-readable error schema, so
/// `Unknown` is always a possible outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The provider CLI is not logged in or the token was rejected
    AuthenticationFailed,
    /// The account hit a plan limit (database count, storage, ...)
    QuotaExceeded,
    /// Transient connectivity failure; the only kind that is retried
    NetworkError,
    /// The requested database name is already taken
    NamingConflict,
    /// Anything the phrase tables do not recognize
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::AuthenticationFailed => write!(f, "authentication failed"),
            ErrorKind::QuotaExceeded => write!(f, "quota exceeded"),
            ErrorKind::NetworkError => write!(f, "network error"),
            ErrorKind::NamingConflict => write!(f, "naming conflict"),
            ErrorKind::Unknown => write!(f, "unknown error"),
        }
    }
}

/// Provisioning core errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("No provisioner registered for provider: {0}")]
    ProviderNotFound(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Unexpected CLI output: {0}")]
    UnexpectedOutput(String),

    #[error("{kind}: {message}")]
    Provisioning { kind: ErrorKind, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProvisionError {
    /// Build a classified provisioning error.
    pub fn classified(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Provisioning {
            kind,
            message: message.into(),
        }
    }

    /// The taxonomy kind, if this error has already been classified.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Provisioning { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

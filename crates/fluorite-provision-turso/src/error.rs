//! Turso provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TursoError {
    #[error("turso not found. Please install: brew install tursodatabase/tap/turso")]
    TursoNotFound,

    #[error("turso authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("turso command failed: {0}")]
    CommandFailed(String),

    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Database creation failed: {0}")]
    CreationFailed(String),

    #[error("Token creation failed: {0}")]
    TokenCreationFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Provisioning error: {0}")]
    ProvisionError(#[from] fluorite_provision::ProvisionError),
}

pub type Result<T> = std::result::Result<T, TursoError>;

//! Vercel provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VercelError {
    #[error("vercel not found. Please install: npm install -g vercel")]
    VercelNotFound,

    #[error("vercel authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("vercel command failed: {0}")]
    CommandFailed(String),

    #[error("Blob store creation failed: {0}")]
    CreationFailed(String),

    #[error("Unrecognized vercel output: {0}")]
    UnrecognizedOutput(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Provisioning error: {0}")]
    ProvisionError(#[from] fluorite_provision::ProvisionError),
}

pub type Result<T> = std::result::Result<T, VercelError>;

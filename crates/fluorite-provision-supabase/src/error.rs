//! Supabase provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("supabase not found. Please install: brew install supabase/tap/supabase")]
    SupabaseNotFound,

    #[error("supabase authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("supabase command failed: {0}")]
    CommandFailed(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Project creation failed: {0}")]
    CreationFailed(String),

    #[error("API key `{0}` missing from supabase output")]
    ApiKeyMissing(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Provisioning error: {0}")]
    ProvisionError(#[from] fluorite_provision::ProvisionError),
}

pub type Result<T> = std::result::Result<T, SupabaseError>;

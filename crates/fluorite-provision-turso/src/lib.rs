//! Turso provider for fluorite-flake
//!
//! Implements the `DatabaseProvisioner` trait on top of the `turso` CLI.
//!
//! # Requirements
//!
//! - `turso` CLI must be installed and logged in (`turso auth login`)

pub mod error;
pub mod provider;
pub mod turso;

pub use error::{Result, TursoError};
pub use provider::TursoProvisioner;
pub use turso::TursoCli;

//! fluorite-flake database provisioning core
//!
//! Creates one managed database per deployment environment (dev, staging,
//! prod) through a provider's CLI and hands the resulting credentials bundle
//! back to the caller. Remote calls all go through opaque provider binaries;
//! nothing here speaks a network protocol directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 fluorite CLI                     │
//! │             (fluorite provision)                 │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │             fluorite-provision                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        Provider Abstraction               │   │
//! │  │  trait DatabaseProvisioner { ... }        │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌────────────┐ ┌────────────┐ ┌────────────┐  │
//! │  │ Orchestrator│ │  Recovery  │ │  Executor  │  │
//! │  └────────────┘ └────────────┘ └────────────┘  │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │     turso     │ │   supabase    │
//! │   provider    │ │   provider    │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! A run either succeeds with URLs and tokens for all three environments or
//! fails with operator guidance and no credentials at all; transient network
//! failures are retried with bounded exponential backoff, every other
//! failure kind terminates the run.

pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod parser;
pub mod provider;
pub mod recovery;
pub mod report;
pub mod retry;

// Re-exports
pub use config::{DatabaseProvider, Environment, ProvisioningConfig, ProvisioningOptions};
pub use credentials::{DatabaseCredentials, ValidationReport, clean_database_url, validate_credentials};
pub use error::{ErrorKind, ProvisionError, Result};
pub use executor::{CommandOutput, ExecError, ExecOptions, execute};
pub use orchestrator::Orchestrator;
pub use parser::{parse_json, parse_text_line};
pub use provider::{AuthStatus, CreatedDatabase, DatabaseProvisioner, ProvisionerRegistry};
pub use recovery::{RecoveryContext, RecoveryResult, classify_stderr, plan_recovery};
pub use report::{ProvisionedDatabase, ProvisioningReport};
pub use retry::{RetryConfig, execute_with_retry};

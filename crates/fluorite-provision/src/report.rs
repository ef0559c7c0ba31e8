//! Terminal output of a provisioning run

use crate::config::Environment;
use crate::credentials::DatabaseCredentials;
use serde::{Deserialize, Serialize};

/// One database created during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedDatabase {
    pub environment: Environment,
    pub name: String,
    pub url: String,
    /// Always "created" today; kept as data so a future reuse path can say
    /// "existing" without changing the contract
    pub status: String,
}

/// Result of one provisioning run.
///
/// Either `success` with a complete credentials bundle, or failure with a
/// message and no credentials at all; a failed run never leaks the partial
/// bundle it accumulated before the error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningReport {
    pub success: bool,

    pub credentials: Option<DatabaseCredentials>,

    #[serde(default)]
    pub databases: Vec<ProvisionedDatabase>,

    pub error: Option<String>,

    /// Provider-specific next-step text for the operator
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl ProvisioningReport {
    /// Successful run with all environments provisioned.
    pub fn succeeded(
        credentials: DatabaseCredentials,
        databases: Vec<ProvisionedDatabase>,
        instructions: Vec<String>,
    ) -> Self {
        Self {
            success: true,
            credentials: Some(credentials),
            databases,
            error: None,
            instructions,
        }
    }

    /// Run that made no provider calls because provisioning was skipped.
    pub fn skipped() -> Self {
        Self {
            success: true,
            credentials: None,
            databases: Vec::new(),
            error: None,
            instructions: Vec::new(),
        }
    }

    /// Terminal failure. Partial credentials are discarded by construction.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            credentials: None,
            databases: Vec::new(),
            error: Some(error.into()),
            instructions: Vec::new(),
        }
    }
}

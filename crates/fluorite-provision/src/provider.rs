//! Database provisioner trait and registry

use crate::config::{DatabaseProvider, Environment, ProvisioningConfig, ProvisioningOptions};
use crate::credentials::DatabaseCredentials;
use crate::error::{ErrorKind, ProvisionError, Result};
use crate::recovery::classify_stderr;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Database provider abstraction
///
/// One implementation per managed-database provider (Turso, Supabase). The
/// orchestrator talks to providers exclusively through this trait; adding a
/// provider means implementing it and registering a factory, nothing in the
/// orchestration logic changes.
#[async_trait]
pub trait DatabaseProvisioner: Send + Sync {
    /// Provider name (e.g. "turso", "supabase")
    fn name(&self) -> &str;

    /// Provider display name for operator-facing output
    fn display_name(&self) -> &str;

    /// Check that the provider CLI is installed and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Create (or, with `preserve_existing_data`, reuse) the database for one
    /// environment and return its connection credentials.
    async fn create_database(
        &self,
        env: Environment,
        name: &str,
        options: &ProvisioningOptions,
    ) -> Result<CreatedDatabase>;

    /// Map raw CLI stderr onto the failure taxonomy. The default covers
    /// phrases common across providers; implementations extend it with their
    /// own CLI's wording and must keep `Unknown` as the fallback.
    fn classify_failure(&self, stderr: &str) -> ErrorKind {
        classify_stderr(stderr)
    }

    /// Command the operator should run when authentication fails
    fn login_hint(&self) -> &str;

    /// Token length below which the validator warns
    fn min_token_len(&self) -> usize;

    /// Provider-specific next steps shown after a successful run
    fn setup_instructions(&self, credentials: &DatabaseCredentials) -> Vec<String>;
}

impl std::fmt::Debug for dyn DatabaseProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseProvisioner")
            .field("name", &self.name())
            .finish()
    }
}

/// Result of probing a provider CLI's login session (`turso auth whoami`,
/// `supabase projects list`).
///
/// A missing session is a normal outcome here, not an error: the
/// orchestrator turns it into an `AuthenticationFailed` provisioning
/// failure with the provider's login hint attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether the provider CLI has a live session
    pub authenticated: bool,

    /// Logged-in identity as the CLI reports it (username, org, ...)
    pub account_info: Option<String>,

    /// The CLI's complaint when there is no session
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Connection details of one freshly created database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedDatabase {
    pub name: String,
    pub url: String,
    pub token: String,
}

type ProvisionerFactory =
    Box<dyn Fn(&ProvisioningConfig) -> Box<dyn DatabaseProvisioner> + Send + Sync>;

/// Enum-keyed table of provisioner factories.
///
/// Provider dispatch is a lookup here rather than a conditional branch in
/// the orchestrator.
#[derive(Default)]
pub struct ProvisionerRegistry {
    factories: HashMap<DatabaseProvider, ProvisionerFactory>,
}

impl ProvisionerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, provider: DatabaseProvider, factory: F)
    where
        F: Fn(&ProvisioningConfig) -> Box<dyn DatabaseProvisioner> + Send + Sync + 'static,
    {
        self.factories.insert(provider, Box::new(factory));
    }

    /// Instantiate the provisioner for the configured provider.
    pub fn create(&self, config: &ProvisioningConfig) -> Result<Box<dyn DatabaseProvisioner>> {
        self.factories
            .get(&config.provider)
            .map(|factory| factory(config))
            .ok_or_else(|| ProvisionError::ProviderNotFound(config.provider.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopProvisioner;

    #[async_trait]
    impl DatabaseProvisioner for NoopProvisioner {
        fn name(&self) -> &str {
            "noop"
        }

        fn display_name(&self) -> &str {
            "Noop"
        }

        async fn check_auth(&self) -> Result<AuthStatus> {
            Ok(AuthStatus::ok("test"))
        }

        async fn create_database(
            &self,
            _env: Environment,
            name: &str,
            _options: &ProvisioningOptions,
        ) -> Result<CreatedDatabase> {
            Ok(CreatedDatabase {
                name: name.to_string(),
                url: format!("libsql://{name}.example.io"),
                token: "token".to_string(),
            })
        }

        fn login_hint(&self) -> &str {
            "noop login"
        }

        fn min_token_len(&self) -> usize {
            8
        }

        fn setup_instructions(&self, _credentials: &DatabaseCredentials) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn registry_lookup_by_provider_enum() {
        let mut registry = ProvisionerRegistry::new();
        registry.register(DatabaseProvider::Turso, |_| Box::new(NoopProvisioner));

        let config = ProvisioningConfig::new(DatabaseProvider::Turso, "myapp");
        let provisioner = registry.create(&config).unwrap();
        assert_eq!(provisioner.name(), "noop");
    }

    #[test]
    fn unregistered_provider_is_an_error() {
        let registry = ProvisionerRegistry::new();
        let config = ProvisioningConfig::new(DatabaseProvider::Supabase, "myapp");

        let err = registry.create(&config).unwrap_err();
        assert!(err.to_string().contains("supabase"));
    }
}

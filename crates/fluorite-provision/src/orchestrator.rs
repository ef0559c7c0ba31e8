//! Provisioning orchestration
//!
//! Drives one create-database-per-environment run: auth check, sequential
//! creation for dev/staging/prod, and recovery on failure. This is the single
//! point where provider errors are translated back into a
//! [`ProvisioningReport`]; nothing below it prints to the operator.

use crate::config::{Environment, ProvisioningConfig};
use crate::credentials::{DatabaseCredentials, validate_credentials};
use crate::error::{ErrorKind, ProvisionError, Result};
use crate::provider::{DatabaseProvisioner, ProvisionerRegistry};
use crate::recovery::{RecoveryContext, plan_recovery};
use crate::report::{ProvisionedDatabase, ProvisioningReport};
use crate::retry::{RetryConfig, execute_with_retry};

pub struct Orchestrator {
    registry: ProvisionerRegistry,
    retry: RetryConfig,
}

impl Orchestrator {
    pub fn new(registry: ProvisionerRegistry) -> Self {
        Self {
            registry,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Run one provisioning pass for `config`.
    ///
    /// Transient network failures are retried with bounded exponential
    /// backoff; this is the only retry boundary — a recovered run's report is
    /// returned directly, `provision` is never re-entered from the top.
    pub async fn provision(&self, config: &ProvisioningConfig) -> ProvisioningReport {
        if config.options.skip_provisioning {
            tracing::info!(
                "skipping database provisioning for {}",
                config.project_name
            );
            return ProvisioningReport::skipped();
        }

        let provisioner = match self.registry.create(config) {
            Ok(provisioner) => provisioner,
            Err(e) => return ProvisioningReport::failed(e.to_string()),
        };

        tracing::info!(
            "provisioning {} databases for {}",
            provisioner.display_name(),
            config.project_name
        );

        match self.provision_once(provisioner.as_ref(), config).await {
            Ok(report) => report,
            Err(error) => self.recover(provisioner.as_ref(), config, error).await,
        }
    }

    /// One sequential pass over all environments. On any error the partial
    /// credentials bundle stays local to this call and is dropped.
    async fn provision_once(
        &self,
        provisioner: &dyn DatabaseProvisioner,
        config: &ProvisioningConfig,
    ) -> Result<ProvisioningReport> {
        let auth = provisioner.check_auth().await?;
        if !auth.authenticated {
            return Err(ProvisionError::classified(
                ErrorKind::AuthenticationFailed,
                auth.error
                    .unwrap_or_else(|| format!("{} CLI is not logged in", provisioner.name())),
            ));
        }

        let mut credentials = DatabaseCredentials::new();
        let mut databases = Vec::new();

        for env in Environment::ALL {
            let name = config.database_name(env);
            tracing::info!("creating {env} database {name}");

            let created = provisioner
                .create_database(env, &name, &config.options)
                .await?;

            credentials.set(env, created.url.clone(), created.token);
            databases.push(ProvisionedDatabase {
                environment: env,
                name,
                url: created.url,
                status: "created".to_string(),
            });
        }

        let validation = validate_credentials(&credentials, provisioner.min_token_len());
        for warning in &validation.warnings {
            tracing::warn!("{warning}");
        }
        if !validation.valid {
            return Err(ProvisionError::classified(
                ErrorKind::Unknown,
                format!(
                    "provider returned incomplete credentials: {}",
                    validation.errors.join("; ")
                ),
            ));
        }

        let instructions = provisioner.setup_instructions(&credentials);
        Ok(ProvisioningReport::succeeded(
            credentials,
            databases,
            instructions,
        ))
    }

    /// Classify a failed pass and either retry (network) or surface guidance.
    async fn recover(
        &self,
        provisioner: &dyn DatabaseProvisioner,
        config: &ProvisioningConfig,
        error: ProvisionError,
    ) -> ProvisioningReport {
        let message = error.to_string();
        let kind = error
            .kind()
            .unwrap_or_else(|| provisioner.classify_failure(&message));

        let ctx = RecoveryContext {
            provider_display_name: provisioner.display_name(),
            login_hint: provisioner.login_hint(),
            project_name: &config.project_name,
        };
        let recovery = plan_recovery(kind, &message, &ctx);
        tracing::warn!(
            "provisioning failed ({kind}), recovery action: {}",
            recovery.action_taken
        );

        if kind != ErrorKind::NetworkError {
            return ProvisioningReport::failed(recovery.message);
        }

        match execute_with_retry(&self.retry, || self.provision_once(provisioner, config)).await {
            Ok(report) => report,
            Err(final_error) => ProvisioningReport::failed(format!(
                "{} Giving up after {} attempts: {}",
                recovery.message, self.retry.max_attempts, final_error
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseProvider, ProvisioningOptions};
    use crate::provider::{AuthStatus, CreatedDatabase};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Provisioner whose failures are scripted per call number.
    struct ScriptedProvisioner {
        calls: Arc<AtomicU32>,
        /// Number of leading create calls that fail with this stderr text
        failures: u32,
        failure_text: &'static str,
        authenticated: bool,
    }

    impl ScriptedProvisioner {
        fn succeeding(calls: Arc<AtomicU32>) -> Self {
            Self {
                calls,
                failures: 0,
                failure_text: "",
                authenticated: true,
            }
        }

        fn failing(calls: Arc<AtomicU32>, failures: u32, text: &'static str) -> Self {
            Self {
                calls,
                failures,
                failure_text: text,
                authenticated: true,
            }
        }
    }

    #[async_trait]
    impl DatabaseProvisioner for ScriptedProvisioner {
        fn name(&self) -> &str {
            "scripted"
        }

        fn display_name(&self) -> &str {
            "Scripted"
        }

        async fn check_auth(&self) -> Result<AuthStatus> {
            if self.authenticated {
                Ok(AuthStatus::ok("tester"))
            } else {
                Ok(AuthStatus::failed("you are not authenticated"))
            }
        }

        async fn create_database(
            &self,
            _env: Environment,
            name: &str,
            _options: &ProvisioningOptions,
        ) -> Result<CreatedDatabase> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                return Err(ProvisionError::CommandFailed(self.failure_text.to_string()));
            }
            Ok(CreatedDatabase {
                name: name.to_string(),
                url: format!("libsql://{name}.example.io"),
                token: "a-sufficiently-long-token".to_string(),
            })
        }

        fn login_hint(&self) -> &str {
            "scripted login"
        }

        fn min_token_len(&self) -> usize {
            8
        }

        fn setup_instructions(&self, _credentials: &DatabaseCredentials) -> Vec<String> {
            vec!["add the URLs to your env files".to_string()]
        }
    }

    fn registry_with(provisioner: impl Fn() -> ScriptedProvisioner + Send + Sync + 'static) -> ProvisionerRegistry {
        let mut registry = ProvisionerRegistry::new();
        registry.register(DatabaseProvider::Turso, move |_| Box::new(provisioner()));
        registry
    }

    fn config() -> ProvisioningConfig {
        ProvisioningConfig::new(DatabaseProvider::Turso, "myapp")
    }

    #[tokio::test]
    async fn skip_provisioning_makes_no_provider_calls() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_for_factory = calls.clone();
        let registry =
            registry_with(move || ScriptedProvisioner::succeeding(calls_for_factory.clone()));
        let orchestrator = Orchestrator::new(registry);

        let config = config().with_options(ProvisioningOptions {
            skip_provisioning: true,
            preserve_existing_data: false,
        });
        let report = orchestrator.provision(&config).await;

        assert!(report.success);
        assert!(report.databases.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_run_populates_all_three_environments() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_for_factory = calls.clone();
        let registry =
            registry_with(move || ScriptedProvisioner::succeeding(calls_for_factory.clone()));
        let orchestrator = Orchestrator::new(registry);

        let report = orchestrator.provision(&config()).await;

        assert!(report.success);
        let credentials = report.credentials.expect("credentials");
        assert!(credentials.is_complete());
        assert_eq!(report.databases.len(), 3);
        assert_eq!(
            report.databases[0].environment,
            Environment::Dev
        );
        assert_eq!(report.databases[2].name, "myapp-prod");
        assert_eq!(report.databases[0].status, "created");
        assert!(!report.instructions.is_empty());
    }

    #[tokio::test]
    async fn failed_run_exposes_no_partial_credentials() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_for_factory = calls.clone();
        let registry = registry_with(move || {
            ScriptedProvisioner::failing(
                calls_for_factory.clone(),
                u32::MAX,
                "error: database myapp-dev already exists",
            )
        });
        let orchestrator = Orchestrator::new(registry);

        let report = orchestrator.provision(&config()).await;

        assert!(!report.success);
        assert!(report.credentials.is_none());
        assert!(report.databases.is_empty());
        assert!(report.error.unwrap().contains("--preserve-existing"));
    }

    #[tokio::test]
    async fn auth_failure_surfaces_login_hint_without_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_for_factory = calls.clone();
        let registry = registry_with(move || ScriptedProvisioner {
            calls: calls_for_factory.clone(),
            failures: 0,
            failure_text: "",
            authenticated: false,
        });
        let orchestrator = Orchestrator::new(registry);

        let report = orchestrator.provision(&config()).await;

        assert!(!report.success);
        assert!(report.error.unwrap().contains("scripted login"));
        // never reached create_database
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failure_recovers_through_the_retry_path() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_for_factory = calls.clone();
        // First create call fails with a transient error; the retried pass
        // starts over from dev and succeeds.
        let registry = registry_with(move || {
            ScriptedProvisioner::failing(
                calls_for_factory.clone(),
                1,
                "dial tcp: connection refused",
            )
        });
        let orchestrator = Orchestrator::new(registry);

        let report = orchestrator.provision(&config()).await;

        assert!(report.success);
        assert!(report.credentials.unwrap().is_complete());
        // 1 failed call + 3 successful calls in the retried pass
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_network_failure_exhausts_the_retry_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_for_factory = calls.clone();
        let registry = registry_with(move || {
            ScriptedProvisioner::failing(calls_for_factory.clone(), u32::MAX, "request timed out")
        });
        let orchestrator = Orchestrator::new(registry);

        let report = orchestrator.provision(&config()).await;

        assert!(!report.success);
        assert!(report.error.unwrap().contains("Giving up after 3 attempts"));
        // initial pass + 3 retry-helper attempts, one create call each
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}

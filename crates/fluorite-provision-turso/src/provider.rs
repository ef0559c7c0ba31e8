//! Turso provisioner implementation

use crate::error::TursoError;
use crate::turso::TursoCli;
use async_trait::async_trait;
use fluorite_provision::{
    AuthStatus, CreatedDatabase, DatabaseCredentials, DatabaseProvisioner, Environment, ErrorKind,
    ProvisionError, ProvisioningOptions, classify_stderr,
};

/// Token length below which the validator warns. Turso tokens are JWTs and
/// run far longer than this in practice.
const MIN_TOKEN_LEN: usize = 32;

/// Turso database provisioner
pub struct TursoProvisioner {
    cli: TursoCli,
}

impl Default for TursoProvisioner {
    fn default() -> Self {
        Self::new(TursoCli::default())
    }
}

impl TursoProvisioner {
    pub fn new(cli: TursoCli) -> Self {
        Self { cli }
    }

    /// Turso-specific stderr phrases, checked before the shared tables.
    fn classify_turso(stderr: &str) -> ErrorKind {
        let lowered = stderr.to_lowercase();
        if lowered.contains("run `turso auth login`") {
            return ErrorKind::AuthenticationFailed;
        }
        if lowered.contains("maximum number of databases") {
            return ErrorKind::QuotaExceeded;
        }
        classify_stderr(stderr)
    }

    /// Map a wrapper error into a classified provisioning error.
    fn provision_error(error: TursoError) -> ProvisionError {
        match error {
            TursoError::TursoNotFound => ProvisionError::classified(
                ErrorKind::Unknown,
                TursoError::TursoNotFound.to_string(),
            ),
            TursoError::ProvisionError(inner) => inner,
            other => {
                let message = other.to_string();
                ProvisionError::classified(Self::classify_turso(&message), message)
            }
        }
    }

    /// Fetch URL and token for an existing database.
    async fn credentials_for(&self, name: &str) -> Result<CreatedDatabase, TursoError> {
        let url = self.cli.show_url(name).await?;
        let token = self.cli.create_token(name).await?;
        Ok(CreatedDatabase {
            name: name.to_string(),
            url,
            token,
        })
    }
}

#[async_trait]
impl DatabaseProvisioner for TursoProvisioner {
    fn name(&self) -> &str {
        "turso"
    }

    fn display_name(&self) -> &str {
        "Turso"
    }

    async fn check_auth(&self) -> fluorite_provision::Result<AuthStatus> {
        match self.cli.whoami().await {
            Ok(Some(username)) => Ok(AuthStatus::ok(username)),
            Ok(None) => Ok(AuthStatus::failed("turso CLI is not logged in")),
            Err(TursoError::TursoNotFound) => {
                Ok(AuthStatus::failed(TursoError::TursoNotFound.to_string()))
            }
            Err(e) => Err(Self::provision_error(e)),
        }
    }

    async fn create_database(
        &self,
        env: Environment,
        name: &str,
        options: &ProvisioningOptions,
    ) -> fluorite_provision::Result<CreatedDatabase> {
        let result = async {
            if options.preserve_existing_data && self.cli.database_exists(name).await? {
                tracing::info!("reusing existing {env} database {name}");
                return self.credentials_for(name).await;
            }

            self.cli.create_database(name).await?;
            self.credentials_for(name).await
        }
        .await;

        result.map_err(Self::provision_error)
    }

    fn classify_failure(&self, stderr: &str) -> ErrorKind {
        Self::classify_turso(stderr)
    }

    fn login_hint(&self) -> &str {
        "turso auth login"
    }

    fn min_token_len(&self) -> usize {
        MIN_TOKEN_LEN
    }

    fn setup_instructions(&self, credentials: &DatabaseCredentials) -> Vec<String> {
        let mut instructions = vec![
            "Copy each environment's TURSO_DATABASE_URL and TURSO_AUTH_TOKEN into the matching .env file".to_string(),
        ];
        if let Some(url) = credentials.url(Environment::Dev) {
            instructions.push(format!("Inspect the dev database with: turso db shell {url}"));
        }
        instructions.push("Rotate tokens later with: turso db tokens create <database>".to_string());
        instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turso_login_prompt_classifies_as_auth() {
        assert_eq!(
            TursoProvisioner::classify_turso("error: please run `turso auth login` first"),
            ErrorKind::AuthenticationFailed
        );
    }

    #[test]
    fn database_count_limit_classifies_as_quota() {
        assert_eq!(
            TursoProvisioner::classify_turso(
                "error: you have reached the maximum number of databases for your plan"
            ),
            ErrorKind::QuotaExceeded
        );
    }

    #[test]
    fn shared_phrases_still_apply() {
        assert_eq!(
            TursoProvisioner::classify_turso("error: database myapp-dev already exists"),
            ErrorKind::NamingConflict
        );
        assert_eq!(
            TursoProvisioner::classify_turso("dial tcp: connection timed out"),
            ErrorKind::NetworkError
        );
    }

    #[test]
    fn wrapper_errors_become_classified_provision_errors() {
        let error = TursoProvisioner::provision_error(TursoError::CreationFailed(
            "database myapp-dev already exists".to_string(),
        ));
        assert_eq!(error.kind(), Some(ErrorKind::NamingConflict));
    }
}

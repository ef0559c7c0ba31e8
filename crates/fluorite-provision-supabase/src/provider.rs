//! Supabase provisioner implementation

use crate::error::SupabaseError;
use crate::supabase::{ProjectInfo, SupabaseCli, SupabaseSettings};
use async_trait::async_trait;
use fluorite_provision::{
    AuthStatus, CreatedDatabase, DatabaseCredentials, DatabaseProvisioner, Environment, ErrorKind,
    ProvisionError, ProvisioningOptions, classify_stderr,
};

/// Supabase service-role keys are JWTs; anything shorter than this is
/// suspicious enough to warn about.
const MIN_TOKEN_LEN: usize = 20;

/// Supabase database provisioner
///
/// One Supabase project per environment; the "database URL" is the project's
/// Postgres connection string and the "token" is its service-role API key.
pub struct SupabaseProvisioner {
    cli: SupabaseCli,
    settings: SupabaseSettings,
}

impl SupabaseProvisioner {
    pub fn new(cli: SupabaseCli, settings: SupabaseSettings) -> Self {
        Self { cli, settings }
    }

    /// Supabase-specific stderr phrases, checked before the shared tables.
    fn classify_supabase(stderr: &str) -> ErrorKind {
        let lowered = stderr.to_lowercase();
        if lowered.contains("access token") || lowered.contains("supabase login") {
            return ErrorKind::AuthenticationFailed;
        }
        if lowered.contains("free projects limit") || lowered.contains("maximum number of projects")
        {
            return ErrorKind::QuotaExceeded;
        }
        classify_stderr(stderr)
    }

    fn provision_error(error: SupabaseError) -> ProvisionError {
        match error {
            SupabaseError::SupabaseNotFound => ProvisionError::classified(
                ErrorKind::Unknown,
                SupabaseError::SupabaseNotFound.to_string(),
            ),
            SupabaseError::AuthenticationFailed(message) => {
                ProvisionError::classified(ErrorKind::AuthenticationFailed, message)
            }
            SupabaseError::ProvisionError(inner) => inner,
            other => {
                let message = other.to_string();
                ProvisionError::classified(Self::classify_supabase(&message), message)
            }
        }
    }

    async fn credentials_for(
        &self,
        project: &ProjectInfo,
    ) -> Result<CreatedDatabase, SupabaseError> {
        let token = self.cli.service_role_key(&project.id).await?;
        Ok(CreatedDatabase {
            name: project.name.clone(),
            url: project.database_url(&self.settings.db_password),
            token,
        })
    }
}

#[async_trait]
impl DatabaseProvisioner for SupabaseProvisioner {
    fn name(&self) -> &str {
        "supabase"
    }

    fn display_name(&self) -> &str {
        "Supabase"
    }

    async fn check_auth(&self) -> fluorite_provision::Result<AuthStatus> {
        match self.cli.list_projects().await {
            Ok(projects) => Ok(AuthStatus::ok(format!(
                "org {} ({} projects)",
                self.settings.org_id,
                projects.len()
            ))),
            Err(SupabaseError::AuthenticationFailed(message)) => Ok(AuthStatus::failed(message)),
            Err(SupabaseError::SupabaseNotFound) => Ok(AuthStatus::failed(
                SupabaseError::SupabaseNotFound.to_string(),
            )),
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
            if options.preserve_existing_data {
                if let Some(project) = self.cli.find_project(name).await? {
                    tracing::info!("reusing existing {env} project {name}");
                    return self.credentials_for(&project).await;
                }
            }

            let project = self.cli.create_project(name, &self.settings).await?;
            self.credentials_for(&project).await
        }
        .await;

        result.map_err(Self::provision_error)
    }

    fn classify_failure(&self, stderr: &str) -> ErrorKind {
        Self::classify_supabase(stderr)
    }

    fn login_hint(&self) -> &str {
        "supabase login"
    }

    fn min_token_len(&self) -> usize {
        MIN_TOKEN_LEN
    }

    fn setup_instructions(&self, credentials: &DatabaseCredentials) -> Vec<String> {
        let mut instructions = vec![
            "Copy each environment's DATABASE_URL and SUPABASE_SERVICE_ROLE_KEY into the matching .env file".to_string(),
            "Keep the service-role key server-side only; expose the anon key to browsers instead".to_string(),
        ];
        if credentials.url(Environment::Prod).is_some() {
            instructions.push(
                "Enable point-in-time recovery on the prod project from the Supabase dashboard"
                    .to_string(),
            );
        }
        instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_error_classifies_as_auth() {
        assert_eq!(
            SupabaseProvisioner::classify_supabase(
                "Access token not provided. Supply an access token by running supabase login"
            ),
            ErrorKind::AuthenticationFailed
        );
    }

    #[test]
    fn project_limit_classifies_as_quota() {
        assert_eq!(
            SupabaseProvisioner::classify_supabase(
                "failed to create project: free projects limit reached"
            ),
            ErrorKind::QuotaExceeded
        );
    }

    #[test]
    fn shared_phrases_still_apply() {
        assert_eq!(
            SupabaseProvisioner::classify_supabase("project name already taken"),
            ErrorKind::NamingConflict
        );
    }

    #[test]
    fn wrapper_errors_become_classified_provision_errors() {
        let error = SupabaseProvisioner::provision_error(SupabaseError::CreationFailed(
            "request timed out".to_string(),
        ));
        assert_eq!(error.kind(), Some(ErrorKind::NetworkError));
    }
}

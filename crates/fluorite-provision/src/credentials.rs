//! Credentials bundle and validation

use crate::config::Environment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// URL schemes accepted for a provisioned database
const ALLOWED_SCHEMES: [&str; 4] = ["libsql", "postgresql", "postgres", "file"];

/// Database URL and auth token per environment.
///
/// Populated progressively while a run is in flight; an environment's entry
/// is written in one step once its creation call returns, and a failed run
/// never exposes the partially filled bundle to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseCredentials {
    #[serde(default)]
    pub urls: HashMap<Environment, String>,

    #[serde(default)]
    pub tokens: HashMap<Environment, String>,
}

impl DatabaseCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one environment's URL and token together.
    pub fn set(&mut self, env: Environment, url: impl Into<String>, token: impl Into<String>) {
        self.urls.insert(env, url.into());
        self.tokens.insert(env, token.into());
    }

    pub fn url(&self, env: Environment) -> Option<&str> {
        self.urls.get(&env).map(String::as_str)
    }

    pub fn token(&self, env: Environment) -> Option<&str> {
        self.tokens.get(&env).map(String::as_str)
    }

    /// True once every environment has both a URL and a token.
    pub fn is_complete(&self) -> bool {
        Environment::ALL
            .iter()
            .all(|env| self.urls.contains_key(env) && self.tokens.contains_key(env))
    }
}

/// Outcome of validating a credentials bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a bundle for presence and shape of every environment's URL and
/// token. A short token is a warning (heuristic weak-token detection), a
/// missing or malformed entry is an error.
pub fn validate_credentials(
    credentials: &DatabaseCredentials,
    min_token_len: usize,
) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for env in Environment::ALL {
        match credentials.url(env) {
            None => errors.push(format!("missing database URL for {env}")),
            Some(raw) => match Url::parse(raw) {
                Ok(url) if ALLOWED_SCHEMES.contains(&url.scheme()) => {}
                Ok(url) => errors.push(format!(
                    "unsupported URL scheme `{}` for {env}",
                    url.scheme()
                )),
                Err(e) => errors.push(format!("invalid database URL for {env}: {e}")),
            },
        }

        match credentials.token(env) {
            None => errors.push(format!("missing auth token for {env}")),
            Some(token) if token.len() < min_token_len => warnings.push(format!(
                "auth token for {env} is shorter than {min_token_len} characters"
            )),
            Some(_) => {}
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Strip the query string and fragment from a database URL, preserving
/// scheme, host, port and path. Inputs that are empty or do not parse are
/// returned unchanged; unparseable input additionally logs a warning.
pub fn clean_database_url(raw: &str) -> String {
    if raw.is_empty() {
        return raw.to_string();
    }

    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(e) => {
            tracing::warn!("could not parse database URL, leaving it unchanged: {e}");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_bundle() -> DatabaseCredentials {
        let mut credentials = DatabaseCredentials::new();
        for env in Environment::ALL {
            credentials.set(
                env,
                format!("libsql://myapp-{env}.turso.io"),
                "a-token-that-is-plenty-long-enough-0123",
            );
        }
        credentials
    }

    #[test]
    fn complete_bundle_is_valid() {
        let report = validate_credentials(&full_bundle(), 32);

        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_staging_token_is_an_error_naming_the_environment() {
        let mut credentials = full_bundle();
        credentials.tokens.remove(&Environment::Staging);

        let report = validate_credentials(&credentials, 32);

        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("staging")));
    }

    #[test]
    fn short_token_is_a_warning_not_an_error() {
        let mut credentials = full_bundle();
        credentials
            .tokens
            .insert(Environment::Dev, "short".to_string());

        let report = validate_credentials(&credentials, 32);

        assert!(report.valid);
        assert!(report.warnings.iter().any(|w| w.contains("dev")));
    }

    #[test]
    fn unsupported_scheme_is_an_error() {
        let mut credentials = full_bundle();
        credentials
            .urls
            .insert(Environment::Prod, "mysql://db.example.com".to_string());

        let report = validate_credentials(&credentials, 32);

        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("mysql")));
    }

    #[test]
    fn postgres_and_file_schemes_are_accepted() {
        let mut credentials = full_bundle();
        credentials.urls.insert(
            Environment::Dev,
            "postgresql://postgres@db.example.com:5432/postgres".to_string(),
        );
        credentials
            .urls
            .insert(Environment::Staging, "file:///tmp/dev.db".to_string());

        let report = validate_credentials(&credentials, 32);
        assert!(report.valid);
    }

    #[test]
    fn clean_url_strips_query_and_fragment() {
        assert_eq!(
            clean_database_url("libsql://host.example.io?authToken=xyz"),
            "libsql://host.example.io"
        );
        assert_eq!(
            clean_database_url("postgresql://db.example.com:5432/postgres?sslmode=require#frag"),
            "postgresql://db.example.com:5432/postgres"
        );
    }

    #[test]
    fn clean_url_leaves_empty_and_unparseable_input_unchanged() {
        assert_eq!(clean_database_url(""), "");
        assert_eq!(clean_database_url("not a url at all"), "not a url at all");
    }

    #[test]
    fn is_complete_requires_all_three_environments() {
        let mut credentials = DatabaseCredentials::new();
        credentials.set(Environment::Dev, "libsql://a.io", "t1");
        assert!(!credentials.is_complete());

        credentials.set(Environment::Staging, "libsql://b.io", "t2");
        credentials.set(Environment::Prod, "libsql://c.io", "t3");
        assert!(credentials.is_complete());
    }
}

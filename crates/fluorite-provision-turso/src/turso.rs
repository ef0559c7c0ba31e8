//! turso CLI wrapper
//!
//! Wraps the turso CLI commands used for database provisioning. The CLI
//! prints most values as plain text (`db show --url` emits the bare URL,
//! `db tokens create` emits the bare token), so decoding is line-based
//! rather than JSON.

use crate::error::{Result, TursoError};
use fluorite_provision::executor::{CommandOutput, ExecOptions, execute};
use fluorite_provision::parser::parse_text_line;
use std::time::Duration;

/// turso CLI wrapper
pub struct TursoCli {
    options: ExecOptions,
}

impl Default for TursoCli {
    fn default() -> Self {
        Self::new(Duration::from_secs(120))
    }
}

impl TursoCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            options: ExecOptions::with_timeout(timeout),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = execute("turso", args, &self.options).await;
        if output.spawn_failed() {
            return Err(TursoError::TursoNotFound);
        }
        Ok(output)
    }

    /// Check if turso is installed and authenticated.
    ///
    /// `turso auth whoami` prints the logged-in username, or an error when
    /// there is no session.
    pub async fn whoami(&self) -> Result<Option<String>> {
        let output = self.run(&["auth", "whoami"]).await?;

        if !output.success {
            return Ok(None);
        }
        let username = output.stdout.trim();
        if username.is_empty() || username.contains("not logged in") {
            return Ok(None);
        }
        Ok(Some(username.to_string()))
    }

    /// List database names the account owns.
    ///
    /// `turso db list` prints a table (NAME, GROUP, URL) with no JSON
    /// alternative, so rows are scraped by first column.
    pub async fn list_databases(&self) -> Result<Vec<String>> {
        let output = self.run(&["db", "list"]).await?;
        if !output.success {
            return Err(TursoError::CommandFailed(output.failure_message()));
        }

        Ok(parse_db_list(&output.stdout))
    }

    pub async fn database_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_databases().await?.iter().any(|n| n == name))
    }

    /// Create a database. Output is informational text; the URL is fetched
    /// separately with [`show_url`](Self::show_url).
    pub async fn create_database(&self, name: &str) -> Result<()> {
        let output = self.run(&["db", "create", name]).await?;
        if !output.success {
            return Err(TursoError::CreationFailed(output.failure_message()));
        }
        Ok(())
    }

    /// The libsql URL of a database (`turso db show <name> --url`).
    pub async fn show_url(&self, name: &str) -> Result<String> {
        let output = self.run(&["db", "show", name, "--url"]).await?;
        if !output.success {
            return Err(TursoError::DatabaseNotFound(output.failure_message()));
        }
        Ok(parse_text_line(&output)?)
    }

    /// Mint a fresh auth token for a database.
    pub async fn create_token(&self, name: &str) -> Result<String> {
        let output = self.run(&["db", "tokens", "create", name]).await?;
        if !output.success {
            return Err(TursoError::TokenCreationFailed(output.failure_message()));
        }
        Ok(parse_text_line(&output)?)
    }

    /// Delete a database. Used by cleanup flows, never by provisioning.
    pub async fn delete_database(&self, name: &str) -> Result<()> {
        let output = self.run(&["db", "destroy", name, "--yes"]).await?;
        if !output.success {
            return Err(TursoError::CommandFailed(output.failure_message()));
        }
        Ok(())
    }
}

/// Database names from `turso db list` table output. The header row is
/// recognized by its NAME cell rather than by position, so leading blank
/// lines or a missing header do not break the scrape.
fn parse_db_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|first| *first != "NAME")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_list_scrapes_names_from_the_first_column() {
        let stdout = "NAME         GROUP    URL\n\
                      myapp-dev    default  libsql://myapp-dev.turso.io\n\
                      myapp-prod   default  libsql://myapp-prod.turso.io\n";

        assert_eq!(parse_db_list(stdout), vec!["myapp-dev", "myapp-prod"]);
    }

    #[test]
    fn db_list_tolerates_blank_lines_and_empty_output() {
        assert_eq!(parse_db_list(""), Vec::<String>::new());
        assert_eq!(parse_db_list("\nNAME  GROUP  URL\n\n"), Vec::<String>::new());
    }
}

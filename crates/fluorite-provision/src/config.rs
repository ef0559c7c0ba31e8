//! Provisioning run configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deployment environment for a provisioned database.
///
/// `ALL` gives the order databases are created in: dev first, prod last, so
/// a failure surfaces before anything production-facing exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Staging, Environment::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported database providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    Turso,
    Supabase,
}

impl DatabaseProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseProvider::Turso => "turso",
            DatabaseProvider::Supabase => "supabase",
        }
    }
}

impl std::fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DatabaseProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "turso" => Ok(DatabaseProvider::Turso),
            "supabase" => Ok(DatabaseProvider::Supabase),
            other => Err(format!("unknown database provider: {other}")),
        }
    }
}

/// Flags modifying how a provisioning run behaves
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProvisioningOptions {
    /// Skip all provider calls and report success with an empty database list
    #[serde(default)]
    pub skip_provisioning: bool,

    /// Reuse an existing database of the same name instead of failing with a
    /// naming conflict
    #[serde(default)]
    pub preserve_existing_data: bool,
}

/// Immutable input to one provisioning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Which provider backs the databases
    pub provider: DatabaseProvider,

    /// Project the databases belong to; used to derive default names
    pub project_name: String,

    /// Explicit database name per environment; missing entries fall back to
    /// `<project>-<env>`
    #[serde(default)]
    pub database_names: HashMap<Environment, String>,

    #[serde(default)]
    pub options: ProvisioningOptions,
}

impl ProvisioningConfig {
    pub fn new(provider: DatabaseProvider, project_name: impl Into<String>) -> Self {
        Self {
            provider,
            project_name: project_name.into(),
            database_names: HashMap::new(),
            options: ProvisioningOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProvisioningOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_database_name(mut self, env: Environment, name: impl Into<String>) -> Self {
        self.database_names.insert(env, name.into());
        self
    }

    /// The database name to use for one environment.
    pub fn database_name(&self, env: Environment) -> String {
        self.database_names
            .get(&env)
            .cloned()
            .unwrap_or_else(|| format!("{}-{}", self.project_name, env.as_str()))
    }
}

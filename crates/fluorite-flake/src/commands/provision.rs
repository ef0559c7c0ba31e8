use anyhow::Context;
use colored::Colorize;
use fluorite_provision::{
    DatabaseProvider, Environment, Orchestrator, ProvisionerRegistry, ProvisioningConfig,
    ProvisioningOptions, ProvisioningReport,
};
use fluorite_provision_supabase::{SupabaseCli, SupabaseProvisioner, SupabaseSettings};
use fluorite_provision_turso::{TursoCli, TursoProvisioner};
use std::time::Duration;

pub async fn handle(
    provider: &str,
    project: &str,
    skip: bool,
    preserve_existing: bool,
    timeout_secs: u64,
    json: bool,
) -> anyhow::Result<()> {
    let provider: DatabaseProvider = provider
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("supported providers: turso, supabase")?;

    let registry = build_registry(provider, Duration::from_secs(timeout_secs))?;
    let orchestrator = Orchestrator::new(registry);

    let config = ProvisioningConfig::new(provider, project).with_options(ProvisioningOptions {
        skip_provisioning: skip,
        preserve_existing_data: preserve_existing,
    });

    if !skip {
        println!(
            "{}",
            format!("Provisioning {provider} databases for {project}...").blue().bold()
        );
    }

    let report = orchestrator.provision(&config).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render(&report);
    }

    if report.success {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

/// Register the real provider factories. Supabase needs settings from the
/// environment, so its registration can fail before any subprocess runs.
fn build_registry(
    provider: DatabaseProvider,
    timeout: Duration,
) -> anyhow::Result<ProvisionerRegistry> {
    let mut registry = ProvisionerRegistry::new();

    match provider {
        DatabaseProvider::Turso => {
            registry.register(DatabaseProvider::Turso, move |_| {
                Box::new(TursoProvisioner::new(TursoCli::new(timeout)))
            });
        }
        DatabaseProvider::Supabase => {
            let settings = SupabaseSettings {
                org_id: std::env::var("SUPABASE_ORG_ID")
                    .context("SUPABASE_ORG_ID must be set for supabase provisioning")?,
                db_password: std::env::var("SUPABASE_DB_PASSWORD")
                    .context("SUPABASE_DB_PASSWORD must be set for supabase provisioning")?,
                region: std::env::var("SUPABASE_REGION")
                    .unwrap_or_else(|_| "us-east-1".to_string()),
            };
            registry.register(DatabaseProvider::Supabase, move |_| {
                Box::new(SupabaseProvisioner::new(
                    SupabaseCli::new(timeout),
                    settings.clone(),
                ))
            });
        }
    }

    Ok(registry)
}

fn render(report: &ProvisioningReport) {
    if !report.success {
        let message = report.error.as_deref().unwrap_or("unknown failure");
        eprintln!("{} {}", "Provisioning failed:".red().bold(), message);
        return;
    }

    if report.databases.is_empty() {
        println!("{}", "Provisioning skipped.".yellow());
        return;
    }

    println!("{}", "Databases created:".green().bold());
    for db in &report.databases {
        println!("  • {} {} ({})", db.environment, db.name.cyan(), db.url);
    }

    if let Some(ref credentials) = report.credentials {
        println!();
        println!("{}", "Credentials:".bold());
        for env in Environment::ALL {
            if let (Some(url), Some(token)) = (credentials.url(env), credentials.token(env)) {
                println!("  {env}: {url} (token: {} chars)", token.len());
            }
        }
    }

    if !report.instructions.is_empty() {
        println!();
        println!("{}", "Next steps:".bold());
        for instruction in &report.instructions {
            println!("  • {instruction}");
        }
    }
}

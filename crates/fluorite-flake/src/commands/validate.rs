use anyhow::Context;
use colored::Colorize;
use fluorite_provision::{DatabaseCredentials, validate_credentials};
use std::path::Path;

pub fn handle(file: &Path, min_token_len: usize) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let credentials: DatabaseCredentials =
        serde_json::from_str(&raw).context("file is not a credentials bundle")?;

    let report = validate_credentials(&credentials, min_token_len);

    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    for error in &report.errors {
        eprintln!("{} {}", "error:".red().bold(), error);
    }

    if report.valid {
        println!("{}", "Credentials bundle is valid.".green().bold());
        Ok(())
    } else {
        std::process::exit(1);
    }
}

//! vercel CLI wrapper
//!
//! Wraps the vercel CLI for Blob store provisioning. The blob subcommands
//! print human-readable text, not JSON, so decoding tries JSON first (in
//! case a future CLI version adds it) and falls back to regex extraction
//! against the documented output templates:
//!
//! ```text
//! Success! Blob store created: my-store (store_abc123) in iad1
//! ```
//!
//! ```text
//! Blob store: my-store (store_abc123) in iad1
//! Read/write token: vercel_blob_rw_abc123xyz
//! ```

use crate::error::{Result, VercelError};
use fluorite_provision::executor::{CommandOutput, ExecOptions, execute};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

static BLOB_CREATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Success! Blob store created: (?P<name>\S+) \((?P<id>[^)]+)\) in (?P<region>\S+)")
        .expect("blob-created pattern is valid")
});

static STORE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Blob store: (?P<name>\S+) \((?P<id>[^)]+)\) in (?P<region>\S+)")
        .expect("store-header pattern is valid")
});

static STORE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Read/write token: (?P<token>\S+)").expect("store-token pattern is valid")
});

/// vercel CLI wrapper
pub struct VercelCli {
    options: ExecOptions,
}

impl Default for VercelCli {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl VercelCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            options: ExecOptions::with_timeout(timeout),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = execute("vercel", args, &self.options).await;
        if output.spawn_failed() {
            return Err(VercelError::VercelNotFound);
        }
        Ok(output)
    }

    /// Check if vercel is installed and authenticated.
    pub async fn whoami(&self) -> Result<Option<String>> {
        let output = self.run(&["whoami"]).await?;

        if !output.success {
            let message = output.failure_message();
            if message.to_lowercase().contains("credentials") {
                return Ok(None);
            }
            return Err(VercelError::CommandFailed(message));
        }
        let username = output.stdout.trim();
        if username.is_empty() {
            return Ok(None);
        }
        Ok(Some(username.to_string()))
    }

    /// Create a Blob store and return its name, id and region.
    pub async fn create_blob_store(&self, name: &str) -> Result<BlobStoreInfo> {
        let output = self.run(&["blob", "store", "add", name]).await?;

        if !output.success {
            return Err(VercelError::CreationFailed(output.failure_message()));
        }

        parse_blob_created(&output.stdout)
    }

    /// Fetch a Blob store's details, including its read/write token when
    /// the CLI surfaces one.
    pub async fn get_store(&self, id: &str) -> Result<BlobStoreDetails> {
        let output = self.run(&["blob", "store", "get", id]).await?;

        if !output.success {
            return Err(VercelError::CommandFailed(output.failure_message()));
        }

        parse_store_details(&output.stdout)
    }
}

/// Decode the output of `vercel blob store add`: JSON when available,
/// otherwise the documented success line.
pub fn parse_blob_created(stdout: &str) -> Result<BlobStoreInfo> {
    let trimmed = stdout.trim();

    if let Ok(info) = serde_json::from_str::<BlobStoreInfo>(trimmed) {
        return Ok(info);
    }

    if let Some(captures) = BLOB_CREATED.captures(trimmed) {
        return Ok(BlobStoreInfo {
            name: captures["name"].to_string(),
            id: captures["id"].to_string(),
            region: captures["region"].to_string(),
        });
    }

    Err(VercelError::UnrecognizedOutput(trimmed.to_string()))
}

/// Decode the output of `vercel blob store get`: JSON when available,
/// otherwise the documented header line plus an optional token line. The
/// token is genuinely optional — older CLI versions omit it — but an
/// unrecognizable header is an error, never a guess.
pub fn parse_store_details(stdout: &str) -> Result<BlobStoreDetails> {
    let trimmed = stdout.trim();

    if let Ok(details) = serde_json::from_str::<BlobStoreDetails>(trimmed) {
        return Ok(details);
    }

    let header = STORE_HEADER
        .captures(trimmed)
        .ok_or_else(|| VercelError::UnrecognizedOutput(trimmed.to_string()))?;
    let token = STORE_TOKEN
        .captures(trimmed)
        .map(|captures| captures["token"].to_string());

    Ok(BlobStoreDetails {
        name: header["name"].to_string(),
        id: header["id"].to_string(),
        region: header["region"].to_string(),
        read_write_token: token,
    })
}

/// Blob store information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobStoreInfo {
    pub name: String,
    pub id: String,
    pub region: String,
}

/// Blob store details from `vercel blob store get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobStoreDetails {
    pub name: String,
    pub id: String,
    pub region: String,

    #[serde(default)]
    pub read_write_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_line_extracts_name_id_and_region() {
        let info =
            parse_blob_created("Success! Blob store created: my-store (store_abc123) in iad1\n")
                .unwrap();

        assert_eq!(
            info,
            BlobStoreInfo {
                name: "my-store".to_string(),
                id: "store_abc123".to_string(),
                region: "iad1".to_string(),
            }
        );
    }

    #[test]
    fn json_output_is_preferred_when_present() {
        let info = parse_blob_created(r#"{"name": "my-store", "id": "store_1", "region": "fra1"}"#)
            .unwrap();

        assert_eq!(info.id, "store_1");
        assert_eq!(info.region, "fra1");
    }

    #[test]
    fn unknown_text_is_an_error_never_a_guess() {
        let err = parse_blob_created("Blob store might have been created?").unwrap_err();
        assert!(matches!(err, VercelError::UnrecognizedOutput(_)));
    }

    #[test]
    fn store_details_extract_header_and_token() {
        let details = parse_store_details(
            "Blob store: my-store (store_abc123) in iad1\nRead/write token: vercel_blob_rw_abc123xyz\n",
        )
        .unwrap();

        assert_eq!(
            details,
            BlobStoreDetails {
                name: "my-store".to_string(),
                id: "store_abc123".to_string(),
                region: "iad1".to_string(),
                read_write_token: Some("vercel_blob_rw_abc123xyz".to_string()),
            }
        );
    }

    #[test]
    fn store_details_token_is_optional() {
        let details =
            parse_store_details("Blob store: my-store (store_abc123) in iad1\n").unwrap();

        assert_eq!(details.id, "store_abc123");
        assert_eq!(details.read_write_token, None);
    }

    #[test]
    fn store_details_json_is_preferred_when_present() {
        let details = parse_store_details(
            r#"{"name": "my-store", "id": "store_1", "region": "fra1", "read_write_token": "rw_1"}"#,
        )
        .unwrap();

        assert_eq!(details.read_write_token.as_deref(), Some("rw_1"));
    }

    #[test]
    fn store_details_unknown_text_is_an_error() {
        let err = parse_store_details("Store lookup maybe worked").unwrap_err();
        assert!(matches!(err, VercelError::UnrecognizedOutput(_)));
    }
}

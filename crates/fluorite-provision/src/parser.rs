//! Provider CLI output decoding
//!
//! JSON output is decoded strictly: a failed command passes its failure
//! through untouched, malformed JSON is an error naming the parse failure,
//! and a missing expected field is a failure rather than a best-effort
//! partial object. Providers whose CLIs only print human-readable text
//! (Vercel Blob) keep their own regex fallbacks next to their wrappers.

use crate::error::{ProvisionError, Result};
use crate::executor::CommandOutput;
use serde::de::DeserializeOwned;

/// Decode the stdout of a successful command as JSON.
pub fn parse_json<T: DeserializeOwned>(output: &CommandOutput) -> Result<T> {
    if !output.success {
        return Err(ProvisionError::CommandFailed(output.failure_message()));
    }

    serde_json::from_str(output.stdout.trim())
        .map_err(|e| ProvisionError::UnexpectedOutput(format!("invalid JSON from CLI: {e}")))
}

/// The trimmed stdout of a successful command, for CLIs that print a bare
/// value (e.g. `turso db show <name> --url`).
pub fn parse_text_line(output: &CommandOutput) -> Result<String> {
    if !output.success {
        return Err(ProvisionError::CommandFailed(output.failure_message()));
    }

    let line = output.stdout.trim();
    if line.is_empty() {
        return Err(ProvisionError::UnexpectedOutput(
            "expected a value on stdout, got nothing".to_string(),
        ));
    }
    Ok(line.to_string())
}

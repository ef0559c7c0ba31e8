//! Failure classification and recovery planning
//!
//! Provider CLIs report errors as free text, so classification is substring
//! matching against known phrases. All phrase matching lives here and in the
//! per-provider `classify_failure` overrides; orchestration logic never
//! inspects raw stderr itself.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};

/// What the classifier decided to do about a failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryResult {
    /// Whether the run can continue (only ever true for the network path,
    /// after a successful retry)
    pub recovered: bool,

    /// Short machine-readable label of the action taken
    pub action_taken: String,

    /// Operator-facing guidance; rendering is the CLI layer's concern
    pub message: String,
}

impl RecoveryResult {
    pub fn not_recovered(action_taken: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recovered: false,
            action_taken: action_taken.into(),
            message: message.into(),
        }
    }

    pub fn recovered(action_taken: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recovered: true,
            action_taken: action_taken.into(),
            message: message.into(),
        }
    }
}

/// Phrases common across provider CLIs, matched case-insensitively.
/// Order matters: the first table with a hit wins.
const AUTH_PHRASES: [&str; 6] = [
    "not authenticated",
    "not logged in",
    "unauthorized",
    "login required",
    "invalid token",
    "token expired",
];

const QUOTA_PHRASES: [&str; 4] = [
    "quota",
    "plan limit",
    "limit reached",
    "upgrade your plan",
];

const NETWORK_PHRASES: [&str; 7] = [
    "network",
    "timeout",
    "timed out",
    "connection refused",
    "connection reset",
    "temporarily unavailable",
    "could not resolve",
];

const CONFLICT_PHRASES: [&str; 3] = ["already exists", "already taken", "duplicate"];

/// Map raw CLI stderr onto the failure taxonomy.
pub fn classify_stderr(stderr: &str) -> ErrorKind {
    let lowered = stderr.to_lowercase();
    let matches = |phrases: &[&str]| phrases.iter().any(|p| lowered.contains(p));

    if matches(&AUTH_PHRASES) {
        ErrorKind::AuthenticationFailed
    } else if matches(&QUOTA_PHRASES) {
        ErrorKind::QuotaExceeded
    } else if matches(&NETWORK_PHRASES) {
        ErrorKind::NetworkError
    } else if matches(&CONFLICT_PHRASES) {
        ErrorKind::NamingConflict
    } else {
        ErrorKind::Unknown
    }
}

/// Context for composing operator guidance
#[derive(Debug, Clone, Copy)]
pub struct RecoveryContext<'a> {
    pub provider_display_name: &'a str,
    pub login_hint: &'a str,
    pub project_name: &'a str,
}

/// The recovery action for one failure kind.
///
/// Exhaustive over the taxonomy. Only `NetworkError` is recoverable, and
/// even there this function only *plans* the retry; the orchestrator runs it
/// and reports `recovered = true` if it succeeds.
pub fn plan_recovery(kind: ErrorKind, raw_message: &str, ctx: &RecoveryContext<'_>) -> RecoveryResult {
    match kind {
        ErrorKind::AuthenticationFailed => RecoveryResult::not_recovered(
            "login-required",
            format!(
                "Authentication with {} failed. Run `{}` and retry provisioning.",
                ctx.provider_display_name, ctx.login_hint
            ),
        ),
        ErrorKind::QuotaExceeded => RecoveryResult::not_recovered(
            "quota-guidance",
            format!(
                "{} rejected the request because your account is at its plan limit. \
                 Delete unused databases or upgrade your plan, then retry.",
                ctx.provider_display_name
            ),
        ),
        ErrorKind::NetworkError => RecoveryResult::not_recovered(
            "retry-with-backoff",
            format!(
                "Transient network failure while talking to {}. \
                 Provisioning will be retried with exponential backoff.",
                ctx.provider_display_name
            ),
        ),
        ErrorKind::NamingConflict => RecoveryResult::not_recovered(
            "rename-guidance",
            format!(
                "A database for project `{}` already exists on {}. \
                 Re-run with --preserve-existing to reuse it, or choose different database names.",
                ctx.project_name, ctx.provider_display_name
            ),
        ),
        ErrorKind::Unknown => {
            tracing::error!("unclassified provisioning failure: {raw_message}");
            RecoveryResult::not_recovered(
                "logged",
                format!("Provisioning failed with an unrecognized error: {raw_message}"),
            )
        }
    }
}

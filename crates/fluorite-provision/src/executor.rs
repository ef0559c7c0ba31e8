//! External CLI execution
//!
//! Runs provider binaries (`turso`, `supabase`, `vercel`) as subprocesses
//! with a per-call timeout. Failures at this layer never panic and never
//! retry: a spawn error, non-zero exit or timeout all resolve into a
//! [`CommandOutput`] the caller can inspect.

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Why a command produced no usable exit status
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command timeout after {0}ms")]
    Timeout(u64),

    #[error("Failed to read output of {program}: {source}")]
    Output {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, ExecError::Spawn { .. })
    }
}

/// Per-call execution options
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub timeout: Duration,

    /// Extra environment variables injected into the subprocess
    pub envs: Vec<(String, String)>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            // Supabase project creation regularly takes over a minute
            timeout: Duration::from_secs(120),
            envs: Vec::new(),
        }
    }
}

impl ExecOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// Captured result of one subprocess invocation
#[derive(Debug)]
pub struct CommandOutput {
    /// True only if the process exited with status 0
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// Exit code if the process ran to completion
    pub exit_code: Option<i32>,
    /// Set when the process never produced an exit status
    pub error: Option<ExecError>,
}

impl CommandOutput {
    fn failed(error: ExecError) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            error: Some(error),
        }
    }

    /// Human-readable reason for a failed command: the exec error if the
    /// process never finished, otherwise its stderr.
    pub fn failure_message(&self) -> String {
        if let Some(ref error) = self.error {
            return error.to_string();
        }
        if !self.stderr.trim().is_empty() {
            return self.stderr.trim().to_string();
        }
        format!("exit code {:?}", self.exit_code)
    }

    pub fn spawn_failed(&self) -> bool {
        self.error.as_ref().is_some_and(ExecError::is_spawn_failure)
    }
}

/// Run `program` with `args`, capturing stdout/stderr.
///
/// Resolves when the process exits or `options.timeout` fires, whichever
/// comes first. On timeout the child is killed (`kill_on_drop`) and the
/// output carries [`ExecError::Timeout`].
pub async fn execute(program: &str, args: &[&str], options: &ExecOptions) -> CommandOutput {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);
    for (key, value) in &options.envs {
        cmd.env(key, value);
    }

    tracing::debug!("Running: {} {}", program, args.join(" "));

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            return CommandOutput::failed(ExecError::Spawn {
                program: program.to_string(),
                source,
            });
        }
    };

    // Dropping the wait future on timeout kills the child via kill_on_drop.
    match tokio::time::timeout(options.timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            error: None,
        },
        Ok(Err(source)) => CommandOutput::failed(ExecError::Output {
            program: program.to_string(),
            source,
        }),
        Err(_) => CommandOutput::failed(ExecError::Timeout(options.timeout.as_millis() as u64)),
    }
}

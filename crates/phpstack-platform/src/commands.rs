use async_trait::async_trait;
use log::{debug, trace};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Captured result of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("failed to start {program} ({kind}): {message}")]
    Spawn {
        program: String,
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("{program} is not installed")]
    NotInstalled { program: String },

    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },
}

/// Capability to run external programs. Package managers, service managers
/// and shells are all reached through this seam.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;
}

#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn build_command(program: &str, args: &[&str]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.env("TERM", "dumb");
        cmd.env("NO_COLOR", "1");
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        if which::which(program).is_err() {
            return Err(CommandError::NotInstalled {
                program: program.to_string(),
            });
        }

        debug!("Running command: {program} {}", args.join(" "));

        let output = tokio::time::timeout(
            self.timeout,
            Self::build_command(program, args).output(),
        )
        .await
        .map_err(|_| CommandError::Timeout {
            program: program.to_string(),
            seconds: self.timeout.as_secs(),
        })?
        .map_err(|error| CommandError::Spawn {
            program: program.to_string(),
            kind: error.kind(),
            message: error.to_string(),
        })?;

        debug!("{program} exit status: {:?}", output.status);
        trace!("{program} stdout: {}", String::from_utf8_lossy(&output.stdout));
        if !output.stderr.is_empty() {
            trace!("{program} stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

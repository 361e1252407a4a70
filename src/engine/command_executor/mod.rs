//! Command executor for the external tools the pipeline drives
//!
//! Every package manager, VCS and hosting CLI invocation goes through the
//! [`CommandRunner`] trait. Commands are spawned directly with an argv array
//! via `tokio::process::Command`; no shell is involved, so the app name is
//! always a literal argument.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

use crate::{Result, ScaffoldError};

#[cfg(test)]
pub(crate) mod recording;

#[cfg(test)]
pub(crate) use recording::RecordingRunner;

/// A single external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Program to execute (must be in PATH or absolute path)
    pub program: String,
    /// Arguments to pass to the program
    pub args: Vec<String>,
    /// Working directory for execution
    pub working_dir: Option<PathBuf>,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code of the process (-1 when terminated by a signal)
    pub exit_code: i32,
    /// Standard output (if captured)
    pub stdout: Option<String>,
    /// Standard error (if captured)
    pub stderr: Option<String>,
    /// Whether the process exited successfully
    pub success: bool,
}

impl ExecutionResult {
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            stdout: None,
            stderr: None,
            success: true,
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: None,
            stderr: Some(stderr.into()),
            success: false,
        }
    }

    /// Short human-readable reason for a failed run
    pub fn failure_reason(&self) -> String {
        let detail = self
            .stderr
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.lines().last())
            .unwrap_or("no output");
        format!("exit code {}: {}", self.exit_code, detail)
    }
}

/// Seam between the pipeline and the operating system
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing its output
    async fn run(&self, command: &Command) -> Result<ExecutionResult>;

    /// Run a command attached to the current terminal (output is not captured)
    async fn run_attached(&self, command: &Command) -> Result<ExecutionResult>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn prepare(command: &Command) -> TokioCommand {
        let mut cmd = TokioCommand::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn spawn_error(command: &Command, source: std::io::Error) -> ScaffoldError {
        ScaffoldError::Spawn {
            program: command.program.clone(),
            source,
        }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &Command) -> Result<ExecutionResult> {
        debug!("Executing: {} (cwd: {:?})", command, command.working_dir);

        let output = Self::prepare(command)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::spawn_error(command, e))?;

        let result = ExecutionResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            success: output.status.success(),
        };

        if !result.success {
            warn!("Command '{}' failed with {}", command, result.failure_reason());
        }
        Ok(result)
    }

    async fn run_attached(&self, command: &Command) -> Result<ExecutionResult> {
        debug!("Executing attached: {} (cwd: {:?})", command, command.working_dir);

        let status = Self::prepare(command)
            .status()
            .await
            .map_err(|e| Self::spawn_error(command, e))?;

        Ok(ExecutionResult {
            exit_code: status.code().unwrap_or(-1),
            stdout: None,
            stderr: None,
            success: status.success(),
        })
    }
}

/// Check which of the given tools cannot be launched
///
/// Each tool is probed with `<tool> --version`. A tool that spawns but exits
/// non-zero still counts as present.
pub async fn preflight(runner: &dyn CommandRunner, tools: &[&str]) -> Vec<String> {
    let mut missing = Vec::new();
    for tool in tools {
        let probe = Command::new(*tool).arg("--version");
        match runner.run(&probe).await {
            Ok(_) => debug!("Found tool '{}'", tool),
            Err(e) => {
                warn!("Tool '{}' is not available: {}", tool, e);
                missing.push(tool.to_string());
            }
        }
    }
    missing
}

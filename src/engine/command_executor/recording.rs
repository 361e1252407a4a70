//! In-process runner that records commands instead of spawning them.
//! Only compiled for unit tests; integration tests carry their own copy under
//! `tests/common`.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use super::{Command, CommandRunner, ExecutionResult};
use crate::{Result, ScaffoldError};

/// Manifest produced by `npm init -y` for a fresh directory
pub fn npm_init_manifest(name: &str) -> String {
    format!(
        r#"{{
  "name": "{name}",
  "version": "1.0.0",
  "description": "",
  "main": "index.js",
  "scripts": {{
    "test": "echo \"Error: no test specified\" && exit 1"
  }},
  "keywords": [],
  "author": "",
  "license": "ISC"
}}
"#
    )
}

/// Records every command it is asked to run and reports success
///
/// Individual commands can be made to fail (non-zero exit) or to be
/// unlaunchable.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Command>>,
    failing: HashSet<String>,
    missing: HashSet<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation whose display form starts with `prefix` exit 1
    pub fn failing(mut self, prefix: impl Into<String>) -> Self {
        self.failing.insert(prefix.into());
        self
    }

    /// Make `program` behave as if it were not installed
    pub fn missing(mut self, program: impl Into<String>) -> Self {
        self.missing.insert(program.into());
        self
    }

    pub fn calls(&self) -> Vec<Command> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Display forms of the recorded commands, in order
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    async fn record(&self, command: &Command) -> Result<ExecutionResult> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }

        if self.missing.contains(&command.program) {
            return Err(ScaffoldError::Spawn {
                program: command.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }

        let line = command.to_string();
        if self.failing.iter().any(|prefix| line.starts_with(prefix.as_str())) {
            return Ok(ExecutionResult::failure(1, format!("{} failed", line)));
        }

        Ok(ExecutionResult::success())
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &Command) -> Result<ExecutionResult> {
        self.record(command).await
    }

    async fn run_attached(&self, command: &Command) -> Result<ExecutionResult> {
        self.record(command).await
    }
}

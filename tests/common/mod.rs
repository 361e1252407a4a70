//! Shared helpers for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use react_to_heroku::engine::command_executor::{Command, CommandRunner, ExecutionResult};
use react_to_heroku::{Result, ScaffoldError};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

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

pub fn read_manifest(root: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(root.join("package.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

/// Records commands instead of spawning them
///
/// When the configured init tool runs `init`, the manifest is written to the
/// command's working directory the way the package manager would.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Command>>,
    failing: HashSet<String>,
    missing: HashSet<String>,
    init: Option<(String, String)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `manifest` to `<cwd>/package.json` when `<tool> init` runs
    pub fn with_init_manifest(mut self, tool: &str, manifest: impl Into<String>) -> Self {
        self.init = Some((tool.to_string(), manifest.into()));
        self
    }

    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.insert(prefix.to_string());
        self
    }

    pub fn missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Command> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    fn record(&self, command: &Command) -> Result<ExecutionResult> {
        self.calls.lock().unwrap().push(command.clone());

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

        if let Some((tool, manifest)) = &self.init {
            let is_init = command.program == *tool
                && command.args.first().map(String::as_str) == Some("init");
            if let (true, Some(dir)) = (is_init, &command.working_dir) {
                std::fs::write(dir.join("package.json"), manifest)?;
            }
        }

        Ok(ExecutionResult::success())
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &Command) -> Result<ExecutionResult> {
        self.record(command)
    }

    async fn run_attached(&self, command: &Command) -> Result<ExecutionResult> {
        self.record(command)
    }
}

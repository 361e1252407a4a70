use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::engine::StageKind;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// react-to-heroku: scaffold a React app and provision it on Heroku
#[derive(Parser, Debug)]
#[command(name = "react-to-heroku")]
#[command(version)]
#[command(about = "Scaffold a React + Webpack app and provision it on Heroku")]
pub struct Cli {
    /// Name of the app (directory, package and Heroku app prefix)
    #[arg(value_name = "APP_NAME")]
    pub app_name: Option<String>,

    /// Directory to create the app in
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file (default: ./react-to-heroku.yaml, then the user config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Set log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Stages to skip (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub skip: Vec<StageKind>,

    /// Do not run the start script after the first build
    #[arg(long)]
    pub no_start: bool,

    /// Commit and push the new app to Heroku
    #[arg(long)]
    pub deploy: bool,

    /// Fail when the generated package.json lacks an expected placeholder
    #[arg(long)]
    pub strict_manifest: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            skip: self.skip.clone(),
            no_start: self.no_start,
            deploy: self.deploy,
            strict_manifest: self.strict_manifest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["react-to-heroku", "demo"]);
        assert_eq!(cli.app_name.as_deref(), Some("demo"));
        assert_eq!(cli.dir, PathBuf::from("."));
        assert_eq!(cli.log_level, LogLevel::Info);
        assert!(cli.skip.is_empty());
        assert!(!cli.deploy);
    }

    #[test]
    fn test_name_is_optional() {
        let cli = Cli::parse_from(["react-to-heroku"]);
        assert!(cli.app_name.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "react-to-heroku",
            "demo",
            "--skip",
            "dependencies,build",
            "--no-start",
            "--deploy",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.skip, vec![StageKind::Dependencies, StageKind::Build]);
        assert_eq!(cli.log_level.to_filter_directive(), "debug");

        let overrides = cli.overrides();
        assert!(overrides.no_start);
        assert!(overrides.deploy);
        assert!(!overrides.strict_manifest);
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        assert!(Cli::try_parse_from(["react-to-heroku", "demo", "--skip", "lint"]).is_err());
    }
}

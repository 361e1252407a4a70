pub mod app;

pub use app::{Cli, LogLevel};

use crate::config::{ConfigLoader, ScaffoldConfig};
use crate::engine::command_executor::CommandRunner;
use crate::engine::naming::{AppName, AppNumber};
use crate::engine::{Pipeline, PipelineReport, PipelineState, StageOutcome};
use crate::Result;
use tracing::info;

/// Resolve configuration and run the pipeline for the parsed command line
pub async fn execute(cli: &Cli, runner: &dyn CommandRunner) -> Result<PipelineReport> {
    let raw_name = cli.app_name.as_deref();
    // A missing or invalid name ends in the usage text, whatever the config holds
    if AppName::parse(raw_name).is_err() {
        let pipeline = Pipeline::new(ScaffoldConfig::default(), runner, &cli.dir);
        return Ok(pipeline.run(raw_name, AppNumber::random()).await);
    }

    let (mut config, source) = ConfigLoader::new(&cli.dir)
        .with_explicit(cli.config.clone())
        .load()?;
    info!("Using configuration from {:?}", source);
    cli.overrides().apply(&mut config);

    let pipeline = Pipeline::new(config, runner, &cli.dir).with_preflight(true);
    Ok(pipeline.run(raw_name, AppNumber::random()).await)
}

/// Final lines shown to the user
pub fn summary(report: &PipelineReport) -> Vec<String> {
    let name = report.app_name.as_deref().unwrap_or("app");
    let mut lines = Vec::new();

    match report.state {
        PipelineState::Aborted => return lines,
        PipelineState::Done => {
            let skipped: Vec<String> = report
                .stages
                .iter()
                .filter(|r| r.outcome == StageOutcome::Skipped)
                .map(|r| r.stage.to_string())
                .collect();
            if report.warnings().is_empty() {
                lines.push(format!("Congratulations! {} is set up.", name));
            } else {
                lines.push(format!("{} was created, but some steps failed:", name));
                for (stage, reason) in report.warnings() {
                    lines.push(format!("  - {}: {}", stage, reason));
                }
            }
            if !skipped.is_empty() {
                lines.push(format!("Skipped: {}", skipped.join(", ")));
            }
            if let Some(hosting_app) = &report.hosting_app {
                lines.push(format!("Heroku app: {}", hosting_app));
            }
        }
        _ => {
            lines.push(format!(
                "Setting up {} failed: {}",
                name,
                report.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }
    lines
}

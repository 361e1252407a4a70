//! Version control and hosting platform setup
//!
//! Every sub-step is attempted even when an earlier one fails; the stage
//! reports all failures together.

use serde_json::json;
use std::path::Path;
use tracing::{debug, info};

use super::command_executor::{Command, CommandRunner};
use super::{ensure_success, Project, StageKind};
use crate::config::ScaffoldConfig;
use crate::{Result, ScaffoldError};

/// Ignore rules mentioning this are dropped so the build output gets committed
pub const BUILD_OUTPUT_PATTERN: &str = "build";

/// Static buildpack descriptor serving the build output
pub fn static_descriptor() -> String {
    format!("{}\n", json!({ "root": "build/" }))
}

/// Remove every ignore rule that mentions the build output
pub fn filter_build_rules(gitignore: &str) -> String {
    let mut kept: String = gitignore
        .lines()
        .filter(|line| !line.contains(BUILD_OUTPUT_PATTERN))
        .collect::<Vec<_>>()
        .join("\n");
    if !kept.is_empty() {
        kept.push('\n');
    }
    kept
}

pub fn vcs_commands(config: &ScaffoldConfig, project: &Project) -> Vec<Command> {
    let root = &project.layout.root;
    vec![
        Command::new(&config.vcs).arg("init").current_dir(root),
        Command::new(&config.hosting_cli)
            .args(["create".to_string(), project.hosting_app()])
            .args(["-b", config.buildpack_url.as_str()])
            .current_dir(root),
    ]
}

async fn rewrite_gitignore(path: &Path) -> Result<()> {
    if !path.exists() {
        debug!("No ignore file at {:?}, nothing to filter", path);
        return Ok(());
    }

    let contents = tokio::fs::read_to_string(path).await?;
    let staged = path.with_extension("new");
    tokio::fs::write(&staged, filter_build_rules(&contents)).await?;
    tokio::fs::rename(&staged, path).await?;
    Ok(())
}

pub async fn initialize(runner: &dyn CommandRunner, config: &ScaffoldConfig, project: &Project) -> Result<()> {
    info!("Registering hosting app '{}'", project.hosting_app());
    let mut failures = Vec::new();

    for command in vcs_commands(config, project) {
        let outcome = match runner.run(&command).await {
            Ok(result) => ensure_success(StageKind::Vcs, &command, &result),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            failures.push(e.to_string());
        }
    }

    let layout = &project.layout;
    if let Err(e) = tokio::fs::write(layout.static_descriptor(), static_descriptor()).await {
        failures.push(format!("failed to write static.json: {}", e));
    }

    if let Err(e) = rewrite_gitignore(&layout.gitignore()).await {
        failures.push(format!("failed to rewrite .gitignore: {}", e));
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ScaffoldError::Stage {
            stage: StageKind::Vcs.name().to_string(),
            reason: failures.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command_executor::RecordingRunner;
    use crate::engine::naming::{AppName, AppNumber};
    use tempfile::TempDir;

    fn project(parent: &Path) -> Project {
        let project = Project::new(
            AppName::parse(Some("demo")).unwrap(),
            AppNumber::new(123).unwrap(),
            parent,
        );
        std::fs::create_dir_all(&project.layout.root).unwrap();
        project
    }

    #[test]
    fn test_static_descriptor() {
        assert_eq!(static_descriptor(), "{\"root\":\"build/\"}\n");
    }

    #[test]
    fn test_filter_build_rules() {
        let input = "node_modules\n/build\ncoverage\nbuild-cache/\n";
        assert_eq!(filter_build_rules(input), "node_modules\ncoverage\n");
        assert_eq!(filter_build_rules("/build\n"), "");
    }

    #[tokio::test]
    async fn test_initialize_runs_everything() {
        let temp_dir = TempDir::new().unwrap();
        let project = project(temp_dir.path());
        std::fs::write(project.layout.gitignore(), "node_modules\nbuild\n").unwrap();
        let runner = RecordingRunner::new();

        initialize(&runner, &ScaffoldConfig::default(), &project).await.unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                "git init".to_string(),
                "heroku create demo-123 -b https://github.com/heroku/heroku-buildpack-static.git"
                    .to_string(),
            ]
        );
        let descriptor = std::fs::read_to_string(project.layout.static_descriptor()).unwrap();
        assert_eq!(descriptor, "{\"root\":\"build/\"}\n");
        let gitignore = std::fs::read_to_string(project.layout.gitignore()).unwrap();
        assert_eq!(gitignore, "node_modules\n");
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_later_steps() {
        let temp_dir = TempDir::new().unwrap();
        let project = project(temp_dir.path());
        let runner = RecordingRunner::new().failing("git init").missing("heroku");

        let err = initialize(&runner, &ScaffoldConfig::default(), &project).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("git init"));
        assert!(message.contains("heroku"));
        assert_eq!(runner.calls().len(), 2);
        assert!(project.layout.static_descriptor().exists());
    }
}

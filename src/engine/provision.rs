//! Directory provisioner

use tracing::{debug, info};

use super::command_executor::{Command, CommandRunner};
use super::{ensure_success, StageKind};
use crate::config::ScaffoldConfig;
use crate::io::paths::AppLayout;
use crate::{Result, ScaffoldError};

/// Non-interactive manifest initialization inside the app root
pub fn init_command(config: &ScaffoldConfig, layout: &AppLayout) -> Command {
    Command::new(&config.init_tool)
        .args(["init", "-y"])
        .current_dir(&layout.root)
}

/// Create the app's directory tree and its initial manifest
///
/// The app root must not exist yet.
pub async fn provision(runner: &dyn CommandRunner, config: &ScaffoldConfig, layout: &AppLayout) -> Result<()> {
    info!("Creating directory tree at {:?}", layout.root);

    tokio::fs::create_dir(&layout.root).await.map_err(|e| ScaffoldError::Stage {
        stage: StageKind::Provision.name().to_string(),
        reason: format!("cannot create {}: {}", layout.root.display(), e),
    })?;

    for dir in layout.directories().iter().skip(1) {
        tokio::fs::create_dir_all(dir).await?;
        debug!("Created {:?}", dir);
    }

    let command = init_command(config, layout);
    let result = runner.run(&command).await?;
    ensure_success(StageKind::Provision, &command, &result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command_executor::RecordingRunner;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_tree_and_runs_init() {
        let temp_dir = TempDir::new().unwrap();
        let layout = AppLayout::new(temp_dir.path(), "demo");
        let runner = RecordingRunner::new();

        provision(&runner, &ScaffoldConfig::default(), &layout).await.unwrap();

        for dir in layout.directories() {
            assert!(dir.is_dir(), "{:?} missing", dir);
        }
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to_string(), "npm init -y");
        assert_eq!(calls[0].working_dir.as_deref(), Some(layout.root.as_path()));
    }

    #[tokio::test]
    async fn test_existing_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let layout = AppLayout::new(temp_dir.path(), "demo");
        std::fs::create_dir(&layout.root).unwrap();
        let runner = RecordingRunner::new();

        let err = provision(&runner, &ScaffoldConfig::default(), &layout).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Stage { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_init_fails_stage() {
        let temp_dir = TempDir::new().unwrap();
        let layout = AppLayout::new(temp_dir.path(), "demo");
        let runner = RecordingRunner::new().failing("npm init");

        let result = provision(&runner, &ScaffoldConfig::default(), &layout).await;
        assert!(result.is_err());
        // Directories stay behind; there is no rollback
        assert!(layout.tests_dir().is_dir());
    }
}

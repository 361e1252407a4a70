//! First build of the generated app

use tracing::info;

use super::command_executor::{Command, CommandRunner};
use super::{ensure_success, StageKind};
use crate::config::ScaffoldConfig;
use crate::io::paths::AppLayout;
use crate::Result;

/// Invocation of a manifest script (`npm` needs `run`, the others do not)
pub fn script_command(package_manager: &str, script: &str, layout: &AppLayout) -> Command {
    let command = Command::new(package_manager);
    let command = if package_manager == "npm" {
        command.args(["run", script])
    } else {
        command.arg(script)
    };
    command.current_dir(&layout.root)
}

/// Run the build script, then the start script attached to the terminal
///
/// The start script runs the dev server, so this only returns once the user
/// stops it.
pub async fn first_build(runner: &dyn CommandRunner, config: &ScaffoldConfig, layout: &AppLayout) -> Result<()> {
    let build = script_command(&config.package_manager, "build", layout);
    info!("Running '{}'", build);
    let result = runner.run(&build).await?;
    ensure_success(StageKind::Build, &build, &result)?;

    if !config.start_after_build {
        return Ok(());
    }

    let start = script_command(&config.package_manager, "start", layout);
    info!("Running '{}' (stop it with Ctrl-C)", start);
    let result = runner.run_attached(&start).await?;
    ensure_success(StageKind::Build, &start, &result)
}

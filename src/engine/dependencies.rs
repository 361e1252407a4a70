//! Dependency installer

use tracing::info;

use super::command_executor::{Command, CommandRunner};
use super::{run_chain, StageKind};
use crate::config::ScaffoldConfig;
use crate::io::paths::AppLayout;
use crate::Result;

/// `<pm> add [--dev] <packages...>`, spelled the way each package manager expects
pub fn add_command(package_manager: &str, packages: &[String], dev: bool) -> Command {
    let (verb, dev_flag) = match package_manager {
        "npm" => ("install", "--save-dev"),
        "pnpm" => ("add", "-D"),
        _ => ("add", "--dev"),
    };

    let mut command = Command::new(package_manager).arg(verb);
    if dev {
        command = command.arg(dev_flag);
    }
    command.args(packages.iter().cloned())
}

/// Commands the installer runs, runtime packages first
pub fn install_commands(config: &ScaffoldConfig, layout: &AppLayout) -> Vec<Command> {
    let mut commands = Vec::new();
    if !config.dependencies.is_empty() {
        commands.push(add_command(&config.package_manager, &config.dependencies, false));
    }
    if !config.dev_dependencies.is_empty() {
        commands.push(add_command(&config.package_manager, &config.dev_dependencies, true));
    }
    commands
        .into_iter()
        .map(|c| c.current_dir(&layout.root))
        .collect()
}

pub async fn install(runner: &dyn CommandRunner, config: &ScaffoldConfig, layout: &AppLayout) -> Result<()> {
    let commands = install_commands(config, layout);
    info!(
        "Adding {} runtime and {} development packages",
        config.dependencies.len(),
        config.dev_dependencies.len()
    );

    run_chain(runner, StageKind::Dependencies, &commands).await
}

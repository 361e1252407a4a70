//! Optional first deploy: commit everything and push to the hosting remote

use tracing::info;

use super::command_executor::{Command, CommandRunner};
use super::{run_chain, StageKind};
use crate::config::ScaffoldConfig;
use crate::io::paths::AppLayout;
use crate::Result;

/// Remote and branch the hosting CLI registers on `create`
pub const DEPLOY_REMOTE: &str = "heroku";
pub const DEPLOY_BRANCH: &str = "master";

pub fn deploy_commands(config: &ScaffoldConfig, layout: &AppLayout) -> Vec<Command> {
    let root = &layout.root;
    vec![
        Command::new(&config.vcs).args(["add", "."]).current_dir(root),
        Command::new(&config.vcs)
            .args(["commit", "-m", "initial commit"])
            .current_dir(root),
        Command::new(&config.vcs)
            .args(["push", DEPLOY_REMOTE, DEPLOY_BRANCH])
            .current_dir(root),
        Command::new(&config.hosting_cli).arg("open").current_dir(root),
    ]
}

pub async fn deploy(runner: &dyn CommandRunner, config: &ScaffoldConfig, layout: &AppLayout) -> Result<()> {
    info!("Pushing {:?} to {}/{}", layout.root, DEPLOY_REMOTE, DEPLOY_BRANCH);
    run_chain(runner, StageKind::Deploy, &deploy_commands(config, layout)).await
}

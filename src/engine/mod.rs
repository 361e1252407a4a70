//! Provisioning pipeline
//!
//! A run resolves the app name and then walks an ordered list of stages.
//! Each stage declares whether its failure halts the run or is recorded as a
//! warning and skipped past. The run never panics on tool failures; the
//! outcome of every stage ends up in the [`PipelineReport`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::ScaffoldConfig;
use crate::io::paths::AppLayout;
use crate::{Result, ScaffoldError};

pub mod build;
pub mod command_executor;
pub mod dependencies;
pub mod deploy;
pub mod manifest;
pub mod naming;
pub mod provision;
pub mod templates;
pub mod vcs;

use command_executor::{Command, CommandRunner, ExecutionResult};
use naming::{hosting_app_name, AppName, AppNumber};

/// Usage text printed when no usable app name was given
pub const USAGE: &str = "\nProvide an app name in the following format: \n\nreact-to-heroku app-name\n";

/// Named pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Directory tree and initial manifest
    Provision,
    /// Template files and manifest patch
    Files,
    /// Runtime and development packages
    Dependencies,
    /// Repository, hosting app, static descriptor, ignore file
    Vcs,
    /// Build and start scripts
    Build,
    /// Commit and push to the hosting remote
    Deploy,
}

/// What happens to the run when a stage fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Halt,
    Continue,
}

impl StageKind {
    pub const ALL: [StageKind; 6] = [
        StageKind::Provision,
        StageKind::Files,
        StageKind::Dependencies,
        StageKind::Vcs,
        StageKind::Build,
        StageKind::Deploy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StageKind::Provision => "provision",
            StageKind::Files => "files",
            StageKind::Dependencies => "dependencies",
            StageKind::Vcs => "vcs",
            StageKind::Build => "build",
            StageKind::Deploy => "deploy",
        }
    }

    /// Progress text shown to the user
    pub fn label(self, config: &ScaffoldConfig) -> String {
        match self {
            StageKind::Provision => "Setting up file structure".to_string(),
            StageKind::Files => "Creating files".to_string(),
            StageKind::Dependencies => {
                format!("Installing dependencies with {}", config.package_manager)
            }
            StageKind::Vcs => format!("Initialising {} and {}", config.vcs, config.hosting_cli),
            StageKind::Build => "Starting first Webpack build".to_string(),
            StageKind::Deploy => format!("Deploying to {}", config.hosting_cli),
        }
    }

    pub fn failure_policy(self) -> FailurePolicy {
        match self {
            StageKind::Provision | StageKind::Files => FailurePolicy::Halt,
            StageKind::Dependencies | StageKind::Vcs | StageKind::Build | StageKind::Deploy => {
                FailurePolicy::Continue
            }
        }
    }

    /// State the pipeline is in once this stage has run
    pub fn reached_state(self) -> PipelineState {
        match self {
            StageKind::Provision => PipelineState::DirectoriesCreated,
            StageKind::Files => PipelineState::FilesTemplated,
            StageKind::Dependencies => PipelineState::DependenciesInstalling,
            StageKind::Vcs => PipelineState::VcsInitialized,
            StageKind::Build => PipelineState::Building,
            StageKind::Deploy => PipelineState::Deploying,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pipeline-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    NameResolved,
    DirectoriesCreated,
    FilesTemplated,
    DependenciesInstalling,
    VcsInitialized,
    Building,
    Deploying,
    Done,
    /// No usable app name; nothing was touched
    Aborted,
    /// A halting stage failed
    Halted,
}

/// Result of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Succeeded,
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    pub stage: StageKind,
    pub outcome: StageOutcome,
}

/// Everything a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub app_name: Option<String>,
    pub hosting_app: Option<String>,
    pub stages: Vec<StageRecord>,
    /// Why the run aborted or halted
    pub error: Option<String>,
}

impl PipelineReport {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            app_name: None,
            hosting_app: None,
            stages: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == PipelineState::Done
    }

    pub fn outcome(&self, stage: StageKind) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.outcome)
    }

    /// Best-effort stages that failed without stopping the run
    pub fn warnings(&self) -> Vec<(StageKind, &str)> {
        self.stages
            .iter()
            .filter_map(|r| match &r.outcome {
                StageOutcome::Failed(reason) if r.stage.failure_policy() == FailurePolicy::Continue => {
                    Some((r.stage, reason.as_str()))
                }
                _ => None,
            })
            .collect()
    }
}

/// The app being generated
#[derive(Debug, Clone)]
pub struct Project {
    pub name: AppName,
    pub number: AppNumber,
    pub layout: AppLayout,
}

impl Project {
    pub fn new(name: AppName, number: AppNumber, parent_dir: &Path) -> Self {
        let layout = AppLayout::new(parent_dir, name.as_str());
        Self {
            name,
            number,
            layout,
        }
    }

    pub fn hosting_app(&self) -> String {
        hosting_app_name(&self.name, self.number)
    }
}

/// Turn a failed command into a stage error
pub(crate) fn ensure_success(stage: StageKind, command: &Command, result: &ExecutionResult) -> Result<()> {
    if result.success {
        return Ok(());
    }
    Err(ScaffoldError::Stage {
        stage: stage.name().to_string(),
        reason: format!("'{}' failed with {}", command, result.failure_reason()),
    })
}

/// Run commands in order, stopping at the first one that fails (`a && b && c`)
pub(crate) async fn run_chain(runner: &dyn CommandRunner, stage: StageKind, commands: &[Command]) -> Result<()> {
    for command in commands {
        let result = runner.run(command).await?;
        ensure_success(stage, command, &result)?;
    }
    Ok(())
}

/// Runs the provisioning stages for one app
pub struct Pipeline<'a> {
    config: ScaffoldConfig,
    runner: &'a dyn CommandRunner,
    parent_dir: PathBuf,
    preflight: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: ScaffoldConfig, runner: &'a dyn CommandRunner, parent_dir: impl AsRef<Path>) -> Self {
        Self {
            config,
            runner,
            parent_dir: parent_dir.as_ref().to_path_buf(),
            preflight: false,
        }
    }

    /// Probe the configured tools before the first stage
    pub fn with_preflight(mut self, enabled: bool) -> Self {
        self.preflight = enabled;
        self
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Stages this run will walk through
    pub fn plan(&self) -> Vec<StageKind> {
        StageKind::ALL
            .into_iter()
            .filter(|s| *s != StageKind::Deploy || self.config.deploy)
            .collect()
    }

    async fn run_stage(&self, stage: StageKind, project: &Project) -> Result<()> {
        let config = &self.config;
        let runner = self.runner;
        match stage {
            StageKind::Provision => provision::provision(runner, config, &project.layout).await,
            StageKind::Files => {
                templates::materialize(&project.layout).await?;
                manifest::patch_manifest(&project.layout.manifest(), config.strict_manifest).await?;
                Ok(())
            }
            StageKind::Dependencies => {
                dependencies::install(runner, config, &project.layout).await
            }
            StageKind::Vcs => vcs::initialize(runner, config, project).await,
            StageKind::Build => build::first_build(runner, config, &project.layout).await,
            StageKind::Deploy => deploy::deploy(runner, config, &project.layout).await,
        }
    }

    /// Run the whole pipeline for the raw first positional argument
    pub async fn run(&self, raw_name: Option<&str>, number: AppNumber) -> PipelineReport {
        let mut report = PipelineReport::new();

        let name = match AppName::parse(raw_name) {
            Ok(name) => name,
            Err(e) => {
                error!("{}", e);
                println!("{}", USAGE);
                report.state = PipelineState::Aborted;
                report.error = Some(e.to_string());
                return report;
            }
        };

        let project = Project::new(name, number, &self.parent_dir);
        report.state = PipelineState::NameResolved;
        report.app_name = Some(project.name.to_string());
        report.hosting_app = Some(project.hosting_app());
        info!(
            "Creating app '{}' in {:?} (hosting app '{}')",
            project.name,
            project.layout.root,
            project.hosting_app()
        );

        if self.preflight {
            let missing = command_executor::preflight(self.runner, &self.config.required_tools()).await;
            if !missing.is_empty() {
                warn!("Missing tools, later stages may fail: {}", missing.join(", "));
            }
        }

        let plan = self.plan();
        let total = plan.len();
        for (index, stage) in plan.into_iter().enumerate() {
            if self.config.is_skipped(stage) {
                if stage == StageKind::Provision {
                    warn!("The provision stage cannot be skipped");
                } else {
                    debug!("Skipping stage {}", stage);
                    report.stages.push(StageRecord {
                        stage,
                        outcome: StageOutcome::Skipped,
                    });
                    continue;
                }
            }

            println!("[{}/{}] {}...", index + 1, total, stage.label(&self.config));

            match self.run_stage(stage, &project).await {
                Ok(()) => {
                    report.state = stage.reached_state();
                    report.stages.push(StageRecord {
                        stage,
                        outcome: StageOutcome::Succeeded,
                    });
                }
                Err(e) => {
                    let reason = e.to_string();
                    report.stages.push(StageRecord {
                        stage,
                        outcome: StageOutcome::Failed(reason.clone()),
                    });
                    match stage.failure_policy() {
                        FailurePolicy::Halt => {
                            error!("Stage {} failed: {}", stage, reason);
                            if stage == StageKind::Provision {
                                println!("Couldn't initialise this app.");
                            }
                            report.state = PipelineState::Halted;
                            report.error = Some(reason);
                            return report;
                        }
                        FailurePolicy::Continue => {
                            warn!("Stage {} failed, continuing: {}", stage, reason);
                            report.state = stage.reached_state();
                        }
                    }
                }
            }
        }

        report.state = PipelineState::Done;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_policies() {
        assert_eq!(StageKind::Provision.failure_policy(), FailurePolicy::Halt);
        assert_eq!(StageKind::Files.failure_policy(), FailurePolicy::Halt);
        assert_eq!(StageKind::Dependencies.failure_policy(), FailurePolicy::Continue);
        assert_eq!(StageKind::Build.reached_state(), PipelineState::Building);
    }

    #[test]
    fn test_plan_includes_deploy_only_when_enabled() {
        let runner = command_executor::RecordingRunner::new();
        let pipeline = Pipeline::new(ScaffoldConfig::default(), &runner, ".");
        assert_eq!(pipeline.plan().len(), 5);
        assert!(!pipeline.plan().contains(&StageKind::Deploy));

        let config = ScaffoldConfig {
            deploy: true,
            ..ScaffoldConfig::default()
        };
        let pipeline = Pipeline::new(config, &runner, ".");
        assert_eq!(pipeline.plan().last(), Some(&StageKind::Deploy));
    }

    #[test]
    fn test_labels() {
        let config = ScaffoldConfig::default();
        assert_eq!(
            StageKind::Dependencies.label(&config),
            "Installing dependencies with yarn"
        );
        assert_eq!(StageKind::Vcs.label(&config), "Initialising git and heroku");
    }

    #[test]
    fn test_warnings_only_list_best_effort_failures() {
        let mut report = PipelineReport::new();
        report.stages = vec![
            StageRecord {
                stage: StageKind::Provision,
                outcome: StageOutcome::Succeeded,
            },
            StageRecord {
                stage: StageKind::Dependencies,
                outcome: StageOutcome::Failed("offline".to_string()),
            },
            StageRecord {
                stage: StageKind::Build,
                outcome: StageOutcome::Skipped,
            },
        ];
        assert_eq!(report.warnings(), vec![(StageKind::Dependencies, "offline")]);
    }
}

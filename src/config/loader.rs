use super::types::ScaffoldConfig;
use crate::io::paths::ScaffoldPaths;
use crate::{Result, ScaffoldError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the project-local configuration file
pub const PROJECT_CONFIG_FILE: &str = "react-to-heroku.yaml";

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    User(PathBuf),
    Defaults,
}

/// Loads [`ScaffoldConfig`] from the first location that provides one
pub struct ConfigLoader {
    explicit: Option<PathBuf>,
    parent_dir: PathBuf,
    user_config: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader that searches `parent_dir` and the user config directory
    pub fn new(parent_dir: impl AsRef<Path>) -> Self {
        let user_config = ScaffoldPaths::new().ok().map(|p| p.user_config_file());
        Self {
            explicit: None,
            parent_dir: parent_dir.as_ref().to_path_buf(),
            user_config,
        }
    }

    /// Use this file instead of searching; it must exist
    pub fn with_explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// Replace (or disable) the user-level config location
    pub fn with_user_config(mut self, path: Option<PathBuf>) -> Self {
        self.user_config = path;
        self
    }

    pub fn load(&self) -> Result<(ScaffoldConfig, ConfigSource)> {
        if let Some(path) = &self.explicit {
            if !path.is_file() {
                return Err(ScaffoldError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            let config = load_config_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.clone())));
        }

        let project = self.parent_dir.join(PROJECT_CONFIG_FILE);
        if project.is_file() {
            let config = load_config_file(&project)?;
            return Ok((config, ConfigSource::Project(project)));
        }

        if let Some(user) = &self.user_config {
            if user.is_file() {
                let config = load_config_file(user)?;
                return Ok((config, ConfigSource::User(user.clone())));
            }
        }

        debug!("No config file found, using defaults");
        Ok((ScaffoldConfig::default(), ConfigSource::Defaults))
    }
}

/// Parse a YAML config file
pub fn load_config_file(path: &Path) -> Result<ScaffoldConfig> {
    info!("Loading configuration from: {:?}", path);

    let contents = std::fs::read_to_string(path).map_err(|e| {
        ScaffoldError::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    let config: ScaffoldConfig = serde_yaml_ng::from_str(&contents).map_err(|e| {
        ScaffoldError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })?;

    Ok(config)
}

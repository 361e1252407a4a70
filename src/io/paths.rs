use crate::{Result, ScaffoldError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Per-user configuration location
#[derive(Debug, Clone)]
pub struct ScaffoldPaths {
    /// Configuration directory (e.g. ~/.config/react-to-heroku/)
    pub config_dir: PathBuf,
}

impl ScaffoldPaths {
    /// Create new paths instance using standard directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "react-to-heroku").ok_or_else(|| {
            ScaffoldError::Path("Failed to determine project directories".to_string())
        })?;

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
        })
    }

    /// Get user configuration file path
    pub fn user_config_file(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }
}

/// Directory layout of a generated app rooted at `{parent}/{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    pub root: PathBuf,
}

impl AppLayout {
    pub fn new(parent: &Path, name: &str) -> Self {
        Self {
            root: parent.join(name),
        }
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.join("public")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.src_dir().join("tests")
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join("package.json")
    }

    pub fn stylesheet(&self) -> PathBuf {
        self.src_dir().join("index.css")
    }

    pub fn static_descriptor(&self) -> PathBuf {
        self.root.join("static.json")
    }

    pub fn gitignore(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    /// Every directory the provisioner creates, parents first
    pub fn directories(&self) -> Vec<PathBuf> {
        vec![
            self.root.clone(),
            self.public_dir(),
            self.build_dir(),
            self.src_dir(),
            self.tests_dir(),
        ]
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("No app name was provided")]
    MissingAppName,

    #[error("Invalid app name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest placeholder not found: {0}")]
    ManifestPlaceholder(String),

    #[error("Stage '{stage}' failed: {reason}")]
    Stage { stage: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    Path(String),
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;

use std::path::PathBuf;

use thiserror::Error;

use auditflow_core::ConfigError;

/// Failures of the pipeline driver (IO, settings, engine configuration).
///
/// Row-level data problems are never errors here; they end up in the
/// rejected set.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("duplicate column after header normalization: {0}")]
    DuplicateHeader(String),

    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("invalid setting {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            name,
            message: message.into(),
        }
    }
}

//! Pipeline configuration (env-driven, serde-friendly).

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use auditflow_domains::Domain;

use crate::error::PipelineError;

pub const ENV_DOMAIN: &str = "AUDITFLOW_DOMAIN";
pub const ENV_DATASET: &str = "AUDITFLOW_DATASET";
pub const ENV_INPUT: &str = "AUDITFLOW_INPUT";
pub const ENV_FLAGGED_OUTPUT: &str = "AUDITFLOW_FLAGGED_OUTPUT";
pub const ENV_REJECTED_OUTPUT: &str = "AUDITFLOW_REJECTED_OUTPUT";
pub const ENV_REPORT_OUTPUT: &str = "AUDITFLOW_REPORT_OUTPUT";
pub const ENV_AS_OF: &str = "AUDITFLOW_AS_OF";
pub const ENV_WORKERS: &str = "AUDITFLOW_WORKERS";
pub const ENV_DELIMITER: &str = "AUDITFLOW_DELIMITER";

/// Where to read, what to validate against, and where to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub domain: Domain,
    /// Dataset within the domain; `None` selects the primary one.
    #[serde(default)]
    pub dataset: Option<String>,
    pub input: PathBuf,
    #[serde(default)]
    pub flagged_output: Option<PathBuf>,
    #[serde(default)]
    pub rejected_output: Option<PathBuf>,
    #[serde(default)]
    pub report_output: Option<PathBuf>,
    /// Pins "today" for future-date checks; otherwise the caller's clock is used.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_workers() -> usize {
    1
}

fn default_delimiter() -> char {
    ','
}

impl PipelineConfig {
    pub fn new(domain: Domain, input: impl Into<PathBuf>) -> Self {
        Self {
            domain,
            dataset: None,
            input: input.into(),
            flagged_output: None,
            rejected_output: None,
            report_output: None,
            as_of: None,
            workers: default_workers(),
            delimiter: default_delimiter(),
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn with_flagged_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.flagged_output = Some(path.into());
        self
    }

    pub fn with_rejected_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.rejected_output = Some(path.into());
        self
    }

    pub fn with_report_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_output = Some(path.into());
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read configuration from `AUDITFLOW_*` environment variables.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, map in tests, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let domain: Domain = get(ENV_DOMAIN)
            .ok_or(PipelineError::MissingSetting(ENV_DOMAIN))?
            .parse()?;
        let input = get(ENV_INPUT).ok_or(PipelineError::MissingSetting(ENV_INPUT))?;

        let mut config = Self::new(domain, input);
        config.dataset = get(ENV_DATASET);
        config.flagged_output = get(ENV_FLAGGED_OUTPUT).map(PathBuf::from);
        config.rejected_output = get(ENV_REJECTED_OUTPUT).map(PathBuf::from);
        config.report_output = get(ENV_REPORT_OUTPUT).map(PathBuf::from);

        if let Some(raw) = get(ENV_AS_OF) {
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|e| PipelineError::invalid(ENV_AS_OF, format!("'{raw}': {e}")))?;
            config.as_of = Some(date);
        }

        if let Some(raw) = get(ENV_WORKERS) {
            config.workers = raw
                .parse()
                .map_err(|e| PipelineError::invalid(ENV_WORKERS, format!("'{raw}': {e}")))?;
        }

        if let Some(raw) = get(ENV_DELIMITER) {
            let mut chars = raw.chars();
            config.delimiter = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(PipelineError::invalid(ENV_DELIMITER, "expected a single character")),
            };
        }

        config.delimiter_byte()?;
        Ok(config)
    }

    /// The delimiter as the single byte the CSV reader needs.
    pub fn delimiter_byte(&self) -> Result<u8, PipelineError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| PipelineError::invalid(ENV_DELIMITER, "delimiter must be ASCII"))
    }
}

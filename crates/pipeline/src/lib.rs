//! `auditflow-pipeline`: drives one audit end to end.
//!
//! Reads a CSV export, validates it against a domain profile, flags accepted
//! rows, and writes the flagged/rejected sets plus a JSON [`AuditReport`].
//! This is the only crate in the workspace that performs IO or logs.

pub mod config;
pub mod error;
pub mod reader;
pub mod report;
pub mod runner;
pub mod writer;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use report::{AuditReport, FlagSummary, RejectionSummary};
pub use runner::{AuditOutcome, audit, run, run_from_env};

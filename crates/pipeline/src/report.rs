//! Machine-readable summary of one audit run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auditflow_domains::{Domain, DomainProfile};
use auditflow_flagging::FlaggedRecord;
use auditflow_validation::{Reason, ValidationReport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionSummary {
    pub row: usize,
    /// Value of the dataset's key column (masked if it carries personal
    /// data), when the dataset has one and the cell is filled.
    pub key: Option<String>,
    pub reasons: Vec<Reason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagSummary {
    pub row: usize,
    pub key: Option<String>,
    pub explanations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub run_id: Uuid,
    pub domain: Domain,
    pub dataset: String,
    pub as_of: NaiveDate,
    pub total_rows: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub flagged: usize,
    pub rejections: Vec<RejectionSummary>,
    pub flags: Vec<FlagSummary>,
}

impl AuditReport {
    pub fn new(
        profile: &DomainProfile,
        as_of: NaiveDate,
        validation: &ValidationReport,
        flagged: &[FlaggedRecord],
    ) -> Self {
        let rejections = validation
            .rejected
            .iter()
            .map(|r| RejectionSummary {
                row: r.row,
                key: profile.raw_key(&r.raw),
                reasons: r.reasons.clone(),
            })
            .collect();

        let flags = flagged
            .iter()
            .map(|f| FlagSummary {
                row: f.row(),
                key: profile.record_key(&f.record),
                explanations: f.explanations.clone(),
            })
            .collect();

        Self {
            run_id: Uuid::now_v7(),
            domain: profile.domain,
            dataset: profile.dataset.to_string(),
            as_of,
            total_rows: validation.total(),
            accepted: validation.accepted.len(),
            rejected: validation.rejected.len(),
            flagged: flagged.len(),
            rejections,
            flags,
        }
    }

    /// Share of input rows rejected, `0.0` for empty input.
    pub fn rejection_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.rejected as f64 / self.total_rows as f64
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

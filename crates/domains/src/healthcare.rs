//! Patient billing audit.
//!
//! Exports sometimes carry the patient's name in `patient_id`. Such ids are
//! pseudonymized wherever a row key leaves the pipeline.

use auditflow_core::ConfigResult;
use auditflow_flagging::{NumberFormat, ThresholdRule};
use auditflow_validation::{FieldSpec, Predicate, RecordSchema};
use sha2::{Digest, Sha256};

use crate::{Domain, DomainProfile, KeyMask};

pub const COST_THRESHOLD: f64 = 10_000.00;

/// ICD-10 shape: letter, two digits, optional dotted extension.
pub const ICD10_PATTERN: &str = r"^[A-Z][0-9]{2}(\.[0-9A-Z]{1,4})?$";

pub const ANON_FIELD: &str = "patient_id_anon";
pub const PRIVACY_FLAG_FIELD: &str = "privacy_flag";
pub const PII_TAG: &str = "PII_ANONYMIZED";

pub fn schema() -> ConfigResult<RecordSchema> {
    RecordSchema::new([
        FieldSpec::text("patient_id"),
        FieldSpec::date("admission_date").with(Predicate::NotInFuture),
        FieldSpec::pattern("diagnosis_code", ICD10_PATTERN),
        FieldSpec::float("treatment_cost").with(Predicate::non_negative()),
        FieldSpec::text("insurance_provider"),
    ])
}

pub fn rules() -> Vec<ThresholdRule> {
    vec![
        ThresholdRule::greater_than("treatment_cost", COST_THRESHOLD)
            .with_format(NumberFormat::Currency),
    ]
}

/// Two or more space-separated, purely alphabetic words.
pub fn looks_like_name(patient_id: &str) -> bool {
    let parts: Vec<&str> = patient_id.trim().split(' ').collect();
    parts.len() >= 2 && parts.iter().all(|p| !p.is_empty() && p.chars().all(char::is_alphabetic))
}

/// `ANON-` followed by five digits of the SHA-256 of a name-like id.
/// Stable across runs; `None` for ids that are not names.
pub fn anonymize_patient_id(patient_id: &str) -> Option<String> {
    let patient_id = patient_id.trim();
    if !looks_like_name(patient_id) {
        return None;
    }
    let digest = Sha256::digest(patient_id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    Some(format!("ANON-{:05}", u64::from_be_bytes(prefix) % 100_000))
}

pub fn patient_mask() -> KeyMask {
    KeyMask {
        derived_field: ANON_FIELD,
        tag_field: PRIVACY_FLAG_FIELD,
        tag: PII_TAG,
        mask: anonymize_patient_id,
    }
}

pub fn billing() -> ConfigResult<DomainProfile> {
    DomainProfile {
        domain: Domain::Healthcare,
        dataset: "billing",
        key_field: Some("patient_id"),
        key_mask: Some(patient_mask()),
        schema: schema()?,
        rules: rules(),
    }
    .checked()
}

//! Contract review audit.

use auditflow_core::ConfigResult;
use auditflow_flagging::{NumberFormat, ThresholdRule};
use auditflow_validation::{FieldSpec, Predicate, RecordSchema};

use crate::{Domain, DomainProfile};

pub const VALUE_THRESHOLD: f64 = 1_000_000.00;

pub const CONTRACT_TYPES: [&str; 5] = [
    "NDA",
    "SaaS Agreement",
    "Vendor MSA",
    "Employment",
    "Acquisition",
];

pub fn schema() -> ConfigResult<RecordSchema> {
    RecordSchema::new([
        FieldSpec::text("contract_id"),
        FieldSpec::date("review_date").with(Predicate::NotInFuture),
        FieldSpec::one_of("contract_type", CONTRACT_TYPES),
        FieldSpec::float("contract_value_usd").with(Predicate::non_negative()),
        FieldSpec::text("reviewing_party"),
    ])
}

pub fn contracts() -> ConfigResult<DomainProfile> {
    DomainProfile {
        domain: Domain::Legal,
        dataset: "contracts",
        key_field: Some("contract_id"),
        key_mask: None,
        schema: schema()?,
        rules: vec![
            ThresholdRule::greater_than("contract_value_usd", VALUE_THRESHOLD)
                .with_template("contract_value {value} exceeds threshold {bound}")
                .with_format(NumberFormat::Currency),
        ],
    }
    .checked()
}

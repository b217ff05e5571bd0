//! CSV output for flagged and rejected rows.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use auditflow_domains::DomainProfile;
use auditflow_flagging::FlaggedRecord;
use auditflow_validation::Rejected;

use crate::error::PipelineError;

pub const ROW_COLUMN: &str = "row";
pub const FLAG_COLUMN: &str = "rule_flag";
pub const ERROR_COLUMN: &str = "_validation_error";

fn csv_writer<W: Write>(writer: W, delimiter: u8) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer)
}

/// The key column goes out masked; every other value is written as is.
fn cell(profile: &DomainProfile, name: &str, value: String) -> String {
    if profile.key_field == Some(name) && !value.is_empty() {
        profile.mask_key(&value)
    } else {
        value
    }
}

/// `row`, every schema column (typed values), derived columns in name
/// order, then `rule_flag`.
pub fn write_flagged<W: Write>(
    writer: W,
    profile: &DomainProfile,
    flagged: &[FlaggedRecord],
    delimiter: u8,
) -> Result<(), PipelineError> {
    let schema = &profile.schema;
    let derived: BTreeSet<&str> = flagged
        .iter()
        .flat_map(|f| f.record.fields().map(|(name, _)| name))
        .filter(|name| schema.field(name).is_none())
        .collect();

    let mut csv = csv_writer(writer, delimiter);
    let header: Vec<&str> = std::iter::once(ROW_COLUMN)
        .chain(schema.field_names())
        .chain(derived.iter().copied())
        .chain(std::iter::once(FLAG_COLUMN))
        .collect();
    csv.write_record(&header)?;

    for f in flagged {
        let mut line = Vec::with_capacity(header.len());
        line.push(f.row().to_string());
        for name in schema.field_names() {
            let value = f.record.get(name).map(ToString::to_string).unwrap_or_default();
            line.push(cell(profile, name, value));
        }
        for name in &derived {
            line.push(f.record.get(name).map(ToString::to_string).unwrap_or_default());
        }
        line.push(f.rule_flag());
        csv.write_record(&line)?;
    }

    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// `row`, every schema column as it was read, then `_validation_error`.
pub fn write_rejected<W: Write>(
    writer: W,
    profile: &DomainProfile,
    rejected: &[Rejected],
    delimiter: u8,
) -> Result<(), PipelineError> {
    let schema = &profile.schema;
    let mut csv = csv_writer(writer, delimiter);
    let header: Vec<&str> = std::iter::once(ROW_COLUMN)
        .chain(schema.field_names())
        .chain(std::iter::once(ERROR_COLUMN))
        .collect();
    csv.write_record(&header)?;

    for r in rejected {
        let mut line = Vec::with_capacity(header.len());
        line.push(r.row.to_string());
        for name in schema.field_names() {
            let value = r.raw.get(name).unwrap_or_default().to_string();
            line.push(cell(profile, name, value));
        }
        line.push(r.summary());
        csv.write_record(&line)?;
    }

    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub(crate) fn create(path: &Path) -> Result<File, PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    File::create(path).map_err(|e| PipelineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditflow_core::{FieldValue, RawRecord, TypedRecord};
    use auditflow_domains::{Domain, healthcare};
    use auditflow_validation::{FieldSpec, Reason, ReasonCode, RecordSchema};
    use std::collections::BTreeMap;

    fn claims() -> DomainProfile {
        DomainProfile {
            domain: Domain::Healthcare,
            dataset: "claims",
            key_field: Some("claim_id"),
            key_mask: None,
            schema: RecordSchema::new([FieldSpec::text("claim_id"), FieldSpec::float("treatment_cost")])
                .unwrap(),
            rules: Vec::new(),
        }
    }

    #[test]
    fn flagged_rows_carry_rule_flag() {
        let mut fields = BTreeMap::new();
        fields.insert("claim_id".to_string(), FieldValue::from("CL-1"));
        fields.insert("treatment_cost".to_string(), FieldValue::Float(15000.5));
        let mut record = FlaggedRecord::new(TypedRecord::new(3, fields), "treatment_cost exceeds threshold");
        record.add_explanation("second rule");

        let mut out = Vec::new();
        write_flagged(&mut out, &claims(), &[record], b',').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "row,claim_id,treatment_cost,rule_flag\n3,CL-1,15000.5,treatment_cost exceeds threshold | second rule\n"
        );
    }

    #[test]
    fn rejected_rows_keep_raw_values() {
        let rejected = Rejected {
            row: 0,
            raw: RawRecord::new().with("claim_id", "CL-2").with("treatment_cost", "n/a"),
            reasons: vec![Reason::new(
                "treatment_cost",
                ReasonCode::NotNumeric,
                "treatment_cost is not numeric (got 'n/a')",
            )],
        };

        let mut out = Vec::new();
        write_rejected(&mut out, &claims(), &[rejected], b',').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "row,claim_id,treatment_cost,_validation_error\n0,CL-2,n/a,treatment_cost is not numeric (got 'n/a')\n"
        );
    }

    #[test]
    fn empty_sets_still_write_header() {
        let mut out = Vec::new();
        write_flagged(&mut out, &claims(), &[], b';').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "row;claim_id;treatment_cost;rule_flag\n");
    }

    #[test]
    fn name_keys_are_masked_and_derived_columns_written() {
        let profile = healthcare::billing().unwrap();
        let anon = healthcare::anonymize_patient_id("Jane Doe").unwrap();

        let mut fields = BTreeMap::new();
        fields.insert("patient_id".to_string(), FieldValue::from("Jane Doe"));
        fields.insert("treatment_cost".to_string(), FieldValue::Float(12000.0));
        let mut records = vec![TypedRecord::new(0, fields)];
        assert_eq!(profile.mask_keys(&mut records), 1);
        let flagged = FlaggedRecord::new(records.remove(0), "over");

        let mut out = Vec::new();
        write_flagged(&mut out, &profile, &[flagged], b',').unwrap();
        let out = String::from_utf8(out).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("row,patient_id,admission_date,diagnosis_code,treatment_cost,insurance_provider,patient_id_anon,privacy_flag,rule_flag")
        );
        assert_eq!(lines.next().unwrap(), format!("0,{anon},,,12000,,{anon},PII_ANONYMIZED,over"));
        assert!(!out.contains("Jane"));

        let rejected = Rejected {
            row: 1,
            raw: RawRecord::new().with("patient_id", "Jane Doe").with("treatment_cost", "x"),
            reasons: vec![Reason::new("treatment_cost", ReasonCode::NotNumeric, "bad")],
        };
        let mut out = Vec::new();
        write_rejected(&mut out, &profile, &[rejected], b',').unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("Jane"));
    }
}

//! Corporate expense audit.

use auditflow_core::ConfigResult;
use auditflow_flagging::{NumberFormat, ThresholdRule};
use auditflow_validation::{FieldSpec, Predicate, RecordSchema};

use crate::{Domain, DomainProfile};

pub const AMOUNT_THRESHOLD: f64 = 10_000.00;

pub fn schema() -> ConfigResult<RecordSchema> {
    RecordSchema::new([
        FieldSpec::text("transaction_id"),
        FieldSpec::date("date").with(Predicate::NotInFuture),
        FieldSpec::text("employee_id"),
        FieldSpec::text("department"),
        FieldSpec::text("category"),
        FieldSpec::text("description"),
        FieldSpec::float("amount_usd").with(Predicate::non_negative()),
        FieldSpec::text("currency").with_default("USD"),
        FieldSpec::text("approved_by").nullable(),
    ])
}

pub fn rules() -> Vec<ThresholdRule> {
    vec![
        ThresholdRule::greater_than("amount_usd", AMOUNT_THRESHOLD)
            .with_format(NumberFormat::Currency),
    ]
}

pub fn expenses() -> ConfigResult<DomainProfile> {
    DomainProfile {
        domain: Domain::Finance,
        dataset: "expenses",
        key_field: Some("transaction_id"),
        key_mask: None,
        schema: schema()?,
        rules: rules(),
    }
    .checked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditflow_core::{FieldValue, RawRecord};
    use auditflow_flagging::flag_all;
    use auditflow_validation::validate;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
    }

    fn expense(id: &str, amount: &str) -> RawRecord {
        RawRecord::new()
            .with("transaction_id", id)
            .with("date", "2025-03-02")
            .with("employee_id", "E1042")
            .with("department", "Sales")
            .with("category", "Travel")
            .with("description", "Client dinner")
            .with("amount_usd", amount)
    }

    #[test]
    fn optional_columns_fall_back() {
        let profile = expenses().unwrap();
        let report = validate([expense("TXN-1", "120.00")], &profile.schema, today()).unwrap();
        let rec = &report.accepted[0];
        assert_eq!(rec.get("currency"), Some(&FieldValue::from("USD")));
        assert_eq!(rec.get("approved_by"), Some(&FieldValue::Null));
    }

    #[test]
    fn high_value_expense_is_flagged_in_dollars() {
        let profile = expenses().unwrap();
        let rows = [expense("TXN-1", "15000.00"), expense("TXN-2", "-5.00"), expense("TXN-3", "80")];
        let report = validate(rows, &profile.schema, today()).unwrap();
        assert_eq!(report.rejected.len(), 1);
        assert!(report.rejected[0].reasons[0].message.contains("cannot be negative"));

        let flagged = flag_all(&report.accepted, &profile.rules).unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(
            flagged[0].explanations[0],
            "amount_usd $15,000.00 exceeds threshold $10,000.00"
        );
    }
}

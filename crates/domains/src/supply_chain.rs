//! Inventory audits.
//!
//! Two datasets: the full inventory export (loose SKU shape) and warehouse
//! inventory logs, which use the strict two-letter `WH-1234` SKU format.

use auditflow_core::ConfigResult;
use auditflow_flagging::{NumberFormat, ThresholdRule};
use auditflow_validation::{FieldSpec, Predicate, RecordSchema};

use crate::{Domain, DomainProfile};

pub const PRICE_THRESHOLD: f64 = 5_000.00;
pub const SKU_PATTERN: &str = r"^[A-Z]{2,4}-[0-9]{4,6}$";
pub const STRICT_SKU_PATTERN: &str = r"^[A-Z]{2}-[0-9]{4}$";

pub fn inventory_schema() -> ConfigResult<RecordSchema> {
    RecordSchema::new([
        FieldSpec::pattern("item_sku", SKU_PATTERN),
        FieldSpec::text("warehouse_id"),
        FieldSpec::integer("stock_quantity").with(Predicate::non_negative()),
        FieldSpec::float("unit_price").with(Predicate::positive()),
        FieldSpec::date("last_restock_date").with(Predicate::NotInFuture),
    ])
}

pub fn inventory_log_schema() -> ConfigResult<RecordSchema> {
    RecordSchema::new([
        FieldSpec::pattern("item_sku", STRICT_SKU_PATTERN),
        FieldSpec::integer("stock_quantity").with(Predicate::non_negative()),
        FieldSpec::float("unit_price").with(Predicate::positive()),
    ])
}

fn high_value_rule() -> ThresholdRule {
    ThresholdRule::greater_than("unit_price", PRICE_THRESHOLD).with_format(NumberFormat::Currency)
}

pub fn inventory() -> ConfigResult<DomainProfile> {
    DomainProfile {
        domain: Domain::SupplyChain,
        dataset: "inventory",
        key_field: Some("item_sku"),
        key_mask: None,
        schema: inventory_schema()?,
        rules: vec![high_value_rule()],
    }
    .checked()
}

pub fn inventory_logs() -> ConfigResult<DomainProfile> {
    DomainProfile {
        domain: Domain::SupplyChain,
        dataset: "inventory_logs",
        key_field: Some("item_sku"),
        key_mask: None,
        schema: inventory_log_schema()?,
        rules: vec![high_value_rule().with_template("{field} {value} requires high-value review (over {bound})")],
    }
    .checked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditflow_core::RawRecord;
    use auditflow_flagging::flag_all;
    use auditflow_validation::{ReasonCode, validate};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    fn log(sku: &str, qty: &str, price: &str) -> RawRecord {
        RawRecord::new()
            .with("item_sku", sku)
            .with("stock_quantity", qty)
            .with("unit_price", price)
    }

    #[test]
    fn strict_sku_requires_dash() {
        let profile = inventory_logs().unwrap();
        let report = validate(
            [log("WH9942", "3", "10"), log("WH-9942", "3", "10")],
            &profile.schema,
            today(),
        )
        .unwrap();
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].row, 0);
        assert_eq!(report.rejected[0].reasons[0].code, ReasonCode::PatternMismatch);
    }

    #[test]
    fn loose_sku_accepts_longer_prefixes() {
        let schema = inventory_schema().unwrap();
        let row = RawRecord::new()
            .with("item_sku", "ABCD-123456")
            .with("warehouse_id", "W-01")
            .with("stock_quantity", "0")
            .with("unit_price", "1.99")
            .with("last_restock_date", "2025-01-20");
        assert_eq!(validate([row], &schema, today()).unwrap().accepted.len(), 1);
    }

    #[test]
    fn stock_and_price_defects_are_all_reported() {
        let profile = inventory_logs().unwrap();
        let report = validate([log("WH-0001", "-4", "0")], &profile.schema, today()).unwrap();
        let messages: Vec<_> = report.rejected[0].reasons.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("stock_quantity cannot be negative"));
        assert!(messages[1].contains("unit_price must be > 0"));
    }

    #[test]
    fn non_numeric_stock_is_reported() {
        let profile = inventory_logs().unwrap();
        let report = validate([log("WH-0001", "lots", "5")], &profile.schema, today()).unwrap();
        assert_eq!(report.rejected[0].reasons[0].code, ReasonCode::NotNumeric);
    }

    #[test]
    fn expensive_items_need_review() {
        let profile = inventory_logs().unwrap();
        let report = validate(
            [log("WH-0001", "2", "7250.50"), log("WH-0002", "9", "12")],
            &profile.schema,
            today(),
        )
        .unwrap();
        let flagged = flag_all(&report.accepted, &profile.rules).unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(
            flagged[0].explanations[0],
            "unit_price $7,250.50 requires high-value review (over $5,000.00)"
        );
    }
}

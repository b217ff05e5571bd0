//! Applies threshold rules to accepted records.

use serde::Serialize;

use auditflow_core::{ConfigError, ConfigResult, FieldValue, TypedRecord};

use crate::rule::ThresholdRule;

/// An accepted record that tripped at least one threshold rule.
///
/// This is a post-validation marker, not a rejection. Explanations only ever
/// accumulate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRecord {
    pub record: TypedRecord,
    pub explanations: Vec<String>,
}

impl FlaggedRecord {
    pub fn new(record: TypedRecord, explanation: impl Into<String>) -> Self {
        Self {
            record,
            explanations: vec![explanation.into()],
        }
    }

    pub fn row(&self) -> usize {
        self.record.row()
    }

    pub fn add_explanation(&mut self, explanation: impl Into<String>) {
        self.explanations.push(explanation.into());
    }

    /// Explanations joined into a single `rule_flag` cell.
    pub fn rule_flag(&self) -> String {
        self.explanations.join(" | ")
    }
}

/// Select the records whose `rule.field` satisfies the rule's comparison.
///
/// Output preserves input order, one explanation per flagged record. A record
/// missing the field, or holding a non-numeric value there, is a caller error.
pub fn flag(accepted: &[TypedRecord], rule: &ThresholdRule) -> ConfigResult<Vec<FlaggedRecord>> {
    flag_all(accepted, std::slice::from_ref(rule))
}

/// Apply `rules` in sequence. A record tripping several rules appears once,
/// carrying one explanation per tripped rule in rule order.
pub fn flag_all(accepted: &[TypedRecord], rules: &[ThresholdRule]) -> ConfigResult<Vec<FlaggedRecord>> {
    for rule in rules {
        rule.check()?;
    }

    let mut flagged = Vec::new();
    for record in accepted {
        let mut explanations = Vec::new();
        for rule in rules {
            if let Some(value) = numeric_value(record, rule)? {
                if rule.matches(value) {
                    explanations.push(rule.explain(value));
                }
            }
        }
        if !explanations.is_empty() {
            flagged.push(FlaggedRecord {
                record: record.clone(),
                explanations,
            });
        }
    }
    Ok(flagged)
}

/// Apply one more rule to an already-flagged set, appending explanations.
///
/// Records that do not trip `rule` keep their existing explanations.
pub fn flag_again(flagged: &mut [FlaggedRecord], rule: &ThresholdRule) -> ConfigResult<()> {
    rule.check()?;
    for f in flagged.iter_mut() {
        if let Some(value) = numeric_value(&f.record, rule)? {
            if rule.matches(value) {
                f.add_explanation(rule.explain(value));
            }
        }
    }
    Ok(())
}

// Null (nullable field without a value) is never flagged.
fn numeric_value(record: &TypedRecord, rule: &ThresholdRule) -> ConfigResult<Option<f64>> {
    match record.get(&rule.field) {
        None => Err(ConfigError::unknown_field(&rule.field)),
        Some(FieldValue::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| ConfigError::non_numeric(&rule.field)),
    }
}

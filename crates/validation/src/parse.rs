//! Stage one: raw string -> typed value.

use chrono::NaiveDate;

use auditflow_core::FieldValue;

use crate::reason::{Reason, ReasonCode};
use crate::schema::{CompiledField, FieldKind};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse one raw cell for `field`.
///
/// Whitespace is trimmed first; a missing or blank cell falls back to the
/// field's default, then to `Null` for nullable fields.
pub(crate) fn parse_field(field: &CompiledField, raw: Option<&str>) -> Result<FieldValue, Reason> {
    let present = raw.map(str::trim).filter(|s| !s.is_empty());
    match present {
        Some(value) => parse_present(field, value),
        None => match &field.spec.default {
            Some(default) => parse_present(field, default.trim()),
            None if field.spec.nullable => Ok(FieldValue::Null),
            None => Err(Reason::missing(field.name())),
        },
    }
}

/// Parse an already-trimmed, non-empty value.
pub(crate) fn parse_present(field: &CompiledField, value: &str) -> Result<FieldValue, Reason> {
    let name = field.name();
    match &field.spec.kind {
        FieldKind::Text => Ok(FieldValue::Text(value.to_string())),
        FieldKind::Integer => value
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| Reason::not_numeric(name, value)),
        FieldKind::Float => match value.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(FieldValue::Float(f)),
            _ => Err(Reason::not_numeric(name, value)),
        },
        FieldKind::Date => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|_| {
                Reason::new(
                    name,
                    ReasonCode::InvalidDate,
                    format!("{name} '{value}' is not a valid date (expected YYYY-MM-DD)"),
                )
            }),
        FieldKind::Enum(allowed) => {
            if allowed.iter().any(|a| a == value) {
                Ok(FieldValue::Text(value.to_string()))
            } else {
                Err(Reason::new(
                    name,
                    ReasonCode::NotAllowed,
                    format!("{name} '{value}' is not one of [{}]", allowed.join(", ")),
                ))
            }
        }
        FieldKind::Pattern(pattern) => match &field.regex {
            Some(re) if re.is_match(value) => Ok(FieldValue::Text(value.to_string())),
            _ => Err(Reason::new(
                name,
                ReasonCode::PatternMismatch,
                format!("{name} '{value}' does not match pattern {pattern}"),
            )),
        },
    }
}

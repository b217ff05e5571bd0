//! Stage two: business-rule predicates over typed values.

use chrono::NaiveDate;

use auditflow_core::FieldValue;

use crate::reason::{Reason, ReasonCode};
use crate::schema::Predicate;

/// Evaluate one predicate. `Null` values are never checked.
pub(crate) fn check(
    field: &str,
    predicate: &Predicate,
    value: &FieldValue,
    today: NaiveDate,
) -> Option<Reason> {
    if value.is_null() {
        return None;
    }

    match *predicate {
        Predicate::Min { bound, inclusive } => {
            let v = value.as_f64()?;
            let ok = if inclusive { v >= bound } else { v > bound };
            (!ok).then(|| out_of_range(field, min_message(field, v, bound, inclusive)))
        }
        Predicate::Max { bound, inclusive } => {
            let v = value.as_f64()?;
            let ok = if inclusive { v <= bound } else { v < bound };
            let op = if inclusive { "<=" } else { "<" };
            (!ok).then(|| out_of_range(field, format!("{field} must be {op} {bound} (got {v})")))
        }
        Predicate::Between { min, max } => {
            let v = value.as_f64()?;
            (!(min..=max).contains(&v)).then(|| {
                out_of_range(field, format!("{field} must be between {min} and {max} (got {v})"))
            })
        }
        Predicate::NotInFuture => {
            let d = value.as_date()?;
            (d > today).then(|| {
                Reason::new(
                    field,
                    ReasonCode::FutureDate,
                    format!("{field} '{}' is in the future", d.format("%Y-%m-%d")),
                )
            })
        }
    }
}

fn min_message(field: &str, v: f64, bound: f64, inclusive: bool) -> String {
    match (bound == 0.0, inclusive) {
        (true, true) => format!("{field} cannot be negative (got {v})"),
        (true, false) => format!("{field} must be > 0 (got {v})"),
        (false, true) => format!("{field} must be >= {bound} (got {v})"),
        (false, false) => format!("{field} must be > {bound} (got {v})"),
    }
}

fn out_of_range(field: &str, message: String) -> Reason {
    Reason::new(field, ReasonCode::OutOfRange, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn non_negative_uses_cannot_be_negative_wording() {
        let r = check("amount", &Predicate::non_negative(), &FieldValue::Float(-5.0), today()).unwrap();
        assert_eq!(r.code, ReasonCode::OutOfRange);
        assert_eq!(r.message, "amount cannot be negative (got -5)");
        assert!(check("amount", &Predicate::non_negative(), &FieldValue::Float(0.0), today()).is_none());
    }

    #[test]
    fn positive_rejects_zero() {
        let r = check("unit_price", &Predicate::positive(), &FieldValue::Float(0.0), today()).unwrap();
        assert!(r.message.contains("must be > 0"));
    }

    #[test]
    fn between_is_inclusive() {
        let p = Predicate::between(0.0, 100.0);
        assert!(check("score", &p, &FieldValue::Integer(100), today()).is_none());
        assert!(check("score", &p, &FieldValue::Integer(0), today()).is_none());
        let r = check("score", &p, &FieldValue::Float(100.5), today()).unwrap();
        assert!(r.message.contains("between 0 and 100"));
    }

    #[test]
    fn max_respects_inclusivity() {
        let inclusive = Predicate::Max { bound: 10.0, inclusive: true };
        let exclusive = Predicate::Max { bound: 10.0, inclusive: false };
        assert!(check("n", &inclusive, &FieldValue::Integer(10), today()).is_none());
        assert!(check("n", &exclusive, &FieldValue::Integer(10), today()).is_some());
    }

    #[test]
    fn future_dates_are_relative_to_injected_today() {
        let tomorrow = FieldValue::Date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        let same_day = FieldValue::Date(today());
        let r = check("admission_date", &Predicate::NotInFuture, &tomorrow, today()).unwrap();
        assert_eq!(r.code, ReasonCode::FutureDate);
        assert!(check("admission_date", &Predicate::NotInFuture, &same_day, today()).is_none());
    }

    #[test]
    fn null_values_skip_predicates() {
        assert!(check("x", &Predicate::positive(), &FieldValue::Null, today()).is_none());
    }
}

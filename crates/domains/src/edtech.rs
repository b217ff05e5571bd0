//! Student assessment audits.

use auditflow_core::ConfigResult;
use auditflow_flagging::{NumberFormat, ThresholdRule};
use auditflow_validation::{FieldSpec, Predicate, RecordSchema};

use crate::{Domain, DomainProfile};

pub const LOW_SCORE_THRESHOLD: f64 = 50.0;
pub const COURSE_CODE_PATTERN: &str = r"^[A-Z]{2,4}-[0-9]{3}$";

pub fn assessment_schema() -> ConfigResult<RecordSchema> {
    RecordSchema::new([
        FieldSpec::text("student_id"),
        FieldSpec::date("submission_date").with(Predicate::NotInFuture),
        FieldSpec::pattern("course_code", COURSE_CODE_PATTERN),
        FieldSpec::float("score").with(Predicate::between(0.0, 100.0)),
        FieldSpec::text("instructor_id"),
    ])
}

/// Raw LMS activity export (`Time_Spent`, `Score` headers normalize to these).
pub fn activity_log_schema() -> ConfigResult<RecordSchema> {
    RecordSchema::new([
        FieldSpec::integer("time_spent").with(Predicate::non_negative()),
        FieldSpec::integer("score").with(Predicate::between(0.0, 100.0)),
    ])
}

pub fn assessments() -> ConfigResult<DomainProfile> {
    DomainProfile {
        domain: Domain::Edtech,
        dataset: "assessments",
        key_field: Some("student_id"),
        key_mask: None,
        schema: assessment_schema()?,
        rules: vec![
            ThresholdRule::less_than("score", LOW_SCORE_THRESHOLD)
                .with_template("{field} {value} is below intervention threshold {bound}")
                .with_format(NumberFormat::Plain(1)),
        ],
    }
    .checked()
}

pub fn activity_logs() -> ConfigResult<DomainProfile> {
    DomainProfile {
        domain: Domain::Edtech,
        dataset: "activity_logs",
        key_field: None,
        key_mask: None,
        schema: activity_log_schema()?,
        rules: Vec::new(),
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

    fn submission(course: &str, score: &str) -> RawRecord {
        RawRecord::new()
            .with("student_id", "S-311")
            .with("submission_date", "2024-11-12")
            .with("course_code", course)
            .with("score", score)
            .with("instructor_id", "I-9")
    }

    #[test]
    fn at_risk_scores_are_flagged() {
        let profile = assessments().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let rows = [
            submission("CS-101", "42"),
            submission("CS-101", "88"),
            submission("CS101", "40"),
            submission("MATH-210", "104"),
        ];
        let report = validate(rows, &profile.schema, today).unwrap();
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.rejected[0].reasons[0].code, ReasonCode::PatternMismatch);
        assert!(report.rejected[1].reasons[0].message.contains("between 0 and 100"));

        let flagged = flag_all(&report.accepted, &profile.rules).unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].explanations[0], "score 42.0 is below intervention threshold 50.0");
    }

    #[test]
    fn activity_logs_need_whole_numbers() {
        let profile = activity_logs().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let rows = [
            RawRecord::new().with("time_spent", "35").with("score", "77"),
            RawRecord::new().with("time_spent", "-2").with("score", "77"),
            RawRecord::new().with("time_spent", "10").with("score", "seventy"),
        ];
        let report = validate(rows, &profile.schema, today).unwrap();
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.rejected[0].reasons[0].code, ReasonCode::OutOfRange);
        assert_eq!(report.rejected[1].reasons[0].code, ReasonCode::NotNumeric);
    }
}

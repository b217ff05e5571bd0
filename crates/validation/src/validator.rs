//! Record validator: partitions raw rows into accepted and rejected sets.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::thread;

use chrono::NaiveDate;
use serde::Serialize;

use auditflow_core::{ConfigError, ConfigResult, RawRecord, TypedRecord};

use crate::parse::parse_field;
use crate::predicate;
use crate::reason::Reason;
use crate::schema::RecordSchema;

/// A row that failed validation, with every failing field's reason.
///
/// `reasons` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected {
    pub row: usize,
    pub raw: RawRecord,
    pub reasons: Vec<Reason>,
}

impl Rejected {
    /// Reason messages joined for single-cell output.
    pub fn summary(&self) -> String {
        self.reasons
            .iter()
            .map(|r| r.message.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Accepted(TypedRecord),
    Rejected(Rejected),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn row(&self) -> usize {
        match self {
            ValidationOutcome::Accepted(r) => r.row(),
            ValidationOutcome::Rejected(r) => r.row,
        }
    }
}

/// Partitioned validator output, each side in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub accepted: Vec<TypedRecord>,
    pub rejected: Vec<Rejected>,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn push(&mut self, outcome: ValidationOutcome) {
        match outcome {
            ValidationOutcome::Accepted(r) => self.accepted.push(r),
            ValidationOutcome::Rejected(r) => self.rejected.push(r),
        }
    }
}

/// Validate every row against `schema`, preserving input order.
///
/// Rows are independent. Bad data never fails the call; it only ever lands in
/// `rejected`. The only error is an unusable schema.
///
/// `today` drives the not-in-future date checks and must come from the caller
/// (see [`auditflow_core::Clock`]).
pub fn validate<I>(raw_records: I, schema: &RecordSchema, today: NaiveDate) -> ConfigResult<ValidationReport>
where
    I: IntoIterator<Item = RawRecord>,
{
    schema.ensure_usable()?;

    let mut report = ValidationReport::default();
    for (row, raw) in raw_records.into_iter().enumerate() {
        report.push(evaluate(row, raw, schema, today));
    }
    Ok(report)
}

/// Validate a single row. `row` is recorded on the outcome as-is.
pub fn validate_record(
    row: usize,
    raw: RawRecord,
    schema: &RecordSchema,
    today: NaiveDate,
) -> ConfigResult<ValidationOutcome> {
    schema.ensure_usable()?;
    Ok(evaluate(row, raw, schema, today))
}

/// Same result as [`validate`], computed on up to `workers` scoped threads.
///
/// The thread count is capped by the row count and by
/// [`thread::available_parallelism`]. Input is split into contiguous chunks;
/// outcomes are re-sorted by input row before partitioning.
pub fn validate_parallel(
    raw_records: Vec<RawRecord>,
    schema: &RecordSchema,
    today: NaiveDate,
    workers: usize,
) -> ConfigResult<ValidationReport> {
    schema.ensure_usable()?;
    if workers == 0 {
        return Err(ConfigError::InvalidWorkers);
    }
    let workers = effective_workers(workers, raw_records.len());
    if workers == 1 {
        return validate(raw_records, schema, today);
    }

    let chunk_size = raw_records.len().div_ceil(workers);
    let mut batches: Vec<Vec<(usize, RawRecord)>> = Vec::with_capacity(workers);
    let mut rows = raw_records.into_iter().enumerate().peekable();
    while rows.peek().is_some() {
        batches.push(rows.by_ref().take(chunk_size).collect());
    }

    let mut outcomes: Vec<ValidationOutcome> = thread::scope(|s| {
        let handles: Vec<_> = batches
            .into_iter()
            .map(|batch| {
                s.spawn(move || {
                    batch
                        .into_iter()
                        .map(|(row, raw)| evaluate(row, raw, schema, today))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    outcomes.sort_by_key(ValidationOutcome::row);

    let mut report = ValidationReport::default();
    for outcome in outcomes {
        report.push(outcome);
    }
    Ok(report)
}

fn effective_workers(requested: usize, rows: usize) -> usize {
    let cores = thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1);
    requested.min(rows).min(cores).max(1)
}

/// Parse every field first, then run predicates on the fields that parsed.
fn evaluate(row: usize, raw: RawRecord, schema: &RecordSchema, today: NaiveDate) -> ValidationOutcome {
    let mut values = BTreeMap::new();
    let mut reasons = Vec::new();

    for field in schema.compiled() {
        match parse_field(field, raw.get(field.name())) {
            Ok(value) => {
                for p in &field.spec.predicates {
                    if let Some(reason) = predicate::check(field.name(), p, &value, today) {
                        reasons.push(reason);
                    }
                }
                values.insert(field.name().to_string(), value);
            }
            Err(reason) => reasons.push(reason),
        }
    }

    if reasons.is_empty() {
        ValidationOutcome::Accepted(TypedRecord::new(row, values))
    } else {
        ValidationOutcome::Rejected(Rejected { row, raw, reasons })
    }
}

//! `auditflow-validation`: rule-based record validator.
//!
//! Validation is staged: every field is first parsed into its semantic type
//! ([`FieldKind`]), and only successfully parsed values reach the business-rule
//! [`Predicate`]s. All failures of a row are collected as [`Reason`]s.
//!
//! Pure logic: no IO, no clock reads, no logging.

mod parse;
mod predicate;
pub mod reason;
pub mod schema;
pub mod validator;

pub use reason::{Reason, ReasonCode};
pub use schema::{FieldKind, FieldSpec, Predicate, RecordSchema};
pub use validator::{
    Rejected, ValidationOutcome, ValidationReport, validate, validate_parallel, validate_record,
};

//! Structured rejection reasons.

use serde::{Deserialize, Serialize};

/// Machine-readable category of a field failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    MissingField,
    NotNumeric,
    InvalidDate,
    FutureDate,
    PatternMismatch,
    NotAllowed,
    OutOfRange,
}

impl ReasonCode {
    /// Stable string form matching serde's `SCREAMING_SNAKE_CASE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "MISSING_FIELD",
            Self::NotNumeric => "NOT_NUMERIC",
            Self::InvalidDate => "INVALID_DATE",
            Self::FutureDate => "FUTURE_DATE",
            Self::PatternMismatch => "PATTERN_MISMATCH",
            Self::NotAllowed => "NOT_ALLOWED",
            Self::OutOfRange => "OUT_OF_RANGE",
        }
    }
}

impl core::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why one field of one row failed validation.
///
/// `Display` renders the human-readable message only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub field: String,
    pub code: ReasonCode,
    pub message: String,
}

impl Reason {
    pub fn new(field: impl Into<String>, code: ReasonCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::new(
            field,
            ReasonCode::MissingField,
            format!("{field} is required and cannot be empty"),
        )
    }

    pub(crate) fn not_numeric(field: &str, raw: &str) -> Self {
        Self::new(
            field,
            ReasonCode::NotNumeric,
            format!("{field} is not numeric (got '{raw}')"),
        )
    }
}

impl core::fmt::Display for Reason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

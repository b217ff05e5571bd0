//! Configuration error model.

use thiserror::Error;

/// Result type used for schema/rule construction and engine entry points.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A caller programming error: malformed schema, rule, or engine setting.
///
/// Bad *data* never produces this error. Rows that fail validation are routed
/// to the rejected set with reasons instead. A `ConfigError` is always
/// surfaced immediately and never defaulted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A schema must declare at least one field.
    #[error("schema has no fields")]
    EmptySchema,

    /// A serialized schema or rule definition could not be read.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// Two field specifications share a name.
    #[error("duplicate field in schema: {0}")]
    DuplicateField(String),

    /// A pattern field carries a regex that does not compile.
    #[error("invalid pattern for field {field}: {message}")]
    InvalidPattern { field: String, message: String },

    /// A predicate was attached to a field whose type it cannot check.
    #[error("predicate {predicate} cannot apply to {field} ({kind})")]
    IncompatiblePredicate {
        field: String,
        kind: String,
        predicate: String,
    },

    /// A rule references a field the records/schema do not have.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A rule references a field that does not hold numbers.
    #[error("field is not numeric: {0}")]
    NonNumericField(String),

    /// A threshold rule is malformed (e.g. non-finite bound).
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// Parallel validation needs at least one worker.
    #[error("worker count must be >= 1")]
    InvalidWorkers,

    /// No domain profile is registered under this name.
    #[error("unknown domain: {0}")]
    UnknownDomain(String),
}

impl ConfigError {
    pub fn invalid_rule(msg: impl Into<String>) -> Self {
        Self::InvalidRule(msg.into())
    }

    pub fn invalid_definition(msg: impl Into<String>) -> Self {
        Self::InvalidDefinition(msg.into())
    }

    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }

    pub fn non_numeric(name: impl Into<String>) -> Self {
        Self::NonNumericField(name.into())
    }
}

//! Declarative record schemas.
//!
//! A schema is plain data ([`FieldSpec`]s, serde-friendly) compiled once into a
//! [`RecordSchema`]: names are checked for uniqueness, pattern regexes are
//! compiled, predicates are checked against their field types, and defaults are
//! pre-parsed. Every problem found here is a [`ConfigError`].

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use auditflow_core::{ConfigError, ConfigResult};

use crate::parse::parse_present;

/// Semantic type of a field. Parsing into this type always runs first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    /// ISO calendar date (`YYYY-MM-DD`).
    Date,
    /// Text restricted to a fixed set of values.
    Enum(Vec<String>),
    /// Text that must match a regular expression (after trimming).
    Pattern(String),
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Date => "date",
            FieldKind::Enum(_) => "enum",
            FieldKind::Pattern(_) => "pattern",
        }
    }
}

/// Business-rule check that runs on a successfully parsed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Predicate {
    /// `value >= bound` (inclusive) or `value > bound`.
    Min {
        bound: f64,
        #[serde(default = "inclusive_default")]
        inclusive: bool,
    },
    /// `value <= bound` (inclusive) or `value < bound`.
    Max {
        bound: f64,
        #[serde(default = "inclusive_default")]
        inclusive: bool,
    },
    /// `min <= value <= max`.
    Between { min: f64, max: f64 },
    /// Date must not be later than the caller's "today".
    NotInFuture,
}

fn inclusive_default() -> bool {
    true
}

impl Predicate {
    /// `value >= 0`.
    pub fn non_negative() -> Self {
        Predicate::Min {
            bound: 0.0,
            inclusive: true,
        }
    }

    /// `value > 0`.
    pub fn positive() -> Self {
        Predicate::Min {
            bound: 0.0,
            inclusive: false,
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Predicate::Between { min, max }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Min { .. } => "min",
            Predicate::Max { .. } => "max",
            Predicate::Between { .. } => "between",
            Predicate::NotInFuture => "not_in_future",
        }
    }

    fn applies_to(&self, kind: &FieldKind) -> bool {
        match self {
            Predicate::Min { .. } | Predicate::Max { .. } | Predicate::Between { .. } => {
                kind.is_numeric()
            }
            Predicate::NotInFuture => *kind == FieldKind::Date,
        }
    }

    fn check_bounds(&self, field: &str) -> ConfigResult<()> {
        let ok = match *self {
            Predicate::Min { bound, .. } | Predicate::Max { bound, .. } => bound.is_finite(),
            Predicate::Between { min, max } => min.is_finite() && max.is_finite() && min <= max,
            Predicate::NotInFuture => true,
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::invalid_rule(format!(
                "{} bounds on {field} must be finite and ordered",
                self.name()
            )))
        }
    }
}

/// Specification of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub nullable: bool,
    /// Raw value substituted when the cell is missing or blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub predicates: Vec<Predicate>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            default: None,
            predicates: Vec::new(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn one_of<S: Into<String>>(name: impl Into<String>, allowed: impl IntoIterator<Item = S>) -> Self {
        Self::new(name, FieldKind::Enum(allowed.into_iter().map(Into::into).collect()))
    }

    pub fn pattern(name: impl Into<String>, regex: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Pattern(regex.into()))
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// A field spec with its pattern compiled.
#[derive(Debug, Clone)]
pub(crate) struct CompiledField {
    pub(crate) spec: FieldSpec,
    pub(crate) regex: Option<Regex>,
}

impl CompiledField {
    fn compile(spec: FieldSpec) -> ConfigResult<Self> {
        let regex = match &spec.kind {
            FieldKind::Pattern(p) => Some(Regex::new(p).map_err(|e| ConfigError::InvalidPattern {
                field: spec.name.clone(),
                message: e.to_string(),
            })?),
            _ => None,
        };

        for predicate in &spec.predicates {
            if !predicate.applies_to(&spec.kind) {
                return Err(ConfigError::IncompatiblePredicate {
                    field: spec.name.clone(),
                    kind: spec.kind.label().to_string(),
                    predicate: predicate.name().to_string(),
                });
            }
            predicate.check_bounds(&spec.name)?;
        }

        let field = Self { spec, regex };

        // A default that cannot itself be parsed would reject every blank row.
        if let Some(default) = &field.spec.default {
            if parse_present(&field, default.trim()).is_err() {
                return Err(ConfigError::invalid_definition(format!(
                    "default '{default}' for {} is not a valid {}",
                    field.spec.name,
                    field.spec.kind.label()
                )));
            }
        }

        Ok(field)
    }

    pub(crate) fn name(&self) -> &str {
        &self.spec.name
    }
}

/// An ordered, compiled set of field specifications.
///
/// Construction enforces unique names, compilable patterns and type-compatible
/// predicates. An empty schema can be constructed but is refused by the
/// validator entry points.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: Vec<CompiledField>,
}

impl RecordSchema {
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> ConfigResult<Self> {
        let mut seen = HashSet::new();
        let mut compiled = Vec::new();
        for spec in fields {
            if !seen.insert(spec.name.clone()) {
                return Err(ConfigError::DuplicateField(spec.name));
            }
            compiled.push(CompiledField::compile(spec)?);
        }
        Ok(Self { fields: compiled })
    }

    /// Load a schema from its JSON form (an array of field specs).
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let specs: Vec<FieldSpec> =
            serde_json::from_str(json).map_err(|e| ConfigError::invalid_definition(e.to_string()))?;
        Self::new(specs)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(&self.specs().collect::<Vec<_>>())
            .map_err(|e| ConfigError::invalid_definition(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field specs in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(|f| &f.spec)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.specs().find(|s| s.name == name)
    }

    pub(crate) fn compiled(&self) -> &[CompiledField] {
        &self.fields
    }

    pub(crate) fn ensure_usable(&self) -> ConfigResult<()> {
        if self.fields.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        Ok(())
    }
}

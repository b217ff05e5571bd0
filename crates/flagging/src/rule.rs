//! Threshold rules.

use serde::{Deserialize, Serialize};

use auditflow_core::{ConfigError, ConfigResult};
use auditflow_validation::RecordSchema;

use crate::format::NumberFormat;

/// Comparison embedded in a [`ThresholdRule`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "<=")]
    AtMost,
}

impl Comparison {
    pub fn holds(self, value: f64, bound: f64) -> bool {
        match self {
            Comparison::GreaterThan => value > bound,
            Comparison::LessThan => value < bound,
            Comparison::AtLeast => value >= bound,
            Comparison::AtMost => value <= bound,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
        }
    }

    fn default_template(self) -> &'static str {
        match self {
            Comparison::GreaterThan => "{field} {value} exceeds threshold {bound}",
            Comparison::AtLeast => "{field} {value} meets or exceeds threshold {bound}",
            Comparison::LessThan => "{field} {value} is below threshold {bound}",
            Comparison::AtMost => "{field} {value} is at or below threshold {bound}",
        }
    }
}

impl core::fmt::Display for Comparison {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A policy bound on one numeric field.
///
/// The message template may use `{field}`, `{op}`, `{value}` and `{bound}`;
/// numbers are rendered with `format`. Without a template a phrase matching
/// the comparison is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub field: String,
    pub op: Comparison,
    pub bound: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub format: NumberFormat,
}

impl ThresholdRule {
    pub fn new(field: impl Into<String>, op: Comparison, bound: f64) -> Self {
        Self {
            field: field.into(),
            op,
            bound,
            template: None,
            format: NumberFormat::default(),
        }
    }

    pub fn greater_than(field: impl Into<String>, bound: f64) -> Self {
        Self::new(field, Comparison::GreaterThan, bound)
    }

    pub fn less_than(field: impl Into<String>, bound: f64) -> Self {
        Self::new(field, Comparison::LessThan, bound)
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    /// Does `value` trip this rule?
    pub fn matches(&self, value: f64) -> bool {
        self.op.holds(value, self.bound)
    }

    /// Human-readable explanation for a flagged `value`.
    pub fn explain(&self, value: f64) -> String {
        let template = self
            .template
            .as_deref()
            .unwrap_or_else(|| self.op.default_template());
        template
            .replace("{field}", &self.field)
            .replace("{op}", self.op.as_str())
            .replace("{value}", &self.format.render(value))
            .replace("{bound}", &self.format.render(self.bound))
    }

    /// Rule-local sanity checks (named field, finite bound).
    pub fn check(&self) -> ConfigResult<()> {
        if self.field.trim().is_empty() {
            return Err(ConfigError::invalid_rule("threshold rule needs a field name"));
        }
        if !self.bound.is_finite() {
            return Err(ConfigError::invalid_rule(format!(
                "bound for {} must be a finite number",
                self.field
            )));
        }
        Ok(())
    }

    /// Verify the rule fits `schema` before any data is seen.
    pub fn check_against(&self, schema: &RecordSchema) -> ConfigResult<()> {
        self.check()?;
        let spec = schema
            .field(&self.field)
            .ok_or_else(|| ConfigError::unknown_field(&self.field))?;
        if !spec.kind.is_numeric() {
            return Err(ConfigError::non_numeric(&self.field));
        }
        Ok(())
    }
}

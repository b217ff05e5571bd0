//! Per-vertical configuration of the validator and flagger.
//!
//! Each vertical is data only: a [`RecordSchema`] plus the [`ThresholdRule`]s
//! applied to its accepted rows. The engine itself is shared.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use auditflow_core::{ConfigError, ConfigResult, FieldValue, RawRecord, TypedRecord};
use auditflow_flagging::ThresholdRule;
use auditflow_validation::RecordSchema;

pub mod edtech;
pub mod finance;
pub mod healthcare;
pub mod legal;
pub mod supply_chain;

/// Business vertical.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Finance,
    Healthcare,
    SupplyChain,
    Edtech,
    Legal,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Finance,
        Domain::Healthcare,
        Domain::SupplyChain,
        Domain::Edtech,
        Domain::Legal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Finance => "finance",
            Domain::Healthcare => "healthcare",
            Domain::SupplyChain => "supply_chain",
            Domain::Edtech => "edtech",
            Domain::Legal => "legal",
        }
    }

    /// The vertical's primary dataset.
    pub fn profile(&self) -> ConfigResult<DomainProfile> {
        match self {
            Domain::Finance => finance::expenses(),
            Domain::Healthcare => healthcare::billing(),
            Domain::SupplyChain => supply_chain::inventory(),
            Domain::Edtech => edtech::assessments(),
            Domain::Legal => legal::contracts(),
        }
    }

    /// Every dataset configured for the vertical, primary first.
    pub fn profiles(&self) -> ConfigResult<Vec<DomainProfile>> {
        match self {
            Domain::SupplyChain => Ok(vec![supply_chain::inventory()?, supply_chain::inventory_logs()?]),
            Domain::Edtech => Ok(vec![edtech::assessments()?, edtech::activity_logs()?]),
            _ => Ok(vec![self.profile()?]),
        }
    }

    /// Look up a dataset by name; `None` selects the primary one.
    pub fn dataset(&self, name: Option<&str>) -> ConfigResult<DomainProfile> {
        let Some(name) = name else {
            return self.profile();
        };
        self.profiles()?
            .into_iter()
            .find(|p| p.dataset == name)
            .ok_or_else(|| ConfigError::UnknownDomain(format!("{}/{name}", self.as_str())))
    }
}

impl core::fmt::Display for Domain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownDomain(s.to_string()))
    }
}

/// Pseudonymization of an identifying key that may carry personal data.
#[derive(Debug, Clone, Copy)]
pub struct KeyMask {
    /// Derived field holding the masked key on accepted records.
    pub derived_field: &'static str,
    /// Derived field holding `tag` on every masked record.
    pub tag_field: &'static str,
    pub tag: &'static str,
    /// Masked form of a key, or `None` when the key needs no masking.
    pub mask: fn(&str) -> Option<String>,
}

/// One configured dataset of a vertical.
#[derive(Debug, Clone)]
pub struct DomainProfile {
    pub domain: Domain,
    pub dataset: &'static str,
    /// Column used to identify rows in logs and reports, if the dataset has one.
    pub key_field: Option<&'static str>,
    pub key_mask: Option<KeyMask>,
    pub schema: RecordSchema,
    pub rules: Vec<ThresholdRule>,
}

impl DomainProfile {
    /// Rules must reference numeric schema fields, the key must be a schema
    /// field, and masking needs a key plus derived names outside the schema.
    fn checked(self) -> ConfigResult<Self> {
        for rule in &self.rules {
            rule.check_against(&self.schema)?;
        }
        if let Some(key) = self.key_field {
            if self.schema.field(key).is_none() {
                return Err(ConfigError::unknown_field(key));
            }
        }
        if let Some(mask) = &self.key_mask {
            if self.key_field.is_none() {
                return Err(ConfigError::invalid_definition(format!(
                    "{}: key mask without a key field",
                    self.dataset
                )));
            }
            for derived in [mask.derived_field, mask.tag_field] {
                if self.schema.field(derived).is_some() {
                    return Err(ConfigError::invalid_definition(format!(
                        "{}: derived field {derived} collides with the schema",
                        self.dataset
                    )));
                }
            }
        }
        Ok(self)
    }

    /// `value` as it may appear in outputs: masked when the mask applies.
    pub fn mask_key(&self, value: &str) -> String {
        self.key_mask
            .and_then(|m| (m.mask)(value))
            .unwrap_or_else(|| value.to_string())
    }

    /// Display key of a raw (usually rejected) row.
    pub fn raw_key(&self, raw: &RawRecord) -> Option<String> {
        let value = raw.get(self.key_field?)?.trim();
        if value.is_empty() {
            return None;
        }
        Some(self.mask_key(value))
    }

    /// Display key of an accepted record.
    pub fn record_key(&self, record: &TypedRecord) -> Option<String> {
        let value = record.get(self.key_field?)?;
        if value.is_null() {
            return None;
        }
        Some(self.mask_key(&value.to_string()))
    }

    /// Attach the masked key and tag to accepted records whose key needs
    /// masking. Returns the number of records masked.
    pub fn mask_keys(&self, records: &mut [TypedRecord]) -> usize {
        let (Some(key), Some(mask)) = (self.key_field, self.key_mask) else {
            return 0;
        };

        let mut masked = 0;
        for record in records {
            let Some(pseudonym) = record.get(key).and_then(FieldValue::as_str).and_then(mask.mask) else {
                continue;
            };
            if record.insert_derived(mask.derived_field, FieldValue::Text(pseudonym)) {
                record.insert_derived(mask.tag_field, FieldValue::from(mask.tag));
                masked += 1;
            }
        }
        masked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_builds() {
        for domain in Domain::ALL {
            let profiles = domain.profiles().unwrap();
            assert!(!profiles.is_empty());
            for p in profiles {
                assert_eq!(p.domain, domain);
                assert!(!p.schema.is_empty());
            }
        }
    }

    #[test]
    fn parses_domain_names_loosely() {
        assert_eq!("Supply-Chain".parse::<Domain>(), Ok(Domain::SupplyChain));
        assert_eq!(" legal ".parse::<Domain>(), Ok(Domain::Legal));
        assert_eq!(
            "retail".parse::<Domain>(),
            Err(ConfigError::UnknownDomain("retail".to_string()))
        );
    }

    #[test]
    fn dataset_lookup() {
        assert_eq!(Domain::Edtech.dataset(None).unwrap().dataset, "assessments");
        assert_eq!(
            Domain::SupplyChain.dataset(Some("inventory_logs")).unwrap().dataset,
            "inventory_logs"
        );
        assert!(matches!(
            Domain::Finance.dataset(Some("payroll")),
            Err(ConfigError::UnknownDomain(_))
        ));
    }

    #[test]
    fn activity_logs_have_no_row_key() {
        let profile = Domain::Edtech.dataset(Some("activity_logs")).unwrap();
        assert_eq!(profile.key_field, None);
        let raw = RawRecord::new().with("time_spent", "30").with("score", "88");
        assert_eq!(profile.raw_key(&raw), None);
    }

    #[test]
    fn unmasked_keys_pass_through() {
        let profile = Domain::Finance.profile().unwrap();
        let raw = RawRecord::new().with("transaction_id", " T-9 ");
        assert_eq!(profile.raw_key(&raw).as_deref(), Some("T-9"));
        assert_eq!(profile.mask_key("Jane Doe"), "Jane Doe");
        assert_eq!(profile.raw_key(&RawRecord::new().with("transaction_id", "  ")), None);
    }

    #[test]
    fn mask_needs_key_and_free_derived_names() {
        let mut profile = Domain::Healthcare.profile().unwrap();
        profile.key_field = None;
        assert!(matches!(profile.checked(), Err(ConfigError::InvalidDefinition(_))));

        let mut profile = Domain::Healthcare.profile().unwrap();
        let mut mask = healthcare::patient_mask();
        mask.derived_field = "insurance_provider";
        profile.key_mask = Some(mask);
        assert!(matches!(profile.checked(), Err(ConfigError::InvalidDefinition(_))));
    }
}

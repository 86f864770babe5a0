use std::collections::BTreeMap;

use figment::Figment;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::timestamp::DEFAULT_TIMESTAMP_PRECISION;

/// Lifecycle settings, read from the `lifecycle` section of the application config.
///
/// ```yaml
/// lifecycle:
///   timestamp_precision: 6
///   entities:
///     users:
///       soft_delete_strategy: DEFAULT_SOFT_DELETE
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecycleConfig {
    /// Sub-second digits kept on stamped timestamps (0-9).
    pub timestamp_precision: u16,
    /// Per-table overrides, keyed by table name.
    pub entities: BTreeMap<String, EntityLifecycleConfig>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            timestamp_precision: DEFAULT_TIMESTAMP_PRECISION,
            entities: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityLifecycleConfig {
    /// Replaces the strategy the entity declares in code.
    pub soft_delete_strategy: Option<String>,
}

impl LifecycleConfig {
    pub const KEY: &'static str = "lifecycle";

    /// Extract the `lifecycle` section; a missing section yields the defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if the section exists but does not deserialize.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        if figment.find_value(Self::KEY).is_err() {
            return Ok(Self::default());
        }
        figment
            .extract_inner(Self::KEY)
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    #[must_use]
    pub fn strategy_override(&self, table: &str) -> Option<&str> {
        self.entities
            .get(table)
            .and_then(|e| e.soft_delete_strategy.as_deref())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::providers::Serialized;
    use serde_json::json;

    #[test]
    fn missing_section_uses_defaults() {
        let figment = Figment::new().merge(Serialized::defaults(json!({ "other": 1 })));

        let cfg = LifecycleConfig::from_figment(&figment).unwrap();
        assert_eq!(cfg, LifecycleConfig::default());
        assert_eq!(cfg.timestamp_precision, 6);
    }

    #[test]
    fn reads_entity_overrides() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "lifecycle": {
                "timestamp_precision": 3,
                "entities": {
                    "users": { "soft_delete_strategy": "ARCHIVE" }
                }
            }
        })));

        let cfg = LifecycleConfig::from_figment(&figment).unwrap();
        assert_eq!(cfg.timestamp_precision, 3);
        assert_eq!(cfg.strategy_override("users"), Some("ARCHIVE"));
        assert_eq!(cfg.strategy_override("teams"), None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "lifecycle": { "soft_delete": "x" }
        })));

        let err = LifecycleConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}

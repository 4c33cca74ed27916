//! Free-form target group attributes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute key holding the deregistration delay in seconds
pub const DEREGISTRATION_DELAY_KEY: &str = "deregistration_delay.timeout_seconds";

/// Attribute key enabling sticky sessions
pub const STICKINESS_ENABLED_KEY: &str = "stickiness.enabled";

/// Attribute key selecting the stickiness type
pub const STICKINESS_TYPE_KEY: &str = "stickiness.type";

/// Attribute key holding the slow start duration in seconds
pub const SLOW_START_KEY: &str = "slow_start.duration_seconds";

/// Value written for an attribute key.
///
/// A key that was never written has no entry at all; `Cleared` records an
/// explicit unset so that rendering drops the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Set(String),
    Cleared,
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Set(value) => Some(value.as_str()),
            Self::Cleared => None,
        }
    }
}

impl From<Option<String>> for AttributeValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Cleared,
        }
    }
}

/// Attribute in the form the provider declaration takes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenderedAttribute {
    pub key: String,
    pub value: String,
}

/// Key to value store of group-level settings; the last write for a key wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write or overwrite `key`; `None` records an explicit clear
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// `None` if the key was never written
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes with a value, cleared keys omitted
    pub fn render(&self) -> Vec<RenderedAttribute> {
        self.entries
            .iter()
            .filter_map(|(key, value)| {
                value.as_str().map(|value| RenderedAttribute {
                    key: key.clone(),
                    value: value.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_set_vs_cleared() {
        let mut attributes = Attributes::new();
        assert_eq!(attributes.get("stickiness.enabled"), None);

        attributes.set(STICKINESS_ENABLED_KEY, None);
        assert_eq!(
            attributes.get(STICKINESS_ENABLED_KEY),
            Some(&AttributeValue::Cleared)
        );
        assert!(attributes.render().is_empty());
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let mut attributes = Attributes::new();
        attributes.set(SLOW_START_KEY, Some("30".to_string()));
        attributes.set(SLOW_START_KEY, None);
        attributes.set(SLOW_START_KEY, Some("60".to_string()));

        assert_eq!(
            attributes.render(),
            vec![RenderedAttribute {
                key: SLOW_START_KEY.to_string(),
                value: "60".to_string(),
            }]
        );

        attributes.set(SLOW_START_KEY, None);
        assert!(attributes.render().is_empty());
    }
}

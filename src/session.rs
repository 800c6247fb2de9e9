//! Per-session key/value context
//!
//! Created when a shell session starts and dropped when it ends. The masking
//! rule list is one of the entries it carries.

use crate::masking::{MaskingPolicy, MaskingRule};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Key holding the masking rule list
pub const MASKING_RULES_KEY: &str = "data-masking-rules";

/// Session-scoped settings
#[derive(Debug, Default)]
pub struct Session {
    values: RwLock<HashMap<String, serde_json::Value>>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, returning the previous value
    pub fn set(&self, key: impl Into<String>, value: serde_json::Value) -> Option<serde_json::Value> {
        self.values.write().insert(key.into(), value)
    }

    /// Get a copy of `key`'s value
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.read().get(key).cloned()
    }

    /// Remove `key`, returning its value
    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        self.values.write().remove(key)
    }

    /// Keys currently set, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Store the masking rule list
    pub fn set_masking_rules(&self, rules: &[MaskingRule]) -> Result<()> {
        let value = serde_json::to_value(rules)
            .map_err(|e| Error::Config(format!("cannot store masking rules: {}", e)))?;
        self.set(MASKING_RULES_KEY, value);
        Ok(())
    }

    /// Masking policy from the stored rule list; empty when none is set.
    ///
    /// The entry may be the rule array itself or a JSON string containing it.
    pub fn masking_policy(&self) -> Result<MaskingPolicy> {
        let Some(value) = self.get(MASKING_RULES_KEY) else {
            return Ok(MaskingPolicy::default());
        };
        match value {
            serde_json::Value::Null => Ok(MaskingPolicy::default()),
            serde_json::Value::String(json) => MaskingPolicy::from_json(&json),
            other => {
                let rules: Vec<MaskingRule> = serde_json::from_value(other)
                    .map_err(|e| Error::Config(format!("invalid masking rules: {}", e)))?;
                MaskingPolicy::from_rules(rules)
            }
        }
    }
}

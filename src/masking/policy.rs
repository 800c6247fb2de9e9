//! Column name → masking rule resolution
//!
//! A policy is the ordered rule list from the rule source. Resolving it
//! against a result set's column names yields the `column index → rule` map
//! the masking reader consumes.

use super::rule::MaskingRule;
use crate::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

/// Ordered masking rules with their compiled field patterns
#[derive(Debug, Clone, Default)]
pub struct MaskingPolicy {
    entries: Vec<(MaskingRule, Regex)>,
}

impl MaskingPolicy {
    /// Compile a rule list, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a rule has an empty `fields_pattern`.
    pub fn from_rules(rules: Vec<MaskingRule>) -> Result<Self> {
        let entries = rules
            .into_iter()
            .map(|rule| {
                let regex = compile_fields_pattern(&rule.fields_pattern).map_err(|e| {
                    Error::Config(format!("masking rule '{}': {}", rule.name, e))
                })?;
                Ok((rule, regex))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Parse the JSON rule list stored by the rule source
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Vec<MaskingRule> = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid masking rules: {}", e)))?;
        Self::from_rules(rules)
    }

    /// Rules in source order
    pub fn rules(&self) -> impl Iterator<Item = &MaskingRule> {
        self.entries.iter().map(|(rule, _)| rule)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the policy has no rules
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First rule whose pattern matches `column`
    pub fn rule_for(&self, column: &str) -> Option<&MaskingRule> {
        self.entries
            .iter()
            .find(|(_, regex)| regex.is_match(column))
            .map(|(rule, _)| rule)
    }

    /// Map each matching column index to its rule; the first matching rule wins.
    pub fn resolve<S: AsRef<str>>(&self, columns: &[S]) -> HashMap<usize, MaskingRule> {
        let resolved: HashMap<usize, MaskingRule> = columns
            .iter()
            .enumerate()
            .filter_map(|(i, column)| self.rule_for(column.as_ref()).map(|r| (i, r.clone())))
            .collect();
        tracing::debug!(
            columns = columns.len(),
            masked = resolved.len(),
            "resolved masking rules"
        );
        resolved
    }
}

/// Build one anchored, case-insensitive regex from `a,b*,*c`
fn compile_fields_pattern(pattern: &str) -> std::result::Result<Regex, String> {
    let alternatives: Vec<String> = pattern
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| regex::escape(part).replace(r"\*", ".*"))
        .collect();

    if alternatives.is_empty() {
        return Err("fields_pattern is empty".to_string());
    }

    Regex::new(&format!("(?i)^(?:{})$", alternatives.join("|"))).map_err(|e| e.to_string())
}

//! Masking rules and the mask computation

use serde::{Deserialize, Serialize};

/// Character written over hidden positions
pub const MASK_CHAR: char = '*';

/// Characters kept by `keep_prefix` / `keep_suffix`
pub const KEEP_LEN: usize = 2;

/// Result of `keep_prefix` / `keep_suffix` when the value is too short to keep anything
pub const OUT_OF_RANGE_SENTINEL: &str = "####";

/// How a column value is masked
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaskingMethod {
    /// Replace the whole value with the rule's mask pattern
    FixedChar,
    /// Keep the first and last character
    HideMiddle,
    /// Keep the first two characters
    KeepPrefix,
    /// Keep the last two characters
    KeepSuffix,
    /// Unrecognized method; masks with the rule's pattern
    Other(String),
}

impl MaskingMethod {
    /// Wire name of the method
    pub fn as_str(&self) -> &str {
        match self {
            Self::FixedChar => "fixed_char",
            Self::HideMiddle => "hide_middle",
            Self::KeepPrefix => "keep_prefix",
            Self::KeepSuffix => "keep_suffix",
            Self::Other(name) => name,
        }
    }

    /// Whether the masked result depends on the column value.
    ///
    /// `fixed_char` and unknown methods always yield the mask pattern.
    pub fn reads_value(&self) -> bool {
        !matches!(self, Self::FixedChar | Self::Other(_))
    }

    /// Metrics label (unknown methods collapse to one label)
    pub fn label(&self) -> &'static str {
        match self {
            Self::FixedChar => "fixed_char",
            Self::HideMiddle => "hide_middle",
            Self::KeepPrefix => "keep_prefix",
            Self::KeepSuffix => "keep_suffix",
            Self::Other(_) => "other",
        }
    }
}

impl From<String> for MaskingMethod {
    fn from(s: String) -> Self {
        match s.as_str() {
            "fixed_char" => Self::FixedChar,
            "hide_middle" => Self::HideMiddle,
            "keep_prefix" => Self::KeepPrefix,
            "keep_suffix" => Self::KeepSuffix,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for MaskingMethod {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<MaskingMethod> for String {
    fn from(method: MaskingMethod) -> Self {
        method.as_str().to_string()
    }
}

impl std::fmt::Display for MaskingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A data-masking rule as stored in the rule source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingRule {
    /// Rule name
    pub name: String,
    /// Comma-separated column name patterns (`*` wildcard, case-insensitive)
    pub fields_pattern: String,
    /// Replacement text for `fixed_char` and for values that cannot be partially masked
    pub mask_pattern: String,
    /// Masking method
    pub masking_method: MaskingMethod,
}

impl MaskingRule {
    /// Create a rule
    pub fn new(
        name: impl Into<String>,
        fields_pattern: impl Into<String>,
        mask_pattern: impl Into<String>,
        masking_method: impl Into<MaskingMethod>,
    ) -> Self {
        Self {
            name: name.into(),
            fields_pattern: fields_pattern.into(),
            mask_pattern: mask_pattern.into(),
            masking_method: masking_method.into(),
        }
    }

    /// Mask `value` according to this rule
    pub fn apply(&self, value: &str) -> String {
        mask_text(&self.masking_method, &self.mask_pattern, value)
    }
}

/// Compute the masked replacement for `value`.
///
/// Lengths count characters, not bytes, so multi-byte text is never split.
pub fn mask_text(method: &MaskingMethod, mask_pattern: &str, value: &str) -> String {
    let len = value.chars().count();
    match method {
        MaskingMethod::FixedChar => mask_pattern.to_string(),
        MaskingMethod::HideMiddle => {
            if len < 3 {
                return mask_pattern.to_string();
            }
            let mut chars = value.chars();
            let first = chars.next().unwrap_or_default();
            let last = chars.next_back().unwrap_or_default();
            let mut masked = String::with_capacity(value.len());
            masked.push(first);
            masked.extend(std::iter::repeat(MASK_CHAR).take(len - 2));
            masked.push(last);
            masked
        }
        MaskingMethod::KeepPrefix => {
            if KEEP_LEN >= len {
                return OUT_OF_RANGE_SENTINEL.to_string();
            }
            let mut masked: String = value.chars().take(KEEP_LEN).collect();
            masked.extend(std::iter::repeat(MASK_CHAR).take(len - KEEP_LEN));
            masked
        }
        MaskingMethod::KeepSuffix => {
            if KEEP_LEN >= len {
                return OUT_OF_RANGE_SENTINEL.to_string();
            }
            let mut masked: String = std::iter::repeat(MASK_CHAR).take(len - KEEP_LEN).collect();
            masked.extend(value.chars().skip(len - KEEP_LEN));
            masked
        }
        MaskingMethod::Other(_) => mask_pattern.to_string(),
    }
}

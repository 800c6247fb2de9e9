//! Data masking
//!
//! Rules describe how a column is masked; a policy maps result-set column
//! names onto rules. The row readers that apply them live in `crate::stream`.

mod policy;
mod rule;

pub use policy::MaskingPolicy;
pub use rule::{mask_text, MaskingMethod, MaskingRule, KEEP_LEN, MASK_CHAR, OUT_OF_RANGE_SENTINEL};

//! Cursor wrapper that masks configured columns on every scan
//!
//! The wrapped cursor always scans into an internal scratch row, so the raw
//! value of a masked column never reaches the caller's destinations. Masked
//! positions are delivered as `Value::Text`; every other position is moved
//! through unchanged.

use super::cursor::{ColumnType, RowCursor, Value};
use crate::masking::{MaskingPolicy, MaskingRule};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Masking wrapper around a row cursor
pub struct MaskingRowReader<C> {
    cursor: C,
    masked: HashSet<usize>,
    rules: HashMap<usize, MaskingRule>,
    scratch: Option<Vec<Value>>,
}

impl<C: RowCursor> MaskingRowReader<C> {
    /// Wrap `cursor`, masking the `masked` column indexes that have a rule in `rules`.
    ///
    /// A masked index without a rule is copied through.
    pub fn new(
        cursor: C,
        masked: impl IntoIterator<Item = usize>,
        rules: HashMap<usize, MaskingRule>,
    ) -> Self {
        Self {
            cursor,
            masked: masked.into_iter().collect(),
            rules,
            scratch: None,
        }
    }

    /// Wrap `cursor`, masking exactly the columns in `rules`
    pub fn from_rules(cursor: C, rules: HashMap<usize, MaskingRule>) -> Self {
        let masked: Vec<usize> = rules.keys().copied().collect();
        Self::new(cursor, masked, rules)
    }

    /// Wrap `cursor`, resolving `policy` against its column names
    pub fn with_policy(cursor: C, policy: &MaskingPolicy) -> Result<Self> {
        let columns = cursor.columns()?;
        Ok(Self::from_rules(cursor, policy.resolve(&columns)))
    }

    /// Masked column indexes, sorted
    pub fn masked_columns(&self) -> Vec<usize> {
        let mut masked: Vec<usize> = self.masked.iter().copied().collect();
        masked.sort_unstable();
        masked
    }

    /// The wrapped cursor
    pub fn get_ref(&self) -> &C {
        &self.cursor
    }

    /// Unwrap, returning the cursor
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: RowCursor> RowCursor for MaskingRowReader<C> {
    fn next(&mut self) -> bool {
        self.cursor.next()
    }

    fn scan(&mut self, dest: &mut [Value]) -> Result<()> {
        let scratch = self
            .scratch
            .get_or_insert_with(|| vec![Value::Null; dest.len()]);
        if scratch.len() != dest.len() {
            return Err(Error::Scan(format!(
                "scan width changed from {} to {} columns",
                scratch.len(),
                dest.len()
            )));
        }

        self.cursor.scan(scratch)?;
        mask_values(&self.masked, &self.rules, scratch)?;

        for (out, value) in dest.iter_mut().zip(scratch.iter_mut()) {
            *out = std::mem::take(value);
        }
        Ok(())
    }

    fn columns(&self) -> Result<Vec<String>> {
        self.cursor.columns()
    }

    fn column_types(&self) -> Result<Vec<ColumnType>> {
        self.cursor.column_types()
    }

    fn close(&mut self) -> Result<()> {
        self.cursor.close()
    }

    fn err(&self) -> Option<&Error> {
        self.cursor.err()
    }

    fn next_result_set(&mut self) -> bool {
        self.cursor.next_result_set()
    }
}

/// Replace masked positions of `row` in place.
///
/// All replacements are computed before any is written, so on error `row`
/// is left exactly as scanned.
pub(crate) fn mask_values(
    masked: &HashSet<usize>,
    rules: &HashMap<usize, MaskingRule>,
    row: &mut [Value],
) -> Result<()> {
    let mut replacements = Vec::with_capacity(masked.len());
    for (i, value) in row.iter().enumerate() {
        if !masked.contains(&i) {
            continue;
        }
        let Some(rule) = rules.get(&i) else {
            continue;
        };
        let text = match value {
            Value::Null => rule.mask_pattern.clone(),
            _ if !rule.masking_method.reads_value() => rule.mask_pattern.clone(),
            Value::Text(s) => rule.apply(s),
            Value::Bytes(b) => {
                let s = std::str::from_utf8(b).map_err(|e| {
                    Error::Scan(format!("column {} cannot be masked: {}", i, e))
                })?;
                rule.apply(s)
            }
        };
        replacements.push((i, rule.masking_method.label(), text));
    }

    for (i, label, text) in replacements {
        row[i] = Value::Text(text);
        crate::metrics::counters::columns_masked(label, 1);
    }
    Ok(())
}

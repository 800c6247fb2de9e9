//! Row cursor surface shared by drivers and the masking reader

use crate::{Error, Result};
use bytes::Bytes;
use std::collections::VecDeque;

/// A single column value as delivered by the driver adapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// Raw column bytes
    Bytes(Bytes),
    /// Text column
    Text(String),
}

impl Value {
    /// Whether this is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text view of the value: `Text` as-is, `Bytes` if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Bytes(b) => std::str::from_utf8(b).ok(),
            Self::Text(s) => Some(s),
        }
    }

    /// Raw bytes of the value (text is returned as its UTF-8 encoding)
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Null => None,
            Self::Bytes(b) => Some(b),
            Self::Text(s) => Some(s.as_bytes()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(b))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Declared type of a result column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    /// Column name
    pub name: String,
    /// Database type name (e.g. `VARCHAR`)
    pub database_type: String,
    /// Nullability, when the driver reports it
    pub nullable: Option<bool>,
}

impl ColumnType {
    /// Column with unknown nullability
    pub fn new(name: impl Into<String>, database_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database_type: database_type.into(),
            nullable: None,
        }
    }
}

/// A live cursor over a query's result rows.
///
/// Single consumer: callers serialize `next`/`scan` the same way the driver's
/// own cursor requires.
pub trait RowCursor {
    /// Advance to the next row; false when exhausted or failed (see `err`)
    fn next(&mut self) -> bool;

    /// Read the current row into `dest`, one slot per column
    fn scan(&mut self, dest: &mut [Value]) -> Result<()>;

    /// Column names of the current result set
    fn columns(&self) -> Result<Vec<String>>;

    /// Column types of the current result set
    fn column_types(&self) -> Result<Vec<ColumnType>>;

    /// Release the cursor
    fn close(&mut self) -> Result<()>;

    /// Error that stopped iteration, if any
    fn err(&self) -> Option<&Error>;

    /// Advance to the next result set
    fn next_result_set(&mut self) -> bool;
}

impl<C: RowCursor + ?Sized> RowCursor for Box<C> {
    fn next(&mut self) -> bool {
        (**self).next()
    }

    fn scan(&mut self, dest: &mut [Value]) -> Result<()> {
        (**self).scan(dest)
    }

    fn columns(&self) -> Result<Vec<String>> {
        (**self).columns()
    }

    fn column_types(&self) -> Result<Vec<ColumnType>> {
        (**self).column_types()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn err(&self) -> Option<&Error> {
        (**self).err()
    }

    fn next_result_set(&mut self) -> bool {
        (**self).next_result_set()
    }
}

impl<C: RowCursor + ?Sized> RowCursor for &mut C {
    fn next(&mut self) -> bool {
        (**self).next()
    }

    fn scan(&mut self, dest: &mut [Value]) -> Result<()> {
        (**self).scan(dest)
    }

    fn columns(&self) -> Result<Vec<String>> {
        (**self).columns()
    }

    fn column_types(&self) -> Result<Vec<ColumnType>> {
        (**self).column_types()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn err(&self) -> Option<&Error> {
        (**self).err()
    }

    fn next_result_set(&mut self) -> bool {
        (**self).next_result_set()
    }
}

/// One materialized result set
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Column declarations
    pub columns: Vec<ColumnType>,
    /// Rows, each as wide as `columns`
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Result set with untyped columns
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|name| ColumnType::new(name, "TEXT"))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    pub fn row<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Cursor over result sets already held in memory
#[derive(Debug, Default)]
pub struct MemoryCursor {
    current: Option<ResultSet>,
    pending: VecDeque<ResultSet>,
    row: Option<Vec<Value>>,
    position: usize,
    closed: bool,
}

impl MemoryCursor {
    /// Cursor over `sets`, positioned before the first row of the first set
    pub fn new(sets: impl IntoIterator<Item = ResultSet>) -> Self {
        let mut pending: VecDeque<ResultSet> = sets.into_iter().collect();
        Self {
            current: pending.pop_front(),
            pending,
            row: None,
            position: 0,
            closed: false,
        }
    }

    /// Whether `close` was called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn current(&self) -> Result<&ResultSet> {
        if self.closed {
            return Err(Error::Scan("cursor is closed".into()));
        }
        self.current
            .as_ref()
            .ok_or_else(|| Error::Scan("no result set".into()))
    }
}

impl RowCursor for MemoryCursor {
    fn next(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let Some(set) = self.current.as_mut() else {
            return false;
        };
        if self.position >= set.rows.len() {
            self.row = None;
            return false;
        }
        self.row = Some(std::mem::take(&mut set.rows[self.position]));
        self.position += 1;
        true
    }

    fn scan(&mut self, dest: &mut [Value]) -> Result<()> {
        let width = self.current()?.columns.len();
        let row = self
            .row
            .as_ref()
            .ok_or_else(|| Error::Scan("scan called without a current row".into()))?;
        if dest.len() != width || row.len() != width {
            return Err(Error::Scan(format!(
                "expected {} destination values, got {}",
                width,
                dest.len()
            )));
        }
        dest.clone_from_slice(row);
        Ok(())
    }

    fn columns(&self) -> Result<Vec<String>> {
        Ok(self.current()?.columns.iter().map(|c| c.name.clone()).collect())
    }

    fn column_types(&self) -> Result<Vec<ColumnType>> {
        Ok(self.current()?.columns.clone())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.row = None;
        Ok(())
    }

    fn err(&self) -> Option<&Error> {
        None
    }

    fn next_result_set(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.row = None;
        self.position = 0;
        self.current = self.pending.pop_front();
        self.current.is_some()
    }
}

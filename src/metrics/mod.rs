//! Metrics for DSN resolution and column masking
//!
//! Recorded through the `metrics` facade; nothing is emitted unless the
//! application installs a recorder.

pub mod counters;
pub mod labels;

//! Metric names and label keys

/// DSNs successfully resolved
pub const DSN_RESOLVED: &str = "sqlguard_dsn_resolved_total";
/// DSN resolutions that failed
pub const DSN_RESOLVE_FAILED: &str = "sqlguard_dsn_resolve_failed_total";
/// TLS configurations registered
pub const TLS_REGISTERED: &str = "sqlguard_tls_registered_total";
/// Column values replaced by a mask
pub const COLUMNS_MASKED: &str = "sqlguard_columns_masked_total";

/// Driver name label
pub const DRIVER: &str = "driver";
/// Error category label
pub const CATEGORY: &str = "category";
/// TLS naming strategy label
pub const NAMING: &str = "naming";
/// Masking method label
pub const METHOD: &str = "method";

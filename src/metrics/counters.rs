//! Counter helpers

use super::labels;

/// A DSN was resolved for `driver`
pub fn dsn_resolved(driver: &str) {
    metrics::counter!(labels::DSN_RESOLVED, labels::DRIVER => driver.to_string()).increment(1);
}

/// Resolution for `driver` failed with an error of `category`
pub fn dsn_resolve_failed(driver: &str, category: &'static str) {
    metrics::counter!(
        labels::DSN_RESOLVE_FAILED,
        labels::DRIVER => driver.to_string(),
        labels::CATEGORY => category
    )
    .increment(1);
}

/// A TLS configuration was registered using `naming`
pub fn tls_registered(naming: &'static str) {
    metrics::counter!(labels::TLS_REGISTERED, labels::NAMING => naming).increment(1);
}

/// `count` values were masked with `method`
pub fn columns_masked(method: &'static str, count: u64) {
    if count == 0 {
        return;
    }
    metrics::counter!(labels::COLUMNS_MASKED, labels::METHOD => method).increment(count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_without_recorder() {
        // No recorder installed: every call is a no-op
        dsn_resolved("mysql");
        dsn_resolve_failed("mysql", "config");
        tls_registered("fixed");
        columns_masked("hide_middle", 3);
        columns_masked("hide_middle", 0);
    }
}

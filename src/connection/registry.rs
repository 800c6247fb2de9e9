//! Named TLS configuration registry
//!
//! Drivers look TLS configurations up by the name carried in the DSN `tls`
//! parameter. The registry is owned by whoever owns the connection pool and is
//! handed to both the resolver (writer) and the driver (reader).

use super::tls::{TlsConfig, TlsParam};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Thread-safe name → TLS configuration map
#[derive(Debug, Default)]
pub struct TlsRegistry {
    configs: RwLock<HashMap<String, TlsConfig>>,
}

impl TlsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `config` under `name`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `name` is empty or is one of the keywords the
    /// DSN grammar reserves for the `tls` parameter (`true`, `false`,
    /// `skip-verify`, `preferred`).
    pub fn register(&self, name: &str, config: TlsConfig) -> Result<()> {
        if TlsParam::is_reserved(name) {
            return Err(Error::Config(format!(
                "failed to register custom TLS config: '{}' is a reserved name",
                name
            )));
        }

        let replaced = self.configs.write().insert(name.to_string(), config);
        if replaced.is_some() {
            tracing::debug!(name, "replaced registered TLS config");
        } else {
            tracing::debug!(name, "registered TLS config");
        }
        Ok(())
    }

    /// Look up a configuration by name
    pub fn get(&self, name: &str) -> Option<TlsConfig> {
        self.configs.read().get(name).cloned()
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.configs.read().contains_key(name)
    }

    /// Remove a configuration, returning it
    pub fn deregister(&self, name: &str) -> Option<TlsConfig> {
        self.configs.write().remove(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered configurations
    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }

    /// A ready-to-use connector for drivers that perform the TLS handshake themselves
    pub fn connector(&self, name: &str) -> Option<tokio_rustls::TlsConnector> {
        self.get(name)
            .map(|config| tokio_rustls::TlsConnector::from(config.client_config()))
    }
}

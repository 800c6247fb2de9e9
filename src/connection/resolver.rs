//! Driver-open hook: DSN hardening and custom TLS registration
//!
//! Every connection attempt goes through the same steps:
//! 1. percent-decode the DSN when the caller passes it path-escaped
//! 2. swap the username for a placeholder the DSN parser can carry
//! 3. bracket IPv6 literal hosts
//! 4. merge fragment options into the query; for `tls=custom`, load the `ssl-*`
//!    files and register the resulting TLS config (the paths never reach the driver)
//! 5. force the driver profile's baseline parameters
//! 6. re-encode and restore the original username
//! 7. hand the DSN to the driver

use super::driver::Driver;
use super::registry::TlsRegistry;
use super::tls::{TlsMaterial, TlsNaming, TlsParam, TlsPaths, TlsPolicy, CUSTOM_TLS_NAME};
use crate::client::{ConnectionUrl, Dsn, QueryParams};
use crate::{Error, Result};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

/// DSN query parameter selecting the TLS mode
pub const PARAM_TLS: &str = "tls";
/// CA bundle path parameter
pub const PARAM_SSL_CA: &str = "ssl-ca";
/// Client certificate path parameter
pub const PARAM_SSL_CERT: &str = "ssl-cert";
/// Client key path parameter
pub const PARAM_SSL_KEY: &str = "ssl-key";

/// How the caller encodes the DSN it passes to the open function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DsnEncoding {
    /// DSN is passed as-is
    #[default]
    Raw,
    /// DSN is path-escaped and must be percent-decoded first
    PathEscaped,
}

/// Resolver configuration
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// DSN calling convention
    pub dsn_encoding: DsnEncoding,
    /// Which `ssl-*` files `tls=custom` requires
    pub tls_policy: TlsPolicy,
    /// Registry naming for custom TLS material
    pub tls_naming: TlsNaming,
    /// Forced parameters; None uses the driver profile's
    pub forced_params: Option<Vec<(String, String)>>,
}

impl ResolverConfig {
    /// Create a builder
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = ResolverConfig::builder()
    ///     .dsn_encoding(DsnEncoding::PathEscaped)
    ///     .tls_policy(TlsPolicy::RequireAll)
    ///     .tls_naming(TlsNaming::ContentAddressed)
    ///     .build();
    /// ```
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }
}

/// Builder for `ResolverConfig`
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Set the DSN calling convention
    pub fn dsn_encoding(mut self, encoding: DsnEncoding) -> Self {
        self.config.dsn_encoding = encoding;
        self
    }

    /// Set the TLS file policy
    pub fn tls_policy(mut self, policy: TlsPolicy) -> Self {
        self.config.tls_policy = policy;
        self
    }

    /// Set the TLS registry naming
    pub fn tls_naming(mut self, naming: TlsNaming) -> Self {
        self.config.tls_naming = naming;
        self
    }

    /// Add a forced parameter (replaces the driver profile's list)
    pub fn force_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .forced_params
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Disable forced parameters
    pub fn no_forced_params(mut self) -> Self {
        self.config.forced_params = Some(Vec::new());
        self
    }

    /// Build the configuration
    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

/// The DSN handed to the driver
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedDsn {
    /// Final DSN
    pub dsn: String,
    /// Registry name of the custom TLS config, when one was registered
    pub tls_name: Option<String>,
}

impl std::fmt::Debug for ResolvedDsn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDsn")
            .field("dsn", &"<redacted>")
            .field("tls_name", &self.tls_name)
            .finish()
    }
}

/// Secure front end to a driver's connect primitive
pub struct ConnectionResolver<D: Driver> {
    registry: Arc<TlsRegistry>,
    driver: D,
    config: ResolverConfig,
}

impl<D: Driver> ConnectionResolver<D> {
    /// Create a resolver writing custom TLS configs into `registry`
    pub fn new(registry: Arc<TlsRegistry>, driver: D, config: ResolverConfig) -> Self {
        Self {
            registry,
            driver,
            config,
        }
    }

    /// The shared TLS registry
    pub fn registry(&self) -> &Arc<TlsRegistry> {
        &self.registry
    }

    /// The wrapped driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Prepare an open function for a connection URL.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the URL scheme is not served by this driver.
    pub fn open(&self, url: &ConnectionUrl) -> Result<OpenFn<'_, D>> {
        let profile = self.driver.profile();
        if !profile.serves(url.scheme()) {
            return Err(Error::Config(format!(
                "driver '{}' cannot open '{}' URLs",
                profile.name,
                url.scheme()
            )));
        }
        Ok(OpenFn {
            resolver: self,
            url: url.clone(),
        })
    }

    /// Rewrite `dsn` without connecting.
    ///
    /// Registers the custom TLS config as a side effect when the DSN asks for one.
    pub fn resolve(&self, url: &ConnectionUrl, dsn: &str) -> Result<ResolvedDsn> {
        let driver_name = self.driver.profile().name.as_str();
        let span = tracing::info_span!("resolve_dsn", driver = %driver_name, host = %url.hostname());
        let _enter = span.enter();

        match self.resolve_inner(url, dsn) {
            Ok(resolved) => {
                tracing::debug!(custom_tls = resolved.tls_name.is_some(), "DSN resolved");
                crate::metrics::counters::dsn_resolved(driver_name);
                Ok(resolved)
            }
            Err(e) => {
                tracing::debug!(category = e.category(), "DSN resolution failed");
                crate::metrics::counters::dsn_resolve_failed(driver_name, e.category());
                Err(e)
            }
        }
    }

    fn resolve_inner(&self, url: &ConnectionUrl, dsn: &str) -> Result<ResolvedDsn> {
        let decoded = match self.config.dsn_encoding {
            DsnEncoding::Raw => Cow::Borrowed(dsn),
            DsnEncoding::PathEscaped => percent_decode_str(dsn)
                .decode_utf8()
                .map_err(|e| Error::Parse(format!("invalid path-escaped DSN: {}", e)))?,
        };

        let mut parsed = Dsn::parse(&decoded, url.host())?;

        let tls_name = self.apply_custom_tls(parsed.params_mut())?;

        let forced = self
            .config
            .forced_params
            .as_ref()
            .unwrap_or(&self.driver.profile().forced_params);
        for (key, value) in forced {
            parsed.params_mut().set(key.as_str(), value.as_str());
        }

        Ok(ResolvedDsn {
            dsn: parsed.to_dsn_string()?,
            tls_name,
        })
    }

    /// Strip the `ssl-*` paths and, for `tls=custom`, register the TLS config.
    ///
    /// Every file is read and the config fully built before the registry is touched.
    fn apply_custom_tls(&self, params: &mut QueryParams) -> Result<Option<String>> {
        let paths = take_tls_paths(params);

        let tls = match params.get_non_empty(PARAM_TLS) {
            Some(value) => value.parse::<TlsParam>()?,
            None => TlsParam::Disabled,
        };

        if !tls.is_custom() {
            if paths != TlsPaths::default() {
                tracing::warn!(tls = %tls, "dropping ssl-* parameters: tls is not custom");
            }
            return Ok(None);
        }

        self.config.tls_policy.validate(&paths)?;
        let material = TlsMaterial::load(&paths)?;
        let tls_config = material.build()?;

        let naming = self.config.tls_naming;
        let name = naming.name_for(&material);
        self.registry.register(&name, tls_config)?;
        crate::metrics::counters::tls_registered(naming.as_str());
        tracing::info!(
            name = %name,
            custom_ca = material.has_ca(),
            client_cert = material.has_client_identity(),
            "custom TLS config registered"
        );

        if name != CUSTOM_TLS_NAME {
            params.set(PARAM_TLS, name.as_str());
        }
        Ok(Some(name))
    }
}

/// Remove the `ssl-*` parameters, keeping their non-empty values as paths
fn take_tls_paths(params: &mut QueryParams) -> TlsPaths {
    let mut take = |key: &str| {
        params
            .remove(key)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };
    TlsPaths {
        ca: take(PARAM_SSL_CA),
        cert: take(PARAM_SSL_CERT),
        key: take(PARAM_SSL_KEY),
    }
}

/// Open function bound to one connection URL; called once per connection attempt
pub struct OpenFn<'a, D: Driver> {
    resolver: &'a ConnectionResolver<D>,
    url: ConnectionUrl,
}

impl<'a, D: Driver> OpenFn<'a, D> {
    /// Resolve `dsn` and connect through the driver.
    ///
    /// Driver errors are returned unchanged.
    pub async fn call(&self, driver_name: &str, dsn: &str) -> Result<D::Connection> {
        let profile = self.resolver.driver.profile();
        if !profile.serves(driver_name) {
            return Err(Error::Config(format!(
                "driver '{}' cannot open connections for '{}'",
                profile.name, driver_name
            )));
        }

        let resolved = self.resolver.resolve(&self.url, dsn)?;
        self.resolver.driver.connect(&resolved.dsn).await
    }

    /// The URL this function was opened for
    pub fn url(&self) -> &ConnectionUrl {
        &self.url
    }
}

//! Connection opening
//!
//! This module handles:
//! * DSN hardening before the driver sees it (credentials, IPv6 hosts, forced params)
//! * Custom TLS material loading and registration
//! * The driver seam the resolved DSN is handed to

mod driver;
mod registry;
mod resolver;
mod tls;

pub use driver::{Driver, DriverProfile};
pub use registry::TlsRegistry;
pub use resolver::{
    ConnectionResolver, DsnEncoding, OpenFn, ResolvedDsn, ResolverConfig, ResolverConfigBuilder,
    PARAM_SSL_CA, PARAM_SSL_CERT, PARAM_SSL_KEY, PARAM_TLS,
};
pub use tls::{
    TlsConfig, TlsConfigBuilder, TlsMaterial, TlsNaming, TlsParam, TlsPaths, TlsPolicy,
    CUSTOM_TLS_NAME,
};

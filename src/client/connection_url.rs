//! Caller-side connection URL
//!
//! The shell parses the URL the user typed before any driver is opened. The
//! resolver only needs a few facts from it: the scheme (to pick a driver profile)
//! and the bare hostname (to detect IPv6 literals).

use crate::{Error, Result};
use url::{Host, Url};

/// An already-parsed connection URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUrl {
    scheme: String,
    hostname: String,
    port: Option<u16>,
}

impl ConnectionUrl {
    /// Parse a connection URL such as `mysql://user@db.local:3306/shop`
    pub fn parse(s: &str) -> Result<Self> {
        let url = Url::parse(s).map_err(|e| Error::Parse(format!("invalid URL: {}", e)))?;

        let hostname = match url.host() {
            Some(Host::Ipv6(addr)) => addr.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Domain(domain)) => domain.to_string(),
            None => String::new(),
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            hostname,
            port: url.port(),
        })
    }

    /// Build from already-known parts
    pub fn new(scheme: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            hostname: hostname.into(),
            port: None,
        }
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Scheme, lowercased
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Hostname without IPv6 brackets (empty when the URL has no host)
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Hostname, or None when empty
    pub fn host(&self) -> Option<&str> {
        (!self.hostname.is_empty()).then_some(self.hostname.as_str())
    }

    /// Port, if given
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

//! TLS material loading and client configuration.
//!
//! A DSN asking for `tls=custom` points at PEM files through `ssl-ca`, `ssl-cert`
//! and `ssl-key`. This module reads those files once per connection attempt and
//! compiles them into a rustls `ClientConfig`. Nothing here is logged: neither the
//! certificate bytes nor the key.

use crate::{Error, Result};
use rustls::ClientConfig;
use rustls::RootCertStore;
use rustls_pemfile::Item;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Registry name used for custom TLS material
pub const CUSTOM_TLS_NAME: &str = "custom";

/// Value of the DSN `tls` parameter.
///
/// Mirrors the MySQL DSN grammar: boolean values, `skip-verify`, `preferred`,
/// or the name of a registered configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsParam {
    /// `tls=false`
    Disabled,
    /// `tls=true`
    Enabled,
    /// `tls=skip-verify`
    SkipVerify,
    /// `tls=preferred`
    Preferred,
    /// `tls=<name>`: a registered configuration
    Named(String),
}

impl TlsParam {
    /// Whether this refers to the custom configuration built from `ssl-*` files
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Named(name) if name == CUSTOM_TLS_NAME)
    }

    /// Whether `name` is one of the keywords the DSN grammar reserves
    pub fn is_reserved(name: &str) -> bool {
        !matches!(name.parse::<TlsParam>(), Ok(TlsParam::Named(_)))
    }
}

impl std::fmt::Display for TlsParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "false"),
            Self::Enabled => write!(f, "true"),
            Self::SkipVerify => write!(f, "skip-verify"),
            Self::Preferred => write!(f, "preferred"),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}

impl std::str::FromStr for TlsParam {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" => Err(Error::Config("empty tls parameter".into())),
            "false" | "0" => Ok(Self::Disabled),
            "true" | "1" => Ok(Self::Enabled),
            "skip-verify" => Ok(Self::SkipVerify),
            "preferred" => Ok(Self::Preferred),
            _ => Ok(Self::Named(s.to_string())),
        }
    }
}

/// Which of the `ssl-*` files a `tls=custom` DSN must carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsPolicy {
    /// CA optional; client certificate and key optional but only as a pair
    #[default]
    Optional,
    /// CA, client certificate and key are all mandatory
    RequireAll,
}

impl TlsPolicy {
    /// Check the supplied paths against this policy
    pub fn validate(&self, paths: &TlsPaths) -> Result<()> {
        match self {
            Self::RequireAll => {
                if paths.ca.is_none() || paths.cert.is_none() || paths.key.is_none() {
                    return Err(Error::Config(
                        "tls=custom requires ssl-ca, ssl-cert and ssl-key".into(),
                    ));
                }
            }
            Self::Optional => {
                if paths.cert.is_some() != paths.key.is_some() {
                    return Err(Error::Config(
                        "ssl-cert and ssl-key must be given together".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// How the registry name for custom material is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsNaming {
    /// Always register under `custom`; concurrent connections with different
    /// material overwrite each other
    #[default]
    Fixed,
    /// Register under `custom-<fingerprint>` and point the DSN at that name
    ContentAddressed,
}

impl TlsNaming {
    /// Registry name for `material`
    pub fn name_for(&self, material: &TlsMaterial) -> String {
        match self {
            Self::Fixed => CUSTOM_TLS_NAME.to_string(),
            Self::ContentAddressed => {
                format!("{}-{}", CUSTOM_TLS_NAME, &material.fingerprint()[..16])
            }
        }
    }

    /// Label used in metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::ContentAddressed => "content_addressed",
        }
    }
}

/// File paths taken from the `ssl-*` DSN parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsPaths {
    /// `ssl-ca`
    pub ca: Option<PathBuf>,
    /// `ssl-cert`
    pub cert: Option<PathBuf>,
    /// `ssl-key`
    pub key: Option<PathBuf>,
}

/// Certificate material read from disk for one connection attempt
#[derive(Clone, Default)]
pub struct TlsMaterial {
    ca_pem: Option<Vec<u8>>,
    cert_pem: Option<Vec<u8>>,
    key_pem: Option<Vec<u8>>,
}

impl TlsMaterial {
    /// Read every file named in `paths`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any file cannot be read.
    pub fn load(paths: &TlsPaths) -> Result<Self> {
        Ok(Self {
            ca_pem: paths
                .ca
                .as_deref()
                .map(|p| read_pem(p, "CA certificate"))
                .transpose()?,
            cert_pem: paths
                .cert
                .as_deref()
                .map(|p| read_pem(p, "client certificate"))
                .transpose()?,
            key_pem: paths
                .key
                .as_deref()
                .map(|p| read_pem(p, "client key"))
                .transpose()?,
        })
    }

    /// Material from in-memory PEM data
    pub fn from_pem(ca: Option<Vec<u8>>, cert: Option<Vec<u8>>, key: Option<Vec<u8>>) -> Self {
        Self {
            ca_pem: ca,
            cert_pem: cert,
            key_pem: key,
        }
    }

    /// Whether a CA bundle is present
    pub fn has_ca(&self) -> bool {
        self.ca_pem.is_some()
    }

    /// Whether a client certificate and key are present
    pub fn has_client_identity(&self) -> bool {
        self.cert_pem.is_some() && self.key_pem.is_some()
    }

    /// Hex SHA-256 over the CA, certificate and key bytes
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (label, part) in [
            (b'a', &self.ca_pem),
            (b'c', &self.cert_pem),
            (b'k', &self.key_pem),
        ] {
            hasher.update([label]);
            match part {
                Some(bytes) => {
                    hasher.update((bytes.len() as u64).to_be_bytes());
                    hasher.update(bytes);
                }
                None => hasher.update(u64::MAX.to_be_bytes()),
            }
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Compile the material into a TLS configuration
    pub fn build(&self) -> Result<TlsConfig> {
        let mut builder = TlsConfig::builder();
        if let Some(ca) = &self.ca_pem {
            builder = builder.ca_pem(ca.clone());
        }
        if let (Some(cert), Some(key)) = (&self.cert_pem, &self.key_pem) {
            builder = builder.client_identity_pem(cert.clone(), key.clone());
        } else if self.cert_pem.is_some() || self.key_pem.is_some() {
            return Err(Error::Config(
                "client certificate and key must be given together".into(),
            ));
        }
        builder.build()
    }
}

impl std::fmt::Debug for TlsMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsMaterial")
            .field("ca", &self.ca_pem.as_ref().map(|_| "<redacted>"))
            .field("cert", &self.cert_pem.as_ref().map(|_| "<redacted>"))
            .field("key", &self.key_pem.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        Error::Config(format!(
            "failed to read {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}

/// TLS configuration registered for a driver to use when dialing.
///
/// # Examples
///
/// ```ignore
/// use sqlguard::connection::TlsConfig;
///
/// // System roots, no client certificate
/// let tls = TlsConfig::builder().build()?;
///
/// // Custom CA and a client identity (mutual TLS)
/// let tls = TlsConfig::builder()
///     .ca_pem(std::fs::read("/etc/mysql/ca.pem")?)
///     .client_identity_pem(cert_pem, key_pem)
///     .build()?;
/// ```
#[derive(Clone)]
pub struct TlsConfig {
    /// Whether roots came from a custom CA bundle
    custom_ca: bool,
    /// Whether a client identity is configured
    client_auth: bool,
    /// Compiled rustls ClientConfig
    client_config: Arc<ClientConfig>,
}

impl TlsConfig {
    /// Create a new TLS configuration builder.
    pub fn builder() -> TlsConfigBuilder {
        TlsConfigBuilder::default()
    }

    /// Get the rustls ClientConfig for this TLS configuration.
    pub fn client_config(&self) -> Arc<ClientConfig> {
        self.client_config.clone()
    }

    /// Whether the root store was built from a custom CA bundle
    pub fn has_custom_ca(&self) -> bool {
        self.custom_ca
    }

    /// Whether a client certificate is presented
    pub fn has_client_auth(&self) -> bool {
        self.client_auth
    }
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("custom_ca", &self.custom_ca)
            .field("client_auth", &self.client_auth)
            .field("client_config", &"<ClientConfig>")
            .finish()
    }
}

/// Builder for TLS configuration.
#[derive(Default)]
pub struct TlsConfigBuilder {
    ca_pem: Option<Vec<u8>>,
    client_identity: Option<(Vec<u8>, Vec<u8>)>,
}

impl TlsConfigBuilder {
    /// Trust only the certificates in this PEM bundle.
    ///
    /// If not set, system root certificates are used.
    pub fn ca_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_pem = Some(pem.into());
        self
    }

    /// Present this certificate chain and private key (PEM) to the server.
    pub fn client_identity_pem(
        mut self,
        cert_pem: impl Into<Vec<u8>>,
        key_pem: impl Into<Vec<u8>>,
    ) -> Self {
        self.client_identity = Some((cert_pem.into(), key_pem.into()));
        self
    }

    /// Build the TLS configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if:
    /// - the CA bundle is not valid PEM or holds no usable certificate
    /// - the client certificate or key cannot be parsed
    /// - rustls rejects the certificate/key pair
    pub fn build(self) -> Result<TlsConfig> {
        let custom_ca = self.ca_pem.is_some();
        let root_store = match &self.ca_pem {
            Some(pem) => load_custom_ca(pem)?,
            None => system_roots()?,
        };

        let builder = ClientConfig::builder().with_root_certificates(root_store);

        let (client_config, client_auth) = match self.client_identity {
            Some((cert_pem, key_pem)) => {
                let certs = load_certificates(&cert_pem)?;
                let key = load_private_key(&key_pem)?;
                let config = builder.with_client_auth_cert(certs, key).map_err(|e| {
                    Error::Config(format!("failed to load client cert and key: {}", e))
                })?;
                (config, true)
            }
            None => (builder.with_no_client_auth(), false),
        };

        Ok(TlsConfig {
            custom_ca,
            client_auth,
            client_config: Arc::new(client_config),
        })
    }
}

/// Build a root store holding exactly the certificates of a PEM bundle.
fn load_custom_ca(pem: &[u8]) -> Result<RootCertStore> {
    let mut reader = std::io::Cursor::new(pem);
    let mut root_store = RootCertStore::empty();
    let mut found_certs = 0;

    loop {
        match rustls_pemfile::read_one(&mut reader) {
            Ok(Some(Item::X509Certificate(cert))) => {
                let (added, _ignored) = root_store.add_parsable_certificates(std::iter::once(cert));
                found_certs += added;
            }
            Ok(Some(_)) => {
                // Keys and other items in a CA bundle are ignored
            }
            Ok(None) => break,
            Err(_) => {
                return Err(Error::Config(
                    "failed to parse CA certificate bundle".into(),
                ));
            }
        }
    }

    if found_certs == 0 {
        return Err(Error::Config(
            "failed to append CA cert to pool: no valid certificates found".into(),
        ));
    }

    Ok(root_store)
}

/// System roots, falling back to the bundled Mozilla roots when none load
fn system_roots() -> Result<RootCertStore> {
    let result = rustls_native_certs::load_native_certs();

    let mut store = RootCertStore::empty();
    for cert in result.certs {
        let _ = store.add_parsable_certificates(std::iter::once(cert));
    }

    if store.is_empty() {
        tracing::debug!("no usable system root certificates, using bundled roots");
        store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    if store.is_empty() {
        return Err(Error::Config(
            "failed to load any root certificates".to_string(),
        ));
    }

    Ok(store)
}

fn load_certificates(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = std::io::Cursor::new(pem);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Config(format!("failed to parse client certificate: {}", e)))?;

    if certs.is_empty() {
        return Err(Error::Config(
            "no certificates found in client certificate file".into(),
        ));
    }
    Ok(certs)
}

fn load_private_key(pem: &[u8]) -> Result<PrivateKeyDer<'static>> {
    let mut reader = std::io::Cursor::new(pem);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| Error::Config(format!("failed to parse client key: {}", e)))?
        .ok_or_else(|| Error::Config("no private key found in client key file".into()))
}

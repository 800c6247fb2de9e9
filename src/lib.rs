//! sqlguard: hardened connection opening and column masking for SQL clients
//!
//! Two pieces sit between a SQL client and its database driver:
//!
//! * [`ConnectionResolver`] rewrites every DSN before the driver sees it.
//!   Usernames survive the DSN parser and IPv6 hosts are bracketed. `tls=custom`
//!   file parameters become a registered TLS config, and the driver's baseline
//!   parameters are forced.
//! * [`MaskingRowReader`] wraps a result cursor and replaces masked column
//!   values with their mask text on every scan.
//!
//! ```ignore
//! let registry = Arc::new(TlsRegistry::new());
//! let resolver = ConnectionResolver::new(registry, driver, ResolverConfig::default());
//! let open = resolver.open(&ConnectionUrl::parse("mysql://db.internal:3306")?)?;
//! let conn = open.call("mysql", "mysql://app_user:pw@db.internal:3306/shop?tls=custom&ssl-ca=/etc/ca.pem").await?;
//!
//! let policy = session.masking_policy()?;
//! let mut rows = MaskingRowReader::with_policy(conn.query("SELECT * FROM users")?, &policy)?;
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod connection;
pub mod error;
pub mod logging;
pub mod masking;
pub mod metrics;
pub mod session;
pub mod stream;

pub use client::{ConnectionUrl, Dsn, QueryParams, UsernameMapping};
pub use connection::{
    ConnectionResolver, Driver, DriverProfile, DsnEncoding, OpenFn, ResolvedDsn, ResolverConfig,
    TlsConfig, TlsNaming, TlsPolicy, TlsRegistry,
};
pub use error::{Error, Result};
pub use masking::{MaskingMethod, MaskingPolicy, MaskingRule};
pub use session::Session;
pub use stream::{ColumnType, MaskedRowStream, MaskingRowReader, MemoryCursor, ResultSet, RowCursor, Value};

//! Client-facing connection inputs
//!
//! * `ConnectionUrl`: the URL the caller already parsed
//! * `Dsn`: the driver DSN, split for rewriting

mod connection_string;
mod connection_url;

pub use connection_string::{Dsn, QueryParams, UsernameMapping};
pub use connection_url::ConnectionUrl;

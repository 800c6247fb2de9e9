//! Underlying database driver seam

use crate::{Error, Result};
use std::future::Future;

/// Static facts about a driver family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverProfile {
    /// Canonical driver name
    pub name: String,
    /// Other schemes served by the same driver
    pub aliases: Vec<String>,
    /// Parameters injected into every DSN, overriding user values
    pub forced_params: Vec<(String, String)>,
    /// Driver error code meaning "wrong credentials"
    pub password_error_code: Option<String>,
}

impl DriverProfile {
    /// Profile with no aliases, forced parameters or error classification
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            forced_params: Vec::new(),
            password_error_code: None,
        }
    }

    /// MySQL and the wire-compatible servers it also serves
    pub fn mysql() -> Self {
        Self {
            name: "mysql".into(),
            aliases: vec!["memsql".into(), "vitess".into(), "tidb".into()],
            forced_params: vec![
                ("parseTime".into(), "true".into()),
                ("loc".into(), "Local".into()),
            ],
            password_error_code: Some("1045".into()),
        }
    }

    /// Add an alias
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add a forced parameter
    pub fn force_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.forced_params.push((key.into(), value.into()));
        self
    }

    /// Set the password-failure error code
    pub fn password_error_code(mut self, code: impl Into<String>) -> Self {
        self.password_error_code = Some(code.into());
        self
    }

    /// Whether `scheme` names this driver or one of its aliases
    pub fn serves(&self, scheme: &str) -> bool {
        self.name.eq_ignore_ascii_case(scheme)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(scheme))
    }

    /// Whether `err` is this driver's authentication failure
    pub fn is_password_error(&self, err: &Error) -> bool {
        match (&self.password_error_code, err.driver_code()) {
            (Some(expected), Some(code)) => expected == code,
            _ => false,
        }
    }
}

/// The underlying driver's connect primitive.
///
/// Implementations receive the final, resolved DSN. When it carries `tls=<name>`,
/// they look `<name>` up in the same `TlsRegistry` the resolver writes to.
pub trait Driver: Send + Sync {
    /// Open connection handle
    type Connection;

    /// Driver profile
    fn profile(&self) -> &DriverProfile;

    /// Connect with a resolved DSN
    fn connect(&self, dsn: &str) -> impl Future<Output = Result<Self::Connection>> + Send;

    /// Whether `err` is an authentication failure
    fn is_password_error(&self, err: &Error) -> bool {
        self.profile().is_password_error(err)
    }
}

//! Error types

use std::io;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// DSN or connection URL could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// TLS material, policy, registry or rule configuration is invalid
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Underlying driver failure, passed through unchanged
    #[error("driver error: {message}")]
    Driver {
        /// Driver-specific error code (e.g. MySQL error number)
        code: Option<String>,
        /// Driver-provided message
        message: String,
        /// Original driver error, when one exists
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cursor scan failure or an unmaskable column value
    #[error("scan error: {0}")]
    Scan(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Driver failure without a code
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Driver failure carrying a driver-specific code
    pub fn driver_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            code: Some(code.into()),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary driver error, keeping it as the source
    pub fn driver_source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Driver {
            code: None,
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Driver code, if this is a driver error that carried one
    pub fn driver_code(&self) -> Option<&str> {
        match self {
            Self::Driver { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Short, stable category name (used as a metrics label)
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::Driver { .. } => "driver",
            Self::Scan(_) => "scan",
            Self::Io(_) => "io",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

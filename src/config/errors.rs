//! Configuration error types
//!
//! Error codes:
//! - CURIO_CONFIG_UNREADABLE (FATAL, configuration)
//! - CURIO_CONFIG_INVALID (FATAL, configuration)

use std::fmt;

use crate::error_kind::{ErrorKind, Severity};

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// File missing, unreadable, or not JSON
    CurioConfigUnreadable,
    /// Parsed but a value is out of range
    CurioConfigInvalid,
}

impl ConfigErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::CurioConfigUnreadable => "CURIO_CONFIG_UNREADABLE",
            ConfigErrorCode::CurioConfigInvalid => "CURIO_CONFIG_INVALID",
        }
    }

    /// Returns the error family
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Configuration error
#[derive(Debug, Clone)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
    details: Option<String>,
}

impl ConfigError {
    /// Configuration source could not be read or parsed
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::CurioConfigUnreadable,
            message: reason.into(),
            details: Some(format!("path: {}", path.into())),
        }
    }

    /// A configuration value is invalid
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::CurioConfigInvalid,
            message: reason.into(),
            details: Some(format!("field: {}", field)),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    /// Returns the error family
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

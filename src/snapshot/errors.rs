//! Snapshot error types
//!
//! Error codes:
//! - CURIO_LEVEL_TABLE_INVALID (FATAL, configuration)
//! - CURIO_SNAPSHOT_INTEGRITY (FATAL, configuration)
//! - CURIO_SNAPSHOT_ENCODING (FATAL, configuration)
//!
//! A snapshot either builds completely or not at all. None of these errors is
//! caused by a bad request; each one means the configuration cannot be
//! evaluated.

use std::fmt;

use crate::catalog::CatalogError;
use crate::error_kind::{ErrorKind, Severity};

/// Snapshot-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotErrorCode {
    /// Level thresholds are empty, unordered, or do not start at 0
    CurioLevelTableInvalid,
    /// Catalog lookup failed while composing a snapshot
    CurioSnapshotIntegrity,
    /// Snapshot could not be serialized for fingerprinting
    CurioSnapshotEncoding,
}

impl SnapshotErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotErrorCode::CurioLevelTableInvalid => "CURIO_LEVEL_TABLE_INVALID",
            SnapshotErrorCode::CurioSnapshotIntegrity => "CURIO_SNAPSHOT_INTEGRITY",
            SnapshotErrorCode::CurioSnapshotEncoding => "CURIO_SNAPSHOT_ENCODING",
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

impl fmt::Display for SnapshotErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Snapshot error with full context
#[derive(Debug)]
pub struct SnapshotError {
    code: SnapshotErrorCode,
    message: String,
    details: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SnapshotError {
    /// Create a level table error
    pub fn invalid_level_table(message: impl Into<String>) -> Self {
        Self {
            code: SnapshotErrorCode::CurioLevelTableInvalid,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Wrap a catalog failure encountered while building
    pub fn integrity(source: CatalogError) -> Self {
        Self {
            code: SnapshotErrorCode::CurioSnapshotIntegrity,
            message: format!("Catalog lookup failed: {}", source.message()),
            details: source.subject().map(|s| format!("subject: {}", s)),
            source: Some(Box::new(source)),
        }
    }

    /// Create an encoding error
    pub fn encoding(source: serde_json::Error) -> Self {
        Self {
            code: SnapshotErrorCode::CurioSnapshotEncoding,
            message: format!("Failed to encode snapshot: {}", source),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Add details to an error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SnapshotErrorCode {
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

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<CatalogError> for SnapshotError {
    fn from(err: CatalogError) -> Self {
        SnapshotError::integrity(err)
    }
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_snapshot_errors_fatal() {
        assert!(SnapshotError::invalid_level_table("empty").is_fatal());
        assert!(SnapshotError::integrity(CatalogError::unknown_course("web")).is_fatal());
    }

    #[test]
    fn test_integrity_keeps_subject() {
        let err: SnapshotError = CatalogError::unknown_lesson("css").into();
        assert_eq!(err.code(), SnapshotErrorCode::CurioSnapshotIntegrity);
        assert_eq!(err.details(), Some("subject: css"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

//! Engine error type
//!
//! Wraps the subsystem errors so callers of the facade handle one type. The
//! code, kind and severity of the wrapped error are preserved.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::error_kind::{ErrorKind, Severity};
use crate::ledger::LedgerError;
use crate::snapshot::SnapshotError;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine facade
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown catalog identifier or broken catalog
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// Event rejected at append, or unreadable event log
    #[error("{0}")]
    Ledger(#[from] LedgerError),

    /// Snapshot could not be computed
    #[error("{0}")]
    Snapshot(#[from] SnapshotError),

    /// Configuration file problem
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Returns the error family
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Catalog(e) => e.kind(),
            EngineError::Ledger(e) => e.kind(),
            EngineError::Snapshot(e) => e.kind(),
            EngineError::Config(e) => e.kind(),
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }

    /// Returns the string code of the wrapped error
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Catalog(e) => e.code().code(),
            EngineError::Ledger(e) => e.code().code(),
            EngineError::Snapshot(e) => e.code().code(),
            EngineError::Config(e) => e.code().code(),
        }
    }

    /// Returns the human-readable message of the wrapped error
    pub fn message(&self) -> &str {
        match self {
            EngineError::Catalog(e) => e.message(),
            EngineError::Ledger(e) => e.message(),
            EngineError::Snapshot(e) => e.message(),
            EngineError::Config(e) => e.message(),
        }
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

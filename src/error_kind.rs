//! Error taxonomy shared by every subsystem
//!
//! Each subsystem defines its own error codes. Every code maps onto exactly one
//! [`ErrorKind`] and one [`Severity`]:
//!
//! - `NotFound`: unknown catalog identifier (REJECT)
//! - `Validation`: event rejected at append (REJECT)
//! - `Configuration`: catalog or config cannot be evaluated (FATAL)
//!
//! REJECT errors abort the single operation and leave the ledger unchanged.
//! FATAL errors abort startup or snapshot computation and must be surfaced.

use std::fmt;

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation is rejected, the engine continues
    Reject,
    /// The engine cannot proceed with this configuration
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Error families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown catalog identifier
    NotFound,
    /// Event failed validation at append time
    Validation,
    /// Catalog or configuration is not evaluable
    Configuration,
}

impl ErrorKind {
    /// Returns the severity associated with this family
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::NotFound | ErrorKind::Validation => Severity::Reject,
            ErrorKind::Configuration => Severity::Fatal,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Configuration => write!(f, "configuration"),
        }
    }
}

//! Ledger error types
//!
//! Error codes:
//! - CURIO_UNKNOWN_SUBJECT (REJECT, validation)
//! - CURIO_OUT_OF_ORDER (REJECT, validation)
//! - CURIO_LESSON_LOCKED (REJECT, validation)
//! - CURIO_USER_MISMATCH (REJECT, validation)
//! - CURIO_EVENT_LOG_MALFORMED (FATAL, configuration)
//!
//! A rejected append leaves the ledger exactly as it was.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error_kind::{ErrorKind, Severity};

/// Ledger-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LedgerErrorCode {
    /// Event subject does not resolve against the catalog
    CurioUnknownSubject,
    /// Event timestamp is earlier than the user's latest event
    CurioOutOfOrder,
    /// Lesson completed before its predecessor
    CurioLessonLocked,
    /// Event recorded on behalf of a different user
    CurioUserMismatch,
    /// Event log line could not be parsed
    CurioEventLogMalformed,
}

impl LedgerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LedgerErrorCode::CurioUnknownSubject => "CURIO_UNKNOWN_SUBJECT",
            LedgerErrorCode::CurioOutOfOrder => "CURIO_OUT_OF_ORDER",
            LedgerErrorCode::CurioLessonLocked => "CURIO_LESSON_LOCKED",
            LedgerErrorCode::CurioUserMismatch => "CURIO_USER_MISMATCH",
            LedgerErrorCode::CurioEventLogMalformed => "CURIO_EVENT_LOG_MALFORMED",
        }
    }

    /// Returns the error family
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerErrorCode::CurioEventLogMalformed => ErrorKind::Configuration,
            _ => ErrorKind::Validation,
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }
}

impl fmt::Display for LedgerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Ledger error with full context
#[derive(Debug, Clone)]
pub struct LedgerError {
    code: LedgerErrorCode,
    message: String,
    details: Option<String>,
}

impl LedgerError {
    fn new(code: LedgerErrorCode, message: String, details: Option<String>) -> Self {
        Self {
            code,
            message,
            details,
        }
    }

    /// Subject id is neither a known lesson nor a known course for this kind
    pub fn unknown_subject(kind: &str, subject: &str) -> Self {
        Self::new(
            LedgerErrorCode::CurioUnknownSubject,
            format!("Subject '{}' does not resolve for {} event", subject, kind),
            None,
        )
    }

    /// Timestamp precedes the user's latest accepted event
    pub fn out_of_order(user: &str, timestamp: DateTime<Utc>, latest: DateTime<Utc>) -> Self {
        Self::new(
            LedgerErrorCode::CurioOutOfOrder,
            format!("Event for user '{}' is older than the latest recorded event", user),
            Some(format!(
                "timestamp: {}, latest: {}",
                timestamp.to_rfc3339(),
                latest.to_rfc3339()
            )),
        )
    }

    /// Lesson cannot be completed while its predecessor is incomplete
    pub fn lesson_locked(lesson: &str, predecessor: &str) -> Self {
        Self::new(
            LedgerErrorCode::CurioLessonLocked,
            format!("Lesson '{}' is locked", lesson),
            Some(format!("requires: {}", predecessor)),
        )
    }

    /// Event names a user other than the one recording it
    pub fn user_mismatch(expected: &str, actual: &str) -> Self {
        Self::new(
            LedgerErrorCode::CurioUserMismatch,
            format!(
                "Event belongs to user '{}' but was recorded for '{}'",
                actual, expected
            ),
            None,
        )
    }

    /// Event log line could not be read or parsed
    pub fn malformed_log(line: usize, reason: impl Into<String>) -> Self {
        Self::new(
            LedgerErrorCode::CurioEventLogMalformed,
            format!("Malformed event log: {}", reason.into()),
            Some(format!("line: {}", line)),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> LedgerErrorCode {
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

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for LedgerError {}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

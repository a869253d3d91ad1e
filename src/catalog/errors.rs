//! Catalog error types
//!
//! Error codes:
//! - CURIO_UNKNOWN_COURSE (REJECT, not found)
//! - CURIO_UNKNOWN_LESSON (REJECT, not found)
//! - CURIO_UNKNOWN_ACHIEVEMENT (REJECT, not found)
//! - CURIO_CATALOG_IMMUTABLE (FATAL, configuration)
//! - CURIO_CATALOG_MALFORMED (FATAL, configuration)
//! - CURIO_CATALOG_INVALID (FATAL, configuration)
//! - CURIO_RULE_CYCLE (FATAL, configuration)

use std::fmt;

use crate::error_kind::{ErrorKind, Severity};

/// Catalog-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorCode {
    /// Course id not in the catalog
    CurioUnknownCourse,
    /// Lesson id not in the catalog
    CurioUnknownLesson,
    /// Achievement id not in the catalog
    CurioUnknownAchievement,
    /// Attempt to register an id twice
    CurioCatalogImmutable,
    /// Catalog source could not be read or parsed
    CurioCatalogMalformed,
    /// Catalog parsed but violates an integrity rule
    CurioCatalogInvalid,
    /// Achievement prerequisites reference each other
    CurioRuleCycle,
}

impl CatalogErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogErrorCode::CurioUnknownCourse => "CURIO_UNKNOWN_COURSE",
            CatalogErrorCode::CurioUnknownLesson => "CURIO_UNKNOWN_LESSON",
            CatalogErrorCode::CurioUnknownAchievement => "CURIO_UNKNOWN_ACHIEVEMENT",
            CatalogErrorCode::CurioCatalogImmutable => "CURIO_CATALOG_IMMUTABLE",
            CatalogErrorCode::CurioCatalogMalformed => "CURIO_CATALOG_MALFORMED",
            CatalogErrorCode::CurioCatalogInvalid => "CURIO_CATALOG_INVALID",
            CatalogErrorCode::CurioRuleCycle => "CURIO_RULE_CYCLE",
        }
    }

    /// Returns the error family
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogErrorCode::CurioUnknownCourse
            | CatalogErrorCode::CurioUnknownLesson
            | CatalogErrorCode::CurioUnknownAchievement => ErrorKind::NotFound,
            _ => ErrorKind::Configuration,
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }
}

impl fmt::Display for CatalogErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Catalog error with full context
#[derive(Debug, Clone)]
pub struct CatalogError {
    code: CatalogErrorCode,
    message: String,
    /// Identifier the error is about, if any
    subject: Option<String>,
    /// Source location (file path) or other context
    details: Option<String>,
}

impl CatalogError {
    fn new(code: CatalogErrorCode, message: String, subject: Option<String>) -> Self {
        Self {
            code,
            message,
            subject,
            details: None,
        }
    }

    /// Create an unknown course error
    pub fn unknown_course(id: impl fmt::Display) -> Self {
        let id = id.to_string();
        Self::new(
            CatalogErrorCode::CurioUnknownCourse,
            format!("Course '{}' not found", id),
            Some(id),
        )
    }

    /// Create an unknown lesson error
    pub fn unknown_lesson(id: impl fmt::Display) -> Self {
        let id = id.to_string();
        Self::new(
            CatalogErrorCode::CurioUnknownLesson,
            format!("Lesson '{}' not found", id),
            Some(id),
        )
    }

    /// Create an unknown achievement error
    pub fn unknown_achievement(id: impl fmt::Display) -> Self {
        let id = id.to_string();
        Self::new(
            CatalogErrorCode::CurioUnknownAchievement,
            format!("Achievement '{}' not found", id),
            Some(id),
        )
    }

    /// Create an immutability violation (duplicate registration)
    pub fn immutable(kind: &str, id: impl fmt::Display) -> Self {
        let id = id.to_string();
        Self::new(
            CatalogErrorCode::CurioCatalogImmutable,
            format!("{} '{}' is already registered and immutable", kind, id),
            Some(id),
        )
    }

    /// Create an error for an unreadable or unparsable catalog source
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            code: CatalogErrorCode::CurioCatalogMalformed,
            message: format!("Malformed catalog source: {}", reason.into()),
            subject: None,
            details: Some(format!("path: {}", path)),
        }
    }

    /// Create an integrity violation
    pub fn invalid(subject: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::new(
            CatalogErrorCode::CurioCatalogInvalid,
            reason.into(),
            Some(subject.to_string()),
        )
    }

    /// Create a prerequisite cycle error listing the achievements involved
    pub fn rule_cycle(members: &[String]) -> Self {
        Self {
            code: CatalogErrorCode::CurioRuleCycle,
            message: "Achievement prerequisites form a cycle".into(),
            subject: members.first().cloned(),
            details: Some(format!("cycle: {}", members.join(" -> "))),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> CatalogErrorCode {
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

    /// Returns the identifier the error refers to, if any
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
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

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for CatalogError {}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

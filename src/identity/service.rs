//! Password-update collaborator
//!
//! The dashboard's password form talks to an external identity provider
//! through this trait. Nothing in the progress engine depends on it.

use std::sync::RwLock;

use super::errors::{IdentityError, IdentityResult};

/// Identity provider abstraction
pub trait IdentityService: Send + Sync {
    /// Replaces the signed-in user's password.
    fn update_password(&self, new_password: &str) -> IdentityResult<()>;
}

/// In-memory identity service for tests and demos
#[derive(Debug, Default)]
pub struct MockIdentityService {
    /// Passwords accepted so far
    pub updates: RwLock<Vec<String>>,
    /// When set, every update fails with this message
    pub failure: Option<String>,
}

impl MockIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service that rejects every update.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            updates: RwLock::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Number of accepted updates
    pub fn update_count(&self) -> usize {
        self.updates.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl IdentityService for MockIdentityService {
    fn update_password(&self, new_password: &str) -> IdentityResult<()> {
        if let Some(message) = &self.failure {
            return Err(IdentityError::service(message.clone()));
        }
        self.updates
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(new_password.to_string());
        Ok(())
    }
}

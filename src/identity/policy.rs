//! Password requirements

use serde::{Deserialize, Serialize};

use super::errors::{IdentityError, IdentityResult};

/// Password requirements configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_number: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: false,
            require_lowercase: false,
            require_number: false,
            require_special: false,
        }
    }
}

impl PasswordPolicy {
    /// Checks a candidate password, reporting the first unmet requirement.
    pub fn validate(&self, password: &str) -> IdentityResult<()> {
        // Length counts characters, not bytes
        if password.chars().count() < self.min_length {
            return Err(IdentityError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        let checks: [(bool, fn(char) -> bool, &str); 4] = [
            (self.require_uppercase, char::is_uppercase, "one uppercase letter"),
            (self.require_lowercase, char::is_lowercase, "one lowercase letter"),
            (self.require_number, char::is_numeric, "one number"),
            (self.require_special, |c: char| !c.is_alphanumeric(), "one special character"),
        ];
        for (required, matches, what) in checks {
            if required && !password.chars().any(matches) {
                return Err(IdentityError::WeakPassword(format!(
                    "Password must contain at least {}",
                    what
                )));
            }
        }

        Ok(())
    }
}

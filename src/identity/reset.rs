//! Password reset request
//!
//! Validates the form input locally before anything is sent to the identity
//! service: both fields must match and satisfy the policy.

use serde::Deserialize;

use super::errors::{IdentityError, IdentityResult};
use super::policy::PasswordPolicy;
use super::service::IdentityService;

/// Password reset form input
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetRequest {
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordResetRequest {
    pub fn new(new_password: impl Into<String>, confirm_password: impl Into<String>) -> Self {
        Self {
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}

/// Validates reset requests and forwards them to an identity service
pub struct PasswordReset<'a> {
    service: &'a dyn IdentityService,
    policy: PasswordPolicy,
}

impl<'a> PasswordReset<'a> {
    pub fn new(service: &'a dyn IdentityService, policy: PasswordPolicy) -> Self {
        Self { service, policy }
    }

    /// Checks the request without contacting the service.
    pub fn validate(&self, request: &PasswordResetRequest) -> IdentityResult<()> {
        if request.new_password != request.confirm_password {
            return Err(IdentityError::PasswordMismatch);
        }
        self.policy.validate(&request.new_password)
    }

    /// Validates the request, then asks the service to apply it.
    pub fn submit(&self, request: &PasswordResetRequest) -> IdentityResult<()> {
        self.validate(request)?;
        self.service.update_password(&request.new_password)
    }
}

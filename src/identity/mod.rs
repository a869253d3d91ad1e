//! Identity collaborator for curio
//!
//! Password reset validation in front of an external identity service. The
//! progress engine never calls into this module.

mod errors;
mod policy;
mod reset;
mod service;

pub use errors::{IdentityError, IdentityResult};
pub use policy::PasswordPolicy;
pub use reset::{PasswordReset, PasswordResetRequest};
pub use service::{IdentityService, MockIdentityService};

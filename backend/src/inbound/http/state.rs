//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see the signup port, so
//! they can be exercised against in-memory adapters or mocks.

use std::sync::Arc;

use crate::domain::PasswordPolicy;
use crate::domain::ports::SignupCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub signup: Arc<dyn SignupCommand>,
    /// Policy quoted by the form hint; the command enforces its own copy.
    pub password_policy: PasswordPolicy,
}

impl HttpState {
    pub fn new(signup: Arc<dyn SignupCommand>, password_policy: PasswordPolicy) -> Self {
        Self {
            signup,
            password_policy,
        }
    }
}

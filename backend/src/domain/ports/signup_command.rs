//! Driving port for the account signup use-case.
//!
//! Inbound adapters call this port with the raw submission and never see the
//! repository or hasher behind it, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{SignupError, SignupReceipt, SignupRequest};

/// Domain use-case port for creating an account and its owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupCommand: Send + Sync {
    /// Validate and persist a signup submission.
    async fn sign_up(&self, request: SignupRequest) -> Result<SignupReceipt, SignupError>;
}

//! Port abstraction for account persistence adapters and their errors.
//!
//! Adapters must treat subdomains and emails case-insensitively and must
//! write the owner and the account atomically: either both rows exist after
//! [`AccountRepository::create_with_owner`] returns `Ok`, or neither does.

use async_trait::async_trait;

use crate::domain::{Account, EmailAddress, Registration, Subdomain};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// Another account already owns the subdomain.
        SubdomainTaken { subdomain: String } => "subdomain {subdomain} is already taken",
        /// Another user already registered the email.
        EmailTaken { email: String } => "email {email} is already taken",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Return true when an account already uses `subdomain`.
    async fn subdomain_taken(&self, subdomain: &Subdomain) -> Result<bool, AccountPersistenceError>;

    /// Return true when a user already registered `email`.
    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, AccountPersistenceError>;

    /// Persist the owner, then the account, in one atomic unit.
    async fn create_with_owner(
        &self,
        registration: &Registration,
    ) -> Result<(), AccountPersistenceError>;

    /// Fetch an account by its subdomain.
    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Account>, AccountPersistenceError>;
}

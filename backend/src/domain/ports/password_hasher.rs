//! Port for one-way password hashing.

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing a password.
    pub enum PasswordHashError {
        /// The hashing backend rejected its inputs or parameters.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Turns a plaintext password into a storable hash.
///
/// Implementations are synchronous and CPU-bound.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;
}

/// Deterministic, insecure hasher for tests and local fixtures.
///
/// The output only records the password length, never its content.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("$fixture${}", password.char_len())))
    }
}

//! Domain primitives, aggregates and the signup use-case.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, and keep every validation rule for a new account in one place.
//!
//! Public surface:
//! - [`Account`] and [`Subdomain`]: the tenant and its normalized identifier.
//! - [`User`], [`UserName`], [`EmailAddress`], [`Password`]: the owner.
//! - [`SignupRequest`] / [`SignupService`]: validate-and-persist workflow.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.

pub mod account;
pub mod error;
pub mod ports;
pub mod signup;
pub mod signup_service;
pub mod trace_id;
pub mod user;

pub use self::account::{Account, AccountId, RESTRICTED_SUBDOMAINS, Subdomain, SubdomainError};
pub use self::error::{Error, ErrorCode};
pub use self::signup::{
    Field, FieldError, OwnerInput, PasswordPolicy, Registration, SignupRequest,
    ValidatedOwner, ValidatedSignup, ValidationErrors,
};
pub use self::signup_service::{SIGNUP_NOTICE, SignupError, SignupReceipt, SignupService};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, Password, PasswordHash, User, UserId, UserName, UserValidationError,
};

/// HTTP header name used to expose trace identifiers to clients.
pub const TRACE_ID_HEADER: &str = "trace-id";

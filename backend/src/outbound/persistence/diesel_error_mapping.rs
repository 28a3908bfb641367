//! Maps pool and Diesel failures onto [`AccountPersistenceError`].
//!
//! Unique violations are attributed by index name: Postgres reports the
//! index as the constraint, and the message names it as a fallback.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use crate::domain::ports::AccountPersistenceError;

use super::pool::PoolError;

pub(crate) const SUBDOMAIN_UNIQUE_INDEX: &str = "accounts_subdomain_lower_idx";
pub(crate) const EMAIL_UNIQUE_INDEX: &str = "users_email_lower_idx";

/// Values being written, used to label uniqueness conflicts.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WriteContext<'a> {
    pub subdomain: Option<&'a str>,
    pub email: Option<&'a str>,
}

pub(crate) fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    AccountPersistenceError::connection(error.into_message())
}

/// Map a Diesel error raised by a read.
pub(crate) fn map_diesel_error(error: DieselError) -> AccountPersistenceError {
    map_write_error(error, WriteContext::default())
}

/// Map a Diesel error raised while inserting the owner and account.
pub(crate) fn map_write_error(error: DieselError, context: WriteContext<'_>) -> AccountPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), constraint = ?info.constraint_name(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or_default();
            let message = info.message();
            if constraint == SUBDOMAIN_UNIQUE_INDEX || message.contains(SUBDOMAIN_UNIQUE_INDEX) {
                AccountPersistenceError::subdomain_taken(context.subdomain.unwrap_or_default())
            } else if constraint == EMAIL_UNIQUE_INDEX || message.contains(EMAIL_UNIQUE_INDEX) {
                AccountPersistenceError::email_taken(context.email.unwrap_or_default())
            } else {
                warn!(constraint, "unrecognised unique violation");
                AccountPersistenceError::query("unique constraint violated")
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountPersistenceError::connection("database connection closed")
        }
        DieselError::NotFound => AccountPersistenceError::query("record not found"),
        DieselError::DatabaseError(_, _) => AccountPersistenceError::query("database error"),
        _ => AccountPersistenceError::query("database query error"),
    }
}

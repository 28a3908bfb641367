//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories only translate between Diesel rows and domain types. Row
//! structs and the schema stay private to this module, pooling goes through
//! `diesel-async` and `bb8`, and every database failure is mapped onto the
//! port's error enum.
//!
//! # Example
//!
//! ```ignore
//! use timetracker::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/timetracker")).await?;
//! let repository = DieselAccountRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use migrations::{MIGRATIONS, MigrationError, migrate, run_pending_migrations};
pub use pool::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};

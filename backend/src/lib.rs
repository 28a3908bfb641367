//! Time Tracker backend: account signup for a multi-tenant web application.
//!
//! The crate follows a ports-and-adapters layout. [`domain`] owns the entities,
//! validation rules and the signup service; [`inbound`] translates HTTP
//! requests into domain calls; [`outbound`] implements the persistence and
//! password hashing ports.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;

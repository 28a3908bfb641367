//! HTTP inbound adapter serving the server-rendered signup pages.

pub mod accounts;
pub mod error;
pub mod flash;
pub mod health;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;
pub mod welcome;

pub use error::ApiResult;

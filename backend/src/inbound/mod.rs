//! Inbound adapters that translate external requests into domain calls.
//!
//! Only HTTP exists today; framework details stay inside [`http`].

pub mod http;

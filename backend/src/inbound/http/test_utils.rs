//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::FixturePasswordHasher;
use crate::domain::{PasswordPolicy, SignupService};
use crate::outbound::memory::InMemoryAccountRepository;

use super::state::HttpState;

pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// HTTP state over a real signup service backed by the in-memory store.
pub fn in_memory_state(policy: PasswordPolicy) -> (Arc<InMemoryAccountRepository>, HttpState) {
    let store = Arc::new(InMemoryAccountRepository::default());
    let service = SignupService::new(store.clone(), Arc::new(FixturePasswordHasher), policy);
    (store, HttpState::new(Arc::new(service), policy))
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::SessionStoreSettings;
use crate::domain::ports::FixtureAccountRegistry;
use crate::inbound::http::state::HttpState;
use crate::outbound::storage::InMemoryKeyValueStore;

/// Name of the session cookie used across HTTP tests.
pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// plain HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// State over the fixture accounts, an empty in-memory student list and no
/// simulated latency.
pub fn test_state() -> HttpState {
    HttpState::new(
        Arc::new(FixtureAccountRegistry),
        Arc::new(InMemoryKeyValueStore::new()),
        SessionStoreSettings::immediate(),
    )
}

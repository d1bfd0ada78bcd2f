//! Cookie-backed key-value store for one browser.
//!
//! [`SessionContext`] wraps the Actix session so the domain sees the encrypted
//! session cookie as an ordinary [`KeyValueStore`]: the persisted session
//! record lives under [`SESSION_USER_KEY`](crate::domain::ports::SESSION_USER_KEY)
//! exactly as it would in browser local storage.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Newtype over the Actix session exposing whole-value string storage.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Rotate the session identifier, e.g. after signing in.
    pub fn renew(&self) {
        self.0.renew();
    }

    /// Drop every key and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl KeyValueStore for SessionContext {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        self.0
            .get::<String>(key)
            .map_err(|error| KeyValueStoreError::read(key, error.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.0
            .insert(key, value)
            .map_err(|error| KeyValueStoreError::write(key, error.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.0.remove(key);
        Ok(())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

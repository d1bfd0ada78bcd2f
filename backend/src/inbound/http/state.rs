//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`. It carries the
//! collaborators every per-request [`SessionStore`] is built from; the
//! session record itself lives in the caller's cookie.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::ports::{AccountRegistry, KeyValueStore, SharedKeyValueStore};
use crate::domain::{SessionStore, SessionStoreError, SessionStorePorts, SessionStoreSettings};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Fixed accounts eligible to log in.
    pub accounts: Arc<dyn AccountRegistry>,
    /// Registered-student list shared by every client.
    pub students: SharedKeyValueStore,
    /// Latency and role policy applied to each session store.
    pub settings: SessionStoreSettings,
    registration_lock: Arc<Mutex<()>>,
}

impl HttpState {
    /// Construct state from its ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use hannah_backend::domain::SessionStoreSettings;
    /// use hannah_backend::domain::ports::FixtureAccountRegistry;
    /// use hannah_backend::inbound::http::state::HttpState;
    /// use hannah_backend::outbound::storage::InMemoryKeyValueStore;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureAccountRegistry),
    ///     Arc::new(InMemoryKeyValueStore::new()),
    ///     SessionStoreSettings::default(),
    /// );
    /// assert_eq!(state.settings, SessionStoreSettings::default());
    /// ```
    pub fn new(
        accounts: Arc<dyn AccountRegistry>,
        students: SharedKeyValueStore,
        settings: SessionStoreSettings,
    ) -> Self {
        Self {
            accounts,
            students,
            settings,
            registration_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build a session store over one client's `session` storage and restore
    /// its persisted user.
    pub fn session_store<S: KeyValueStore>(
        &self,
        session: S,
    ) -> Result<SessionStore<S>, SessionStoreError> {
        SessionStore::restored(
            SessionStorePorts {
                session,
                students: Arc::clone(&self.students),
                accounts: Arc::clone(&self.accounts),
            },
            self.settings,
        )
    }

    /// Serialise read-modify-write cycles on the shared student list.
    pub async fn lock_registrations(&self) -> MutexGuard<'_, ()> {
        self.registration_lock.lock().await
    }
}

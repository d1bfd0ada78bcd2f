//! Port for the string key-value storage that persists session state.
//!
//! The shape mirrors browser local storage: synchronous, whole-value reads
//! and writes of serialised text. Adapters include the per-client session
//! cookie, an in-memory map and a directory of JSON files.

use std::sync::Arc;

use super::define_port_error;

/// Key holding the serialised active session user.
pub const SESSION_USER_KEY: &str = "hannah_user";

/// Key holding the serialised list of self-registered students.
pub const REGISTERED_STUDENTS_KEY: &str = "hannah_registered_students";

define_port_error! {
    /// Failures raised by key-value store adapters.
    pub enum KeyValueStoreError {
        /// The backing store could not be reached at all.
        Unavailable { message: String } => "key-value store unavailable: {message}",
        /// Reading a key failed.
        Read { key: String, message: String } => "failed to read {key}: {message}",
        /// Writing or removing a key failed.
        Write { key: String, message: String } => "failed to write {key}: {message}",
        /// The key contains characters the adapter cannot address.
        InvalidKey { key: String } => "invalid storage key: {key}",
    }
}

/// Whole-value string storage keyed by name.
pub trait KeyValueStore {
    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Delete `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}

/// Thread-safe store shared between requests.
pub type SharedKeyValueStore = Arc<dyn KeyValueStore + Send + Sync>;

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        (**self).remove(key)
    }
}

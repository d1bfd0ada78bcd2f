//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_registry;
mod key_value_store;

#[cfg(test)]
pub use account_registry::MockAccountRegistry;
pub use account_registry::{
    AccountRegistry, AccountRegistryError, FIXTURE_PASSWORD, FixtureAccountRegistry,
};
pub use key_value_store::{
    KeyValueStore, KeyValueStoreError, REGISTERED_STUDENTS_KEY, SESSION_USER_KEY,
    SharedKeyValueStore,
};

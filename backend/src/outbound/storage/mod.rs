//! Key-value store adapters.

mod file;
mod memory;

pub use file::JsonFileKeyValueStore;
pub use memory::InMemoryKeyValueStore;

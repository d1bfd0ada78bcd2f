//! Outbound adapters implementing domain ports for infrastructure.
//!
//! - **storage**: key-value stores backing session state and the
//!   registered-student list (in-memory map or a directory of JSON files).
//!
//! Adapters are thin translators between the port contract and the backing
//! medium. They contain no business logic.

pub mod storage;

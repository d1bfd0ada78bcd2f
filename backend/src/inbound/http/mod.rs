//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod shell;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

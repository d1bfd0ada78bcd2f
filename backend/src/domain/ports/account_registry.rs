//! Port for the registry of fixed, pre-provisioned dashboard accounts.
//!
//! The registry answers two questions during login: does an account exist
//! for this email, and does the supplied password match. The fixture below is
//! the mock identity provider the dashboard ships with.

use async_trait::async_trait;

use crate::domain::{Role, User};

use super::define_port_error;

/// Password shared by every fixture account.
pub const FIXTURE_PASSWORD: &str = "123456";

define_port_error! {
    /// Failures raised by account registry adapters.
    pub enum AccountRegistryError {
        /// The registry could not be queried.
        Unavailable { message: String } => "account registry unavailable: {message}",
        /// A stored account record failed validation.
        InvalidRecord { message: String } => "invalid account record: {message}",
    }
}

/// Lookup of accounts eligible to log in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistry: Send + Sync {
    /// Find the account whose email equals `email` exactly.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountRegistryError>;

    /// Check `password` against the credential held for `account`.
    async fn verify_password(
        &self,
        account: &User,
        password: &str,
    ) -> Result<bool, AccountRegistryError>;
}

/// The three demo accounts, all sharing [`FIXTURE_PASSWORD`].
///
/// | email               | role    |
/// |---------------------|---------|
/// | `admin@hannah.ai`   | admin   |
/// | `faculty@hannah.ai` | faculty |
/// | `student@hannah.ai` | student |
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountRegistry;

const FIXTURE_ACCOUNTS: [(&str, &str, &str, Role); 3] = [
    ("admin-001", "System Administrator", "admin@hannah.ai", Role::Admin),
    ("faculty-001", "Dr. Sarah Chen", "faculty@hannah.ai", Role::Faculty),
    ("student-001", "Alex Johnson", "student@hannah.ai", Role::Student),
];

impl FixtureAccountRegistry {
    /// Materialise every fixture account.
    pub fn accounts() -> Result<Vec<User>, AccountRegistryError> {
        FIXTURE_ACCOUNTS
            .iter()
            .map(|(id, name, email, role)| {
                User::try_from_strings(*id, name, email, *role)
                    .map_err(|err| AccountRegistryError::invalid_record(err.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl AccountRegistry for FixtureAccountRegistry {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountRegistryError> {
        Ok(Self::accounts()?
            .into_iter()
            .find(|account| account.email().as_ref() == email))
    }

    async fn verify_password(
        &self,
        _account: &User,
        password: &str,
    ) -> Result<bool, AccountRegistryError> {
        Ok(password == FIXTURE_PASSWORD)
    }
}

//! Dashboard roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role of an account; selects the shell and navigation menu.
///
/// Serialised in lowercase (`"admin"`, `"faculty"`, `"student"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Teaching staff.
    Faculty,
    /// Enrolled student.
    Student,
}

impl Role {
    /// Every role, in menu order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Faculty, Self::Student];

    /// Legacy substring rule mapping an email address to a role.
    ///
    /// `admin` wins over `student`; anything else is faculty. Only consulted
    /// under [`RolePolicy::DeriveFromEmail`](crate::domain::RolePolicy).
    ///
    /// # Examples
    /// ```
    /// use hannah_backend::domain::Role;
    ///
    /// assert_eq!(Role::from_email("admin@hannah.ai"), Role::Admin);
    /// assert_eq!(Role::from_email("student@hannah.ai"), Role::Student);
    /// assert_eq!(Role::from_email("ada@hannah.ai"), Role::Faculty);
    /// ```
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        let lowered = email.to_ascii_lowercase();
        if lowered.contains("admin") {
            Self::Admin
        } else if lowered.contains("student") {
            Self::Student
        } else {
            Self::Faculty
        }
    }

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Faculty => "faculty",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing a role name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

//! Top-level view selection for the dashboard.
//!
//! A pure decision table: while the session is being restored a loading
//! indicator is shown, without a session the entry screen, otherwise the
//! shell matching the user's role.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Role, User};

/// Role of a user mounted in the staff shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Administrator views.
    Admin,
    /// Faculty views.
    Faculty,
}

impl From<StaffRole> for Role {
    fn from(value: StaffRole) -> Self {
        match value {
            StaffRole::Admin => Self::Admin,
            StaffRole::Faculty => Self::Faculty,
        }
    }
}

/// Screen to mount at the root of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ShellView {
    /// Session restoration is still in flight.
    Loading,
    /// No session: login, registration and password reset.
    Entry,
    /// Student shell.
    Student,
    /// Shared admin/faculty shell, fanning out by role.
    Staff {
        /// Role the staff shell renders for.
        role: StaffRole,
    },
}

impl ShellView {
    /// Role whose menu the view shows, if it is an authenticated shell.
    #[must_use]
    pub fn role(self) -> Option<Role> {
        match self {
            Self::Loading | Self::Entry => None,
            Self::Student => Some(Role::Student),
            Self::Staff { role } => Some(role.into()),
        }
    }
}

/// Choose the root view.
///
/// # Examples
/// ```
/// use hannah_backend::domain::{resolve_shell, ShellView};
///
/// assert_eq!(resolve_shell(true, None), ShellView::Loading);
/// assert_eq!(resolve_shell(false, None), ShellView::Entry);
/// ```
#[must_use]
pub fn resolve_shell(loading: bool, user: Option<&User>) -> ShellView {
    if loading {
        return ShellView::Loading;
    }
    match user.map(User::role) {
        None => ShellView::Entry,
        Some(Role::Student) => ShellView::Student,
        Some(Role::Admin) => ShellView::Staff {
            role: StaffRole::Admin,
        },
        Some(Role::Faculty) => ShellView::Staff {
            role: StaffRole::Faculty,
        },
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn user(role: Role) -> User {
        User::try_from_strings("u-1", "Test User", "test@hannah.ai", role).expect("valid user")
    }

    #[rstest]
    #[case(Role::Admin, ShellView::Staff { role: StaffRole::Admin })]
    #[case(Role::Faculty, ShellView::Staff { role: StaffRole::Faculty })]
    #[case(Role::Student, ShellView::Student)]
    fn authenticated_users_get_their_shell(#[case] role: Role, #[case] expected: ShellView) {
        let user = user(role);
        let view = resolve_shell(false, Some(&user));
        assert_eq!(view, expected);
        assert_eq!(view.role(), Some(role));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Role::Admin))]
    fn loading_wins_over_any_user(#[case] role: Option<Role>) {
        let user = role.map(user);
        assert_eq!(resolve_shell(true, user.as_ref()), ShellView::Loading);
    }

    #[test]
    fn no_session_shows_entry_screen() {
        let view = resolve_shell(false, None);
        assert_eq!(view, ShellView::Entry);
        assert_eq!(view.role(), None);
    }

    #[test]
    fn serialises_with_view_tag() {
        let value = serde_json::to_value(ShellView::Staff {
            role: StaffRole::Faculty,
        })
        .expect("serialise view");
        assert_eq!(value, json!({ "view": "staff", "role": "faculty" }));
    }
}

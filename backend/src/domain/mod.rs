//! Domain primitives and the session model.
//!
//! Purpose: Define strongly typed entities for dashboard users, the session
//! store that tracks who is signed in, and the role-scoped navigation shown
//! once they are. Types stay transport agnostic; adapters live under
//! `inbound` and `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): account identity, email and role.
//! - SessionStore (alias to `session_store::SessionStore`): login,
//!   registration, password reset and logout against injected ports.
//! - NavigationState (alias to `navigation::NavigationState`): active
//!   section and mobile overlay for one shell.

pub mod auth;
pub mod error;
pub mod navigation;
pub mod ports;
pub mod role;
pub mod session_store;
pub mod shell;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, MIN_PASSWORD_LENGTH, RegistrationRejection,
    StudentRegistration,
};
pub use self::error::{Error, ErrorCode};
pub use self::navigation::{
    NavigationState, RoleMenu, Section, SectionDescriptor, UnknownSection, Viewport,
};
pub use self::role::{Role, UnknownRole};
pub use self::session_store::{
    DEFAULT_SIMULATED_LATENCY, ENTRY_POINT, LoginOutcome, Redirect, RegistrationOutcome,
    RolePolicy, SessionStore, SessionStoreError, SessionStorePorts, SessionStoreSettings,
    UnknownRolePolicy,
};
pub use self::shell::{ShellView, StaffRole, resolve_shell};
pub use self::trace_id::TraceId;
pub use self::user::{DisplayName, EmailAddress, User, UserId, UserValidationError};

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

//! Session store: who is logged in, and the mocked account operations.
//!
//! A [`SessionStore`] is an explicitly constructed context object. It owns a
//! key-value store for the active session record (one per client), shares a
//! second store holding the registered-student list, and consults an
//! [`AccountRegistry`] for credentials. Every account operation first awaits
//! the configured simulated latency.
//!
//! Mutating operations borrow the store mutably, so two logins or
//! registrations can never be in flight on the same store at once.
//!
//! Validation outcomes (unknown email, wrong password, duplicate email, a
//! corrupt session record) are values, not errors. [`SessionStoreError`] is
//! reserved for adapter faults and for a registered-student list that can no
//! longer be read, which is never overwritten.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountRegistry, AccountRegistryError, KeyValueStore, KeyValueStoreError,
    REGISTERED_STUDENTS_KEY, SESSION_USER_KEY, SharedKeyValueStore,
};
use crate::domain::{
    Error, LoginCredentials, RegistrationRejection, Role, ShellView,
    StudentRegistration, User, UserId, resolve_shell,
};

/// Path of the unauthenticated entry screen.
pub const ENTRY_POINT: &str = "/";

/// Default artificial delay applied to account operations.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(800);

/// How the session role is chosen at login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RolePolicy {
    /// Use the role stored with the account.
    #[default]
    Stored,
    /// Recompute the role from the email on every login.
    ///
    /// Kept for parity with the first dashboard release. A user's permissions
    /// change silently if their email matches a different rule, so every
    /// divergence from the stored role is logged.
    DeriveFromEmail,
}

/// Raised when parsing an unrecognised role policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role policy: {0}")]
pub struct UnknownRolePolicy(pub String);

impl FromStr for RolePolicy {
    type Err = UnknownRolePolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stored" => Ok(Self::Stored),
            "email" | "derive_from_email" => Ok(Self::DeriveFromEmail),
            _ => Err(UnknownRolePolicy(s.to_owned())),
        }
    }
}

/// Tunables for [`SessionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStoreSettings {
    /// Delay awaited before each account operation resolves.
    pub simulated_latency: Duration,
    /// How the session role is chosen at login.
    pub role_policy: RolePolicy,
}

impl Default for SessionStoreSettings {
    fn default() -> Self {
        Self {
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
            role_policy: RolePolicy::Stored,
        }
    }
}

impl SessionStoreSettings {
    /// Settings without artificial delay, for tests and tooling.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            simulated_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Adapter faults surfaced by the session store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    /// A key-value store failed.
    #[error(transparent)]
    Storage(#[from] KeyValueStoreError),
    /// The account registry failed.
    #[error(transparent)]
    Accounts(#[from] AccountRegistryError),
    /// The stored registered-student list could not be parsed. It is left
    /// as found; nothing is written over it.
    #[error("registered-student list is unreadable: {message}")]
    CorruptStudentList {
        /// Parser message.
        message: String,
    },
    /// Session state could not be serialised.
    #[error("failed to encode session state: {message}")]
    Encode {
        /// Serialiser message.
        message: String,
    },
}

impl From<SessionStoreError> for Error {
    fn from(value: SessionStoreError) -> Self {
        Self::internal(value.to_string())
    }
}

/// Parameter object bundling the store's collaborators.
pub struct SessionStorePorts<S> {
    /// Store holding this client's session record.
    pub session: S,
    /// Store holding the shared registered-student list.
    pub students: SharedKeyValueStore,
    /// Registry of fixed accounts.
    pub accounts: Arc<dyn AccountRegistry>,
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched; the user is now the active session.
    Authenticated(User),
    /// Unknown email or wrong password; the session is unchanged.
    Rejected,
}

impl LoginOutcome {
    /// Whether the login succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Result of a student self-registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The student was created and is now the active session.
    Registered(User),
    /// The form was rejected; nothing was stored.
    Rejected(RegistrationRejection),
}

impl RegistrationOutcome {
    /// Whether the registration succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}

/// Navigation the caller must perform after logging out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    /// Target path.
    pub location: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPhase {
    Restoring,
    Ready,
}

/// Single source of truth for the authenticated user of one client.
pub struct SessionStore<S> {
    session: S,
    students: SharedKeyValueStore,
    accounts: Arc<dyn AccountRegistry>,
    settings: SessionStoreSettings,
    current: Option<User>,
    phase: SessionPhase,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Build a store that has not yet restored its persisted session.
    ///
    /// Until [`SessionStore::restore`] runs, [`SessionStore::is_loading`]
    /// reports `true`.
    #[must_use]
    pub fn new(ports: SessionStorePorts<S>, settings: SessionStoreSettings) -> Self {
        let SessionStorePorts {
            session,
            students,
            accounts,
        } = ports;
        Self {
            session,
            students,
            accounts,
            settings,
            current: None,
            phase: SessionPhase::Restoring,
        }
    }

    /// Build a store and restore its persisted session in one step.
    pub fn restored(
        ports: SessionStorePorts<S>,
        settings: SessionStoreSettings,
    ) -> Result<Self, SessionStoreError> {
        let mut store = Self::new(ports, settings);
        store.restore()?;
        Ok(store)
    }

    /// Load the persisted session record.
    ///
    /// A record that fails to parse is removed and treated as no session.
    /// A restored user is trusted without re-checking credentials.
    pub fn restore(&mut self) -> Result<Option<&User>, SessionStoreError> {
        let restored = match self.session.get(SESSION_USER_KEY)? {
            None => None,
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(error) => {
                    warn!(%error, "discarding corrupt persisted session");
                    self.session.remove(SESSION_USER_KEY)?;
                    None
                }
            },
        };
        self.current = restored;
        self.phase = SessionPhase::Ready;
        Ok(self.current.as_ref())
    }

    /// Authenticate against the account registry.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the
    /// caller; both leave any existing session untouched.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, SessionStoreError> {
        self.simulate_latency().await;

        let Ok(credentials) = LoginCredentials::try_from_parts(email, password) else {
            debug!("login rejected: blank credentials");
            return Ok(LoginOutcome::Rejected);
        };

        let Some(account) = self.accounts.find_by_email(credentials.email()).await? else {
            info!("login rejected");
            return Ok(LoginOutcome::Rejected);
        };
        if !self
            .accounts
            .verify_password(&account, credentials.password())
            .await?
        {
            info!("login rejected");
            return Ok(LoginOutcome::Rejected);
        }

        let role = self.session_role(&account);
        let user = account.with_role(role);
        self.start_session(user.clone())?;
        info!(user_id = %user.id(), role = %user.role(), "login succeeded");
        Ok(LoginOutcome::Authenticated(user))
    }

    /// Create a student account and sign it in.
    pub async fn register_student(
        &mut self,
        registration: &StudentRegistration,
    ) -> Result<RegistrationOutcome, SessionStoreError> {
        self.simulate_latency().await;

        let validated = match registration.validate() {
            Ok(validated) => validated,
            Err(rejection) => {
                debug!(%rejection, "registration rejected");
                return Ok(RegistrationOutcome::Rejected(rejection));
            }
        };

        let mut students = self.load_students()?;
        let taken = students.iter().any(|s| s.email() == &validated.email)
            || self
                .accounts
                .find_by_email(validated.email.as_ref())
                .await?
                .is_some();
        if taken {
            info!("registration rejected: email already registered");
            return Ok(RegistrationOutcome::Rejected(
                RegistrationRejection::DuplicateEmail,
            ));
        }

        let user = User::new(UserId::random(), validated.name, validated.email, Role::Student);
        students.push(user.clone());
        let encoded = encode(&students)?;
        self.students.set(REGISTERED_STUDENTS_KEY, &encoded)?;
        self.start_session(user.clone())?;
        info!(user_id = %user.id(), "student registered");
        Ok(RegistrationOutcome::Registered(user))
    }

    /// Check whether a reset link could be sent to `email`.
    ///
    /// Nothing is reset and nothing is sent; the request is only logged.
    pub async fn request_password_reset(&self, email: &str) -> Result<bool, SessionStoreError> {
        self.simulate_latency().await;

        let known = self.accounts.find_by_email(email).await?.is_some()
            || self
                .load_students()?
                .iter()
                .any(|student| student.email().as_ref() == email);
        info!(accepted = known, "password reset requested");
        Ok(known)
    }

    /// End the session and point the caller back at the entry screen.
    pub fn logout(&mut self) -> Result<Redirect, SessionStoreError> {
        if let Some(user) = self.current.take() {
            info!(user_id = %user.id(), "logout");
        }
        self.session.remove(SESSION_USER_KEY)?;
        Ok(Redirect {
            location: ENTRY_POINT,
        })
    }

    /// Authenticated user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Whether the persisted session has not been restored yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Restoring
    }

    /// Root view for the current state.
    #[must_use]
    pub fn shell(&self) -> ShellView {
        resolve_shell(self.is_loading(), self.current_user())
    }

    /// Settings the store was built with.
    #[must_use]
    pub fn settings(&self) -> &SessionStoreSettings {
        &self.settings
    }

    fn session_role(&self, account: &User) -> Role {
        match self.settings.role_policy {
            RolePolicy::Stored => account.role(),
            RolePolicy::DeriveFromEmail => {
                let derived = Role::from_email(account.email().as_ref());
                if derived != account.role() {
                    warn!(
                        user_id = %account.id(),
                        stored = %account.role(),
                        derived = %derived,
                        "email-derived role differs from stored role"
                    );
                }
                derived
            }
        }
    }

    fn start_session(&mut self, user: User) -> Result<(), SessionStoreError> {
        let encoded = encode(&user)?;
        self.session.set(SESSION_USER_KEY, &encoded)?;
        self.current = Some(user);
        self.phase = SessionPhase::Ready;
        Ok(())
    }

    fn load_students(&self) -> Result<Vec<User>, SessionStoreError> {
        let Some(raw) = self.students.get(REGISTERED_STUDENTS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|error| {
            warn!(%error, "registered-student list is unreadable");
            SessionStoreError::CorruptStudentList {
                message: error.to_string(),
            }
        })
    }

    async fn simulate_latency(&self) {
        if !self.settings.simulated_latency.is_zero() {
            tokio::time::sleep(self.settings.simulated_latency).await;
        }
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, SessionStoreError> {
    serde_json::to_string(value).map_err(|err| SessionStoreError::Encode {
        message: err.to_string(),
    })
}

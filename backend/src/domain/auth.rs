//! Authentication inputs: login credentials and student self-registration.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to the session store.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{DisplayName, EmailAddress, UserValidationError};

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is kept verbatim and must not be blank. It is not otherwise
///   validated: lookups are exact matches against the account registry.
/// - `password` is non-empty and kept verbatim.
///
/// # Examples
/// ```
/// use hannah_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin@hannah.ai", "123456").unwrap();
/// assert_eq!(creds.email(), "admin@hannah.ai");
/// assert!(LoginCredentials::try_from_parts("  ", "123456").is_err());
/// assert_eq!(creds.password(), "123456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        if email.trim().is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email exactly as supplied; the registry matches it verbatim.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reason a student registration was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationRejection {
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email was not of the form `name@domain`.
    #[error("email must look like name@domain")]
    InvalidEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password was shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    DuplicateEmail,
}

/// Self-registration form submitted by a prospective student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRegistration {
    name: String,
    email: String,
    password: Zeroizing<String>,
}

/// Registration fields that passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedRegistration {
    pub(crate) name: DisplayName,
    pub(crate) email: EmailAddress,
}

impl StudentRegistration {
    /// Capture the raw form fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Raw email as submitted.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Check the form shape. Uniqueness is checked by the session store.
    ///
    /// A blank name falls back to the local part of the email address.
    pub(crate) fn validate(&self) -> Result<ValidatedRegistration, RegistrationRejection> {
        let email = EmailAddress::new(&self.email).map_err(|err| match err {
            UserValidationError::EmptyEmail => RegistrationRejection::EmptyEmail,
            _ => RegistrationRejection::InvalidEmail,
        })?;

        if self.password.is_empty() {
            return Err(RegistrationRejection::EmptyPassword);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(RegistrationRejection::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let name = DisplayName::new(&self.name)
            .or_else(|_| DisplayName::new(email.local_part()))
            .map_err(|_| RegistrationRejection::InvalidEmail)?;

        Ok(ValidatedRegistration { name, email })
    }
}

//! Cookie-session configuration parsing and validation.
//!
//! The session cookie is the per-browser key-value store holding the signed-in
//! user, so its key, flags and lifetime are validated here before the server
//! starts. Debug builds fall back to defaults with a warning; release builds
//! require every toggle explicitly.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite, time::Duration};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

mod parsing;

use parsing::{flag, lenient, same_site_policy};

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const DEFAULT_TTL_HOURS: i64 = 2;
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const TTL_HOURS_ENV: &str = "SESSION_TTL_HOURS";
const TTL_EXPECTED: &str = "a positive number of hours";

/// How strictly session toggles are enforced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or invalid toggles fall back to defaults with a warning.
    Debug,
    /// Missing or invalid toggles abort startup.
    Release,
}

impl BuildMode {
    /// [`BuildMode::Debug`] when compiled with debug assertions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hannah_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub(crate) fn is_debug(self) -> bool {
        self == Self::Debug
    }
}

/// Cookie-session settings derived from the environment.
pub struct SessionSettings {
    /// Signing and encryption key for the session cookie.
    pub key: Key,
    /// Whether the cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for the cookie.
    pub same_site: SameSite,
    /// How long a signed-in session survives without activity.
    pub ttl: Duration,
}

/// Reasons the cookie-session settings were rejected.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Release builds need the variable set.
    #[error("{name} is not set")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// The variable could not be parsed.
    #[error("{name}='{value}' is not one of {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Accepted spellings.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("cannot read session key {path}: {source}")]
    KeyRead {
        /// Key file.
        path: PathBuf,
        /// IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file holds fewer bytes than the cookie cipher needs.
    #[error("session key {path} holds {length} bytes, {min_len} required")]
    KeyTooShort {
        /// Key file.
        path: PathBuf,
        /// Bytes found.
        length: usize,
        /// Minimum byte count.
        min_len: usize,
    },
    /// A cross-site cookie must also be `Secure`.
    #[error("SESSION_SAMESITE=None needs SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Generated keys would sign out every user on restart.
    #[error("SESSION_ALLOW_EPHEMERAL is only honoured in debug builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use hannah_backend::inbound::http::session_config::{
///     session_settings_from_env, BuildMode,
/// };
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_file = tempfile::NamedTempFile::new()?;
/// std::fs::write(key_file.path(), vec![b'a'; 64])?;
/// let key_path = key_file.path().to_string_lossy().into_owned();
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "SESSION_KEY_FILE" => Some(key_path.clone()),
///     "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
///     "SESSION_SAMESITE" => Some("Strict".to_owned()),
///     "SESSION_ALLOW_EPHEMERAL" => Some("0".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_policy(env, mode, cookie_secure)?;
    let allow_ephemeral = flag(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key_from_env(env, mode, allow_ephemeral)?;
    let ttl = ttl_from_env(env)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    })
}

fn ttl_from_env<E: Env>(env: &E) -> Result<Duration, SessionConfigError> {
    let Some(value) = env.string(TTL_HOURS_ENV) else {
        return Ok(Duration::hours(DEFAULT_TTL_HOURS));
    };
    match value.trim().parse::<i64>() {
        Ok(hours) if hours > 0 => Ok(Duration::hours(hours)),
        _ => Err(SessionConfigError::InvalidEnv {
            name: TTL_HOURS_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path: PathBuf = env
        .string(KEY_FILE_ENV)
        .map_or_else(|| SESSION_KEY_DEFAULT_PATH.into(), PathBuf::from);

    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "generating a throwaway session key");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };

    let length = bytes.len();
    let key = (length >= SESSION_KEY_MIN_LEN).then(|| Key::derive_from(&bytes));
    bytes.zeroize();
    key.map_or_else(
        || {
            let error = SessionConfigError::KeyTooShort {
                path,
                length,
                min_len: SESSION_KEY_MIN_LEN,
            };
            lenient(mode, Key::generate(), error)
        },
        Ok,
    )
}

#[cfg(test)]
mod tests;

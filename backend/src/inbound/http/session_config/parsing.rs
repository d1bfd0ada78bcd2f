//! Parsing helpers for session cookie toggles.
//!
//! Debug builds log a rejected or missing toggle and fall back to its
//! default; release builds turn the same condition into an error.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const FLAG_EXPECTED: &str = "1|0|true|false|yes|no|y|n|on|off";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Return `fallback` in debug builds, `error` otherwise.
pub(super) fn lenient<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "session configuration fallback (debug build)");
        Ok(fallback)
    } else {
        Err(error)
    }
}

/// Read a boolean toggle named `name`.
pub(super) fn flag<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = env.string(name) else {
        return lenient(mode, default, SessionConfigError::MissingEnv { name });
    };
    match parse_flag(&raw) {
        Some(value) => Ok(value),
        None => lenient(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name,
                value: raw,
                expected: FLAG_EXPECTED,
            },
        ),
    }
}

/// Read the `SameSite` policy. `None` demands a secure cookie in release
/// builds.
pub(super) fn same_site_policy<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(raw) = env.string(SAMESITE_ENV) else {
        return lenient(mode, default, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match parse_same_site(&raw) {
        Some(SameSite::None) if !cookie_secure => {
            lenient(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone)
        }
        Some(policy) => Ok(policy),
        None => lenient(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: raw,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(true))]
    #[case(" Yes ", Some(true))]
    #[case("off", Some(false))]
    #[case("N", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn flags_accept_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_flag(raw), expected);
    }

    #[rstest]
    #[case("Strict", Some(SameSite::Strict))]
    #[case("lax", Some(SameSite::Lax))]
    #[case("NONE", Some(SameSite::None))]
    #[case("sometimes", None)]
    fn same_site_is_case_insensitive(#[case] raw: &str, #[case] expected: Option<SameSite>) {
        assert_eq!(parse_same_site(raw), expected);
    }
}

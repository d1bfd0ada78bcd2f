//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let file = NamedTempFile::new().expect("create key file");
    std::fs::write(file.path(), vec![b'k'; len]).expect("write key file");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

struct ReleaseEnv {
    _key: NamedTempFile,
    vars: HashMap<&'static str, String>,
}

impl ReleaseEnv {
    fn with(mut self, name: &'static str, value: &str) -> Self {
        self.vars.insert(name, value.to_owned());
        self
    }

    fn without(mut self, name: &'static str) -> Self {
        self.vars.remove(name);
        self
    }

    fn settings(&self) -> Result<SessionSettings, SessionConfigError> {
        session_settings_from_env(&mock_env(self.vars.clone()), BuildMode::Release)
    }
}

#[fixture]
fn release_env() -> ReleaseEnv {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let vars = HashMap::from([
        (KEY_FILE_ENV, key.path().to_string_lossy().into_owned()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);
    ReleaseEnv { _key: key, vars }
}

fn expect_error(result: Result<SessionSettings, SessionConfigError>) -> SessionConfigError {
    match result {
        Ok(_) => panic!("expected configuration to be rejected"),
        Err(error) => error,
    }
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(release_env: ReleaseEnv, #[case] name: &'static str) {
    let err = expect_error(release_env.without(name).settings());
    assert!(matches!(err, SessionConfigError::MissingEnv { name: missing } if missing == name));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_invalid_cookie_secure_is_rejected(release_env: ReleaseEnv, #[case] value: &str) {
    let err = expect_error(release_env.with(COOKIE_SECURE_ENV, value).settings());
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_ephemeral_enabled_is_rejected(release_env: ReleaseEnv) {
    let err = expect_error(release_env.with(ALLOW_EPHEMERAL_ENV, "yes").settings());
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_missing_key_file_is_rejected(release_env: ReleaseEnv) {
    let err = expect_error(
        release_env
            .with(KEY_FILE_ENV, "/nonexistent/hannah/session_key")
            .settings(),
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_short_key_is_rejected(release_env: ReleaseEnv) {
    let short = key_file(32);
    let err = expect_error(
        release_env
            .with(KEY_FILE_ENV, &short.path().to_string_lossy())
            .settings(),
    );
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 32, .. }
    ));
}

#[rstest]
fn release_insecure_none_same_site_is_rejected(release_env: ReleaseEnv) {
    let err = expect_error(
        release_env
            .with(COOKIE_SECURE_ENV, "0")
            .with(SAMESITE_ENV, "None")
            .settings(),
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_valid_settings_succeed(release_env: ReleaseEnv) {
    let settings = release_env.settings().expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl, Duration::hours(DEFAULT_TTL_HOURS));
}

#[rstest]
#[case("12", Some(12))]
#[case("0", None)]
#[case("-3", None)]
#[case("soon", None)]
fn ttl_must_be_positive_hours(
    release_env: ReleaseEnv,
    #[case] value: &str,
    #[case] expected: Option<i64>,
) {
    let result = release_env.with(TTL_HOURS_ENV, value).settings();
    match expected {
        Some(hours) => assert_eq!(
            result.expect("valid ttl").ttl,
            Duration::hours(hours)
        ),
        None => assert!(matches!(
            expect_error(result),
            SessionConfigError::InvalidEnv {
                name: TTL_HOURS_ENV,
                ..
            }
        )),
    }
}

#[test]
fn debug_defaults_allow_ephemeral_key() {
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        "/nonexistent/hannah/session_key".to_owned(),
    )]));
    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults should succeed");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[test]
fn debug_short_key_falls_back_to_generated_key() {
    let short = key_file(8);
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        short.path().to_string_lossy().into_owned(),
    )]));
    assert!(session_settings_from_env(&env, BuildMode::Debug).is_ok());
}

#[rstest]
#[case("unexpected", SameSite::Lax)]
#[case("strict", SameSite::Strict)]
#[case("NONE", SameSite::None)]
fn debug_same_site_parsing(#[case] value: &str, #[case] expected: SameSite) {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let env = mock_env(HashMap::from([
        (KEY_FILE_ENV, key.path().to_string_lossy().into_owned()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, value.to_owned()),
    ]));

    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
    assert_eq!(settings.same_site, expected);
}

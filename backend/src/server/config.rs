//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use camino::Utf8PathBuf;
use mockable::Env;

use hannah_backend::domain::{RolePolicy, SessionStoreSettings};
use hannah_backend::inbound::http::session_config::{
    BuildMode, SessionConfigError, SessionSettings, session_settings_from_env,
};

const LATENCY_ENV: &str = "HANNAH_AUTH_LATENCY_MS";
const ROLE_POLICY_ENV: &str = "HANNAH_ROLE_POLICY";
const DATA_DIR_ENV: &str = "HANNAH_DATA_DIR";
const BIND_ADDR_ENV: &str = "HANNAH_BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while assembling the server configuration.
#[derive(thiserror::Error, Debug)]
pub enum ServerConfigError {
    /// Cookie-session settings were rejected.
    #[error(transparent)]
    Session(#[from] SessionConfigError),
    /// A server variable is present but malformed.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
}

impl From<ServerConfigError> for std::io::Error {
    fn from(value: ServerConfigError) -> Self {
        Self::other(value)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: SessionStoreSettings,
    pub(crate) data_dir: Option<Utf8PathBuf>,
}

impl ServerConfig {
    /// Construct a configuration with default store settings and in-memory
    /// student storage.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            store: SessionStoreSettings::default(),
            data_dir: None,
        }
    }

    /// Read the whole configuration from `env`.
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ServerConfigError> {
        let session = session_settings_from_env(env, mode)?;
        let bind_addr = match parse_env::<SocketAddr, _>(env, BIND_ADDR_ENV, "a socket address")? {
            Some(addr) => addr,
            None => default_bind_addr()?,
        };
        let mut store = SessionStoreSettings::default();
        if let Some(millis) = parse_env::<u64, _>(env, LATENCY_ENV, "a latency in milliseconds")? {
            store.simulated_latency = Duration::from_millis(millis);
        }
        if let Some(policy) = parse_env::<RolePolicy, _>(env, ROLE_POLICY_ENV, "stored or email")? {
            store.role_policy = policy;
        }
        let data_dir = env
            .string(DATA_DIR_ENV)
            .filter(|dir| !dir.trim().is_empty())
            .map(Utf8PathBuf::from);

        Ok(Self::new(session, bind_addr)
            .with_store_settings(store)
            .with_data_dir(data_dir))
    }

    /// Replace the latency and role policy applied to session stores.
    #[must_use]
    pub fn with_store_settings(mut self, store: SessionStoreSettings) -> Self {
        self.store = store;
        self
    }

    /// Persist registered students under `dir`; `None` keeps them in memory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: Option<Utf8PathBuf>) -> Self {
        self.data_dir = dir;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn default_bind_addr() -> Result<SocketAddr, ServerConfigError> {
    DEFAULT_BIND_ADDR
        .parse()
        .map_err(|_| ServerConfigError::InvalidEnv {
            name: BIND_ADDR_ENV,
            value: DEFAULT_BIND_ADDR.to_owned(),
            expected: "a socket address",
        })
}

fn parse_env<T, E>(
    env: &E,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ServerConfigError>
where
    T: std::str::FromStr,
    E: Env,
{
    env.string(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ServerConfigError::InvalidEnv {
                    name,
                    value,
                    expected,
                })
        })
        .transpose()
}

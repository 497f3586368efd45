//! Configuration management for Recent Rhythms.
//!
//! Values come from the process environment, optionally seeded from `.env`
//! files. Nothing here is read implicitly: callers build [`Credentials`] and
//! [`AuthConfig`] once at startup and pass them to the Authentication
//! Manager.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory (`recent-rhythms/.env`)
//! 4. Built-in defaults for the optional settings

use std::{collections::BTreeSet, env, fmt, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "user-read-recently-played user-top-read user-read-private";
pub const DEFAULT_TOKEN_CACHE: &str = ".cache";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Loads `.env` files into the process environment.
///
/// Variables already present in the environment are never overwritten, so
/// the working directory file takes precedence over the one in the local
/// data directory. Missing files are fine; unreadable ones are reported.
///
/// The data directory (`~/.local/share/recent-rhythms` on Linux) is created
/// if needed so the build script's `.env.example` has a home.
pub async fn load_env() -> Result<(), ConfigError> {
    let local = PathBuf::from(".env");
    load_env_file(local)?;

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("recent-rhythms/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::InvalidValue {
                name: "data directory",
                reason: e.to_string(),
            })?;
    }
    load_env_file(path)
}

fn load_env_file(path: PathBuf) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|source| ConfigError::EnvFile { path, source })
}

/// Client credentials registered with the provider. Immutable once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: BTreeSet<String>,
}

impl Credentials {
    pub fn new<I, S>(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Credentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scope: scope.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`,
    /// `SPOTIFY_REDIRECT_URI` and the optional `SPOTIFY_SCOPE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Credentials::from_env`] but reads through `lookup`, which
    /// keeps tests free of process-environment side effects.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = required(&lookup, "SPOTIFY_CLIENT_ID")?;
        let client_secret = required(&lookup, "SPOTIFY_CLIENT_SECRET")?;
        let redirect_uri = required(&lookup, "SPOTIFY_REDIRECT_URI")?;
        url::Url::parse(&redirect_uri).map_err(|e| ConfigError::InvalidValue {
            name: "SPOTIFY_REDIRECT_URI",
            reason: e.to_string(),
        })?;

        let scope = optional(&lookup, "SPOTIFY_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string());

        Ok(Credentials::new(
            client_id,
            client_secret,
            redirect_uri,
            scope.split_whitespace(),
        ))
    }

    /// Scope as the space separated string OAuth expects.
    pub fn scope_string(&self) -> String {
        self.scope.iter().cloned().collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Provider endpoints and runtime settings for the Authentication Manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub authorize_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Upper bound for every provider call.
    pub timeout: Duration,
    pub token_cache: PathBuf,
    /// Value sent as `state` and required back on the redirect.
    pub state: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            authorize_url: SPOTIFY_AUTH_URL.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            api_url: SPOTIFY_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token_cache: PathBuf::from(DEFAULT_TOKEN_CACHE),
            state: None,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AuthConfig::default();

        let timeout = match optional(&lookup, "RHYTHMS_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "RHYTHMS_HTTP_TIMEOUT_SECS",
                        reason: format!("expected a positive number of seconds, got '{}'", raw),
                    });
                }
            },
            None => defaults.timeout,
        };

        Ok(AuthConfig {
            authorize_url: optional(&lookup, "SPOTIFY_AUTH_URL").unwrap_or(defaults.authorize_url),
            token_url: optional(&lookup, "SPOTIFY_TOKEN_URL").unwrap_or(defaults.token_url),
            api_url: optional(&lookup, "SPOTIFY_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            timeout,
            token_cache: optional(&lookup, "RHYTHMS_TOKEN_CACHE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_cache),
            state: optional(&lookup, "SPOTIFY_AUTH_STATE"),
        })
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::MissingVar(key))
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

//! Error types for configuration, authentication, token caching and data
//! fetching.
//!
//! Every failure that involves the provider is returned as a typed value so
//! callers can tell "the user has no history" apart from "the call failed".

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Missing or invalid configuration. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("cannot load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },
}

/// Failures reading or writing the Token Cache.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cannot access token cache at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token cache at {path} is malformed: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Cause of a failed call to the provider's token endpoint.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected token response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("token response has an unusable expires_in of {0} seconds")]
    InvalidExpiry(i64),
}

impl ProviderError {
    /// Whether the call was aborted by the configured request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Transport(e) if e.is_timeout())
    }

    /// HTTP status of a rejected request, if the provider answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::Transport(e) => e.status(),
            ProviderError::Decode(_) | ProviderError::InvalidExpiry(_) => None,
        }
    }
}

/// Errors returned by the Authentication Manager.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("redirect URL could not be parsed: {0}")]
    InvalidRedirect(#[from] url::ParseError),

    #[error("redirect URL does not contain an authorization code")]
    MissingCode,

    #[error("authorization was denied by the provider: {0}")]
    AuthorizationDenied(String),

    #[error("redirect state does not match the authorization request")]
    StateMismatch,

    #[error("token exchange failed: {0}")]
    ExchangeFailed(#[source] ProviderError),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    CacheIo(#[from] CacheError),
}

/// Errors returned while fetching recently played tracks.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("limit must be between 1 and 50, got {0}")]
    LimitOutOfRange(i64),

    #[error("session expired, request a new one")]
    SessionExpired,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected API response: {0}")]
    Decode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_status() {
        let rejected = ProviderError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "invalid_grant".into(),
        };

        assert_eq!(rejected.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!rejected.is_timeout());
        assert_eq!(ProviderError::InvalidExpiry(-1).status(), None);
    }
}

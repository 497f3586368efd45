use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::{AuthConfig, Credentials},
    error::{AuthError, ConfigError, ProviderError},
    management::{FileTokenCache, TokenCache},
    spotify::AuthenticatedSession,
    types::{TokenResponse, TokenSet},
};

/// The authorization URL handed to the user, plus the `state` that must come
/// back on the redirect. Lives for one login attempt and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: Option<String>,
}

/// Authentication status as derived from the Token Cache.
///
/// The pending-redirect phase of a login only exists inside the process that
/// issued the authorization URL, so it never shows up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { expires_at: DateTime<Utc> },
    Expired { refreshable: bool },
}

/// Mediates the OAuth2 authorization-code flow against the provider and
/// keeps the current [`TokenSet`] in a [`TokenCache`].
pub struct AuthManager<C: TokenCache = FileTokenCache> {
    credentials: Credentials,
    config: AuthConfig,
    cache: C,
    http: Client,
    authorization: AuthorizationRequest,
}

impl AuthManager<FileTokenCache> {
    /// Builds a manager from the process environment, caching tokens in the
    /// configured file.
    pub fn from_env() -> Result<Self, AuthError> {
        let credentials = Credentials::from_env()?;
        let config = AuthConfig::from_env()?;
        let cache = FileTokenCache::new(config.token_cache.clone());
        AuthManager::new(credentials, config, cache)
    }
}

impl<C: TokenCache> AuthManager<C> {
    pub fn new(credentials: Credentials, config: AuthConfig, cache: C) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                name: "http client",
                reason: e.to_string(),
            })?;

        let authorization = build_authorization_request(&credentials, &config)?;

        Ok(AuthManager {
            credentials,
            config,
            cache,
            http,
            authorization,
        })
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// True iff a token set is cached and its expiry is strictly in the
    /// future. Cache read failures count as "not authenticated".
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.state().await, AuthState::Authenticated { .. })
    }

    pub async fn state(&self) -> AuthState {
        match self.cached_token().await {
            None => AuthState::Unauthenticated,
            Some(token) if token.is_expired() => AuthState::Expired {
                refreshable: token.refresh_token.is_some(),
            },
            Some(token) => AuthState::Authenticated {
                expires_at: token.expires_at,
            },
        }
    }

    /// The provider's authorization URL. Built once from configuration, so
    /// repeated calls return the same link.
    pub fn authorization_url(&self) -> &str {
        &self.authorization.url
    }

    pub fn authorization_request(&self) -> &AuthorizationRequest {
        &self.authorization
    }

    /// Exchanges the authorization code carried by `redirect_url` for a
    /// token set and persists it, replacing any previously cached one.
    ///
    /// No request is made when the URL has no code, reports an
    /// authorization error, or carries the wrong `state`.
    pub async fn exchange_redirect(&self, redirect_url: &str) -> Result<TokenSet, AuthError> {
        let redirect = parse_redirect(redirect_url)?;

        if let Some(expected) = &self.authorization.state {
            if redirect.state.as_deref() != Some(expected.as_str()) {
                return Err(AuthError::StateMismatch);
            }
        }

        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", redirect.code.as_str()),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ])
            .await
            .map_err(AuthError::ExchangeFailed)?;

        let token = TokenSet::from_response(response, &self.credentials.scope, None, Utc::now())
            .map_err(AuthError::ExchangeFailed)?;
        self.cache.store(&token).await?;

        info!(expires_at = %token.expires_at, "authorization code exchanged");
        Ok(token)
    }

    /// Returns a session backed by a valid token set.
    ///
    /// An expired token is refreshed once when a refresh token is cached; the
    /// refreshed set replaces the cached one. Any refresh failure yields
    /// [`AuthError::NotAuthenticated`], never a stale session.
    pub async fn session(&self) -> Result<AuthenticatedSession, AuthError> {
        let Some(token) = self.cached_token().await else {
            return Err(AuthError::NotAuthenticated);
        };

        if !token.is_expired() {
            return Ok(self.session_for(&token));
        }

        let Some(refresh_token) = token.refresh_token.as_deref() else {
            debug!("cached token expired and cannot be refreshed");
            return Err(AuthError::NotAuthenticated);
        };

        let refreshed = match self.refresh(refresh_token, &token).await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "token refresh failed");
                return Err(AuthError::NotAuthenticated);
            }
        };

        self.cache.store(&refreshed).await?;
        info!(expires_at = %refreshed.expires_at, "access token refreshed");

        Ok(self.session_for(&refreshed))
    }

    /// Forgets the cached token set.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.cache.clear().await?;
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str, current: &TokenSet) -> Result<TokenSet, ProviderError> {
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        TokenSet::from_response(
            response,
            &current.scope,
            Some(refresh_token),
            Utc::now(),
        )
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ProviderError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ProviderError::Decode)
    }

    async fn cached_token(&self) -> Option<TokenSet> {
        match self.cache.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "token cache unreadable, treating as not authenticated");
                None
            }
        }
    }

    fn session_for(&self, token: &TokenSet) -> AuthenticatedSession {
        AuthenticatedSession::new(self.http.clone(), &self.config.api_url, token)
    }
}

/// Code and state extracted from a provider redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub code: String,
    pub state: Option<String>,
}

/// Pulls the authorization code (and state, if any) out of a redirect URL.
pub fn parse_redirect(redirect_url: &str) -> Result<Redirect, AuthError> {
    let url = Url::parse(redirect_url.trim())?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, error) {
        (Some(code), _) => Ok(Redirect { code, state }),
        (None, Some(reason)) => Err(AuthError::AuthorizationDenied(reason)),
        (None, None) => Err(AuthError::MissingCode),
    }
}

fn build_authorization_request(
    credentials: &Credentials,
    config: &AuthConfig,
) -> Result<AuthorizationRequest, ConfigError> {
    let mut url = Url::parse(&config.authorize_url).map_err(|e| ConfigError::InvalidValue {
        name: "SPOTIFY_AUTH_URL",
        reason: e.to_string(),
    })?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("client_id", &credentials.client_id);
        query.append_pair("response_type", "code");
        query.append_pair("redirect_uri", &credentials.redirect_uri);
        query.append_pair("scope", &credentials.scope_string());
        if let Some(state) = &config.state {
            query.append_pair("state", state);
        }
    }

    Ok(AuthorizationRequest {
        url: url.into(),
        state: config.state.clone(),
    })
}

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};

use crate::{
    error::FetchError,
    spotify::tracks,
    types::{Limit, TokenSet, TrackRecord},
};

/// A request-capable handle bound to a valid access token.
///
/// Obtained from [`AuthManager::session`](crate::spotify::AuthManager::session)
/// for the duration of a data fetch; ask for a fresh one for the next fetch
/// rather than keeping it around past `expires_at`.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    http: Client,
    api_url: String,
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl AuthenticatedSession {
    pub(crate) fn new(http: Client, api_url: &str, token: &TokenSet) -> Self {
        AuthenticatedSession {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: token.access_token.clone(),
            expires_at: token.expires_at,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Same rule as [`TokenSet::is_expired`]: expired once `now >= expires_at`.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// GET request against the Web API, `path` relative to the API base URL.
    pub fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        self.http.get(url).bearer_auth(&self.access_token)
    }

    /// Shorthand for [`tracks::get_recently_played`].
    pub async fn recently_played(&self, limit: Limit) -> Result<Vec<TrackRecord>, FetchError> {
        tracks::get_recently_played(self, limit).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Duration;

    use super::*;

    fn session(expires_in_secs: i64) -> AuthenticatedSession {
        let token = TokenSet {
            access_token: "T".into(),
            refresh_token: None,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
            token_type: "Bearer".into(),
            scope: BTreeSet::new(),
        };
        // port 9 is discard; nothing may be sent for an expired session
        AuthenticatedSession::new(Client::new(), "http://127.0.0.1:9/v1/", &token)
    }

    #[test]
    fn test_expiry_follows_token() {
        assert!(session(-1).is_expired());
        assert!(!session(600).is_expired());
    }

    #[tokio::test]
    async fn test_expired_session_is_not_used() {
        let result = session(-1).recently_played(Limit::default()).await;

        assert!(matches!(result, Err(FetchError::SessionExpired)));
    }
}

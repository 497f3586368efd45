use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::{FetchError, ProviderError};

/// The bundle of tokens obtained from a code exchange or a refresh.
///
/// A `TokenSet` is always replaced wholesale, never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
    pub scope: BTreeSet<String>,
}

impl TokenSet {
    /// Builds a token set from a token endpoint response received at `now`.
    ///
    /// `requested_scope` is used when the provider does not echo the granted
    /// scope, and `previous_refresh` is kept when a refresh response does not
    /// rotate the refresh token. A negative or unrepresentable `expires_in`
    /// is rejected.
    pub fn from_response(
        response: TokenResponse,
        requested_scope: &BTreeSet<String>,
        previous_refresh: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, ProviderError> {
        let expires_at = Some(response.expires_in)
            .filter(|secs| *secs >= 0)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(ProviderError::InvalidExpiry(response.expires_in))?;

        let scope = match response.scope.as_deref() {
            Some(granted) if !granted.trim().is_empty() => {
                granted.split_whitespace().map(str::to_string).collect()
            }
            _ => requested_scope.clone(),
        };

        Ok(TokenSet {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .filter(|t| !t.is_empty())
                .or_else(|| previous_refresh.map(str::to_string)),
            expires_at,
            token_type: response.token_type,
            scope,
        })
    }

    /// A token is expired once `now >= expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// JSON body returned by the provider's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Number of tracks to request from the recently played endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(u8);

impl Limit {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 50;

    /// Validates a requested limit. Values outside `1..=50` are rejected
    /// rather than clamped.
    pub fn new(value: i64) -> Result<Self, FetchError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Limit(value as u8))
        } else {
            Err(FetchError::LimitOutOfRange(value))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit(10)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayedResponse {
    #[serde(default)]
    pub items: Vec<PlayHistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistoryItem {
    pub track: PlayedTrack,
    pub played_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayedTrack {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

/// One play of a track, shaped for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub track_name: String,
    pub artist: String,
    pub popularity: u32,
    pub played_at: DateTime<Utc>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub track: String,
    pub artist: String,
    pub popularity: u32,
    pub played_at: String,
}

#[derive(Tabled)]
pub struct ReportTrackRow {
    pub track_name: String,
    pub artist: String,
    pub popularity: u32,
}

/// Summary statistics over a listening history.
#[derive(Debug, Clone, PartialEq)]
pub struct ListeningStats {
    pub total_tracks: usize,
    pub unique_artists: usize,
    pub top_artist: String,
    pub avg_popularity: f64,
}

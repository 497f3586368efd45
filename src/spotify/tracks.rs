use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    spotify::AuthenticatedSession,
    types::{Limit, PlayHistoryItem, RecentlyPlayedResponse, TrackRecord},
};

/// Retrieves the user's recently played tracks, most recent first.
///
/// Calls `GET /me/player/recently-played?limit=N`. Items without a track
/// name or without any artist are skipped; a missing popularity counts as 0.
/// A user without any history gets `Ok` with an empty list, which is
/// distinct from every failure case. An expired session is refused before
/// any request is made.
pub async fn get_recently_played(
    session: &AuthenticatedSession,
    limit: Limit,
) -> Result<Vec<TrackRecord>, FetchError> {
    if session.is_expired() {
        return Err(FetchError::SessionExpired);
    }

    debug!(limit = limit.get(), "fetching recently played tracks");

    let response = session
        .get("me/player/recently-played")
        .query(&[("limit", limit.get())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::Status { status, body });
    }

    let bytes = response.bytes().await?;
    let res: RecentlyPlayedResponse = serde_json::from_slice(&bytes).map_err(FetchError::Decode)?;

    let total = res.items.len();
    let records: Vec<TrackRecord> = res.items.into_iter().filter_map(to_record).collect();
    debug!(received = total, kept = records.len(), "recently played tracks processed");

    Ok(records)
}

fn to_record(item: PlayHistoryItem) -> Option<TrackRecord> {
    let PlayHistoryItem { track, played_at } = item;

    let (Some(name), Some(artist)) = (
        track.name.filter(|n| !n.is_empty()),
        track.artists.into_iter().next(),
    ) else {
        warn!("skipping track with missing name or artist");
        return None;
    };

    let played_at = match DateTime::parse_from_rfc3339(&played_at) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            warn!(played_at = %played_at, error = %e, "skipping track with invalid timestamp");
            return None;
        }
    };

    Some(TrackRecord {
        track_name: name,
        artist: artist.name,
        popularity: track.popularity.unwrap_or(0),
        played_at,
    })
}

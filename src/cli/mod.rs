//! # CLI Module
//!
//! User-facing commands of the `rhythms` binary. Each command builds what it
//! needs from configuration, talks to the [`spotify`](crate::spotify) layer
//! and turns the typed results into coloured terminal output.
//!
//! ## Commands
//!
//! - [`auth`] - Log in through the OAuth authorization-code flow
//! - [`status`] - Show whether a valid token is cached
//! - [`logout`] - Forget the cached token
//! - [`recent`] - Table of recently played tracks
//! - [`stats`] - Listening statistics and charts
//! - [`export`] - CSV or text report export
//!
//! ## Error Handling
//!
//! Configuration errors and unrecoverable authentication failures end the
//! process with exit code 1 through the `error!` macro. Everything below the
//! CLI returns typed errors and never exits on its own.

mod auth;
mod charts;
mod export;
mod recent;
mod stats;
mod status;

pub use auth::auth;
pub use auth::logout;
pub use charts::render_bar_chart;
pub use export::ExportFormat;
pub use export::export;
pub use recent::recent;
pub use stats::stats;
pub use status::status;

use crate::{
    config::{AuthConfig, Credentials},
    error::AuthError,
    management::{FileTokenCache, ListeningHistory},
    spotify::AuthManager,
    types::Limit,
    utils, warning,
};

/// Builds the Authentication Manager from the environment, exiting on
/// configuration errors. With `with_state` a fresh `state` value is attached
/// to the authorization URL unless one is configured.
fn build_manager(with_state: bool) -> AuthManager<FileTokenCache> {
    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => crate::error!("Configuration error: {}", e),
    };
    let mut config = match AuthConfig::from_env() {
        Ok(c) => c,
        Err(e) => crate::error!("Configuration error: {}", e),
    };
    if with_state {
        config.state.get_or_insert_with(utils::generate_state);
    }

    let cache = FileTokenCache::new(config.token_cache.clone());
    match AuthManager::new(credentials, config, cache) {
        Ok(m) => m,
        Err(e) => crate::error!("Configuration error: {}", e),
    }
}

/// Fetches the listening history, exiting with a hint to log in when no
/// usable token is cached and with the cause when the API call fails.
async fn fetch_history(limit: Limit) -> ListeningHistory {
    let manager = build_manager(false);

    let session = match manager.session().await {
        Ok(s) => s,
        Err(AuthError::NotAuthenticated) => {
            crate::error!("Not authenticated. Please run `rhythms auth` first.")
        }
        Err(e) => crate::error!("Cannot prepare session. Err: {}", e),
    };
    tracing::debug!(expires_at = %session.expires_at(), "session ready");

    let pb = utils::spinner(&format!(
        "Fetching {} recently played tracks...",
        limit.get()
    ));
    let result = session.recently_played(limit).await;
    pb.finish_and_clear();

    let history = match result {
        Ok(records) => ListeningHistory::new(records),
        Err(e) => crate::error!("Failed to fetch recently played tracks. Err: {}", e),
    };

    if history.is_empty() {
        warning!("No recent tracks found. Play some music on Spotify first!");
    }

    history
}

//! # Spotify Integration Module
//!
//! Talks to the two provider surfaces Recent Rhythms needs:
//!
//! ```text
//! CLI / Dashboard
//!          ↓
//! AuthManager ── TokenCache (current TokenSet)
//!     ├── authorization URL (browser-visited)
//!     ├── POST /api/token (code exchange, refresh)
//!     └── AuthenticatedSession
//!              ↓
//!        GET /me/player/recently-played
//! ```
//!
//! ## Authentication
//!
//! [`AuthManager`] wraps the OAuth 2.0 authorization-code grant:
//! 1. **Status**: [`AuthManager::is_authenticated`] checks the cached token
//! 2. **Login URL**: [`AuthManager::authorization_url`] for the user to visit
//! 3. **Exchange**: [`AuthManager::exchange_redirect`] trades the code in the
//!    pasted redirect URL for a token set and caches it
//! 4. **Session**: [`AuthManager::session`] hands out an
//!    [`AuthenticatedSession`], refreshing an expired token once if possible
//!
//! Login state moves `Unauthenticated → PendingRedirect → Authenticated →
//! Expired`, and from `Expired` back to `Authenticated` on a successful
//! refresh or to `Unauthenticated` when the refresh fails.
//!
//! ## Data
//!
//! [`tracks::get_recently_played`] fetches up to 50 recent plays.
//!
//! ## Error Types
//!
//! - [`AuthError`](crate::error::AuthError) for everything in the login flow
//! - [`FetchError`](crate::error::FetchError) for data requests
//!
//! Provider calls are awaited one at a time, have no automatic retry and
//! are bounded by [`AuthConfig::timeout`](crate::config::AuthConfig::timeout).

pub mod auth;
mod session;
pub mod tracks;

pub use auth::AuthManager;
pub use auth::AuthState;
pub use auth::AuthorizationRequest;
pub use session::AuthenticatedSession;

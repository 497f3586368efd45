use reqwest::StatusCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{error, error::AuthError, info, success, utils, warning};

/// Runs the interactive login: prints the authorization URL, tries to open
/// it in the browser and exchanges the redirect URL the user pastes back.
pub async fn auth() {
    let manager = super::build_manager(true);

    if manager.is_authenticated().await {
        success!("Already authenticated!");
        return;
    }

    let request = manager.authorization_request();
    debug!(with_state = request.state.is_some(), "authorization URL issued");
    let auth_url = request.url.as_str();
    info!("Go to this URL and log in:\n{}", auth_url);
    if webbrowser::open(auth_url).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually.");
    }

    info!("Paste the full redirected URL after logging in:");
    let mut redirect_url = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = stdin.read_line(&mut redirect_url).await {
        error!("Cannot read redirect URL. Err: {}", e);
    }

    match manager.exchange_redirect(redirect_url.trim()).await {
        Ok(token) => success!(
            "Authentication complete! Token valid until {}",
            utils::format_local(token.expires_at)
        ),
        Err(AuthError::MissingCode) => {
            error!("The pasted URL has no authorization code. Please run `rhythms auth` again.")
        }
        Err(AuthError::StateMismatch) => {
            error!("The pasted URL belongs to a different login attempt. Please run `rhythms auth` again.")
        }
        Err(AuthError::ExchangeFailed(e)) if e.is_timeout() => {
            error!("Spotify did not answer in time. Please try again.")
        }
        Err(AuthError::ExchangeFailed(e)) if e.status() == Some(StatusCode::BAD_REQUEST) => {
            error!(
                "Spotify rejected the authorization code, it may have expired or been used already. Please run `rhythms auth` again. Err: {}",
                e
            )
        }
        Err(e) => error!("Authentication failed. Err: {}", e),
    }
}

pub async fn logout() {
    let manager = super::build_manager(false);
    match manager.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Cannot clear token cache. Err: {}", e),
    }
}

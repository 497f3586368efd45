use crate::{info, spotify::AuthState, success, utils, warning};

pub async fn status() {
    let manager = super::build_manager(false);

    match manager.state().await {
        AuthState::Authenticated { expires_at } => success!(
            "Connected to Spotify! Token valid until {}",
            utils::format_local(expires_at)
        ),
        AuthState::Expired { refreshable: true } => {
            info!("Token expired. It will be refreshed on the next request.")
        }
        AuthState::Expired { refreshable: false } | AuthState::Unauthenticated => {
            warning!("Not authenticated. Please run `rhythms auth`.")
        }
    }
}

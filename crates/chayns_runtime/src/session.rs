//! Refreshes the user identity held in [`RuntimeInfo`] from the session's access token.

use chayns_host::{HostServices, LogEntry};

use crate::{
    diagnostics,
    error::BootstrapError,
    model::{RuntimeInfo, UserSession},
    token::decode_access_token,
};

const FILE_NAME: &str = "session";

/// Writes the current user's identity into `info.user`.
///
/// Best effort: when the store cannot be read or the stored token cannot be decoded the failure
/// is logged, `info.user` keeps its previous value, and `false` is returned. A missing token
/// signs the user out (anonymous identity) and counts as success.
pub async fn update_session(services: &HostServices, info: &mut RuntimeInfo) -> bool {
    match resolve_user(services).await {
        Ok(user) => {
            info.user = user;
            true
        }
        Err(err) => {
            diagnostics::error(
                services,
                LogEntry::new("Update userData failed.")
                    .location_id(info.location_id)
                    .source(FILE_NAME, "updateUserData")
                    .exception(err.to_string()),
            );
            false
        }
    }
}

async fn resolve_user(services: &HostServices) -> Result<UserSession, BootstrapError> {
    let token = services
        .session
        .access_token()
        .await
        .map_err(BootstrapError::SessionStore)?
        .filter(|token| !token.trim().is_empty());

    let Some(token) = token else {
        return Ok(UserSession::from_token(None, None));
    };
    let payload = decode_access_token(&token)
        .ok_or_else(|| BootstrapError::Decode("access token payload is unreadable".to_string()))?;
    Ok(UserSession::from_token(Some(token), Some(&payload)))
}

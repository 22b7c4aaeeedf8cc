//! `localStorage`-backed session store.
//!
//! Synchronous at the browser API boundary; the [`SessionStore`] futures resolve immediately.

use chayns_host::{SessionStore, SessionStoreFuture};
#[cfg(target_arch = "wasm32")]
use chayns_host::ACCESS_TOKEN_KEY;

#[derive(Debug, Clone, Copy, Default)]
/// Session store keeping the access token in `window.localStorage`.
pub struct WebSessionStore;

impl WebSessionStore {
    /// Reads the raw stored token.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the read is rejected.
    pub fn load_token(self) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage()?;
            storage
                .get_item(ACCESS_TOKEN_KEY)
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(None)
        }
    }

    /// Stores `token`, replacing any previous value. A blank token clears the entry.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the write fails.
    pub fn save_token(self, token: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage()?;
            if token.trim().is_empty() {
                return storage
                    .remove_item(ACCESS_TOKEN_KEY)
                    .map_err(|e| format!("localStorage remove_item failed: {e:?}"));
            }
            storage
                .set_item(ACCESS_TOKEN_KEY, token)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = token;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl SessionStore for WebSessionStore {
    fn access_token(&self) -> SessionStoreFuture<'_, Result<Option<String>, String>> {
        let store = *self;
        Box::pin(async move { store.load_token() })
    }

    fn set_access_token<'a>(&'a self, token: &'a str) -> SessionStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.save_token(token) })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_build_has_no_stored_token() {
        let store = WebSessionStore;
        assert_eq!(block_on(store.set_access_token("a.b.c")), Ok(()));
        assert_eq!(block_on(store.access_token()), Ok(None));
    }
}

//! `window.alert` dialog adapter.

use chayns_host::DialogService;
use leptos::logging;

#[derive(Debug, Clone, Copy, Default)]
/// Dialog service backed by the browser's blocking `window.alert`.
pub struct WebDialogService;

impl DialogService for WebDialogService {
    fn alert(&self, message: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                logging::warn!("alert skipped, window unavailable: {message}");
                return;
            };
            if let Err(err) = window.alert_with_message(message) {
                logging::warn!("alert failed: {err:?}");
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            logging::warn!("alert without a browser: {message}");
        }
    }
}

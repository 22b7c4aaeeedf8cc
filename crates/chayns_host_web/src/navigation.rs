//! `window.location`-backed navigation.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use chayns_host::NavigationService;

#[derive(Debug, Clone, Default)]
/// Navigation service that redirects through `window.location` and tracks the tapp menu routes
/// the page has disabled.
///
/// Routes may be disabled before [`NavigationService::init`] runs; `init` keeps them.
pub struct WebNavigationService {
    disabled: Rc<RefCell<BTreeSet<i64>>>,
}

impl NavigationService for WebNavigationService {
    // The menu is rendered from the runtime info, so there is nothing to prepare here.
    fn init(&self) {}

    fn redirect(&self, url: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
            window
                .location()
                .set_href(url)
                .map_err(|e| format!("location.href assignment failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Err(format!("no page to redirect to {url}"))
        }
    }

    fn disable_tapp(&self, tapp_id: i64) {
        self.disabled.borrow_mut().insert(tapp_id);
    }

    fn is_tapp_disabled(&self, tapp_id: i64) -> bool {
        self.disabled.borrow().contains(&tapp_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_keeps_routes_disabled_earlier() {
        let navigation = WebNavigationService::default();
        let handle = navigation.clone();
        navigation.disable_tapp(251441);
        navigation.init();
        navigation.disable_tapp(12);

        assert!(handle.is_tapp_disabled(251441));
        assert!(handle.is_tapp_disabled(12));
        assert!(!handle.is_tapp_disabled(1));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_build_cannot_redirect() {
        assert!(WebNavigationService::default()
            .redirect("https://chayns.net/?locationid=1")
            .is_err());
    }
}

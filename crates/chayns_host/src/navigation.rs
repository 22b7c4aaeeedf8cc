//! Page navigation contracts: full-page redirects and the tapp navigation menu.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

/// Host service owning page navigation.
pub trait NavigationService {
    /// Prepares the navigation menu before tapps are loaded.
    fn init(&self);

    /// Replaces the current page with `url`. Ends the current page session on success.
    ///
    /// # Errors
    ///
    /// Returns an error when the host refuses the navigation.
    fn redirect(&self, url: &str) -> Result<(), String>;

    /// Removes the route to `tapp_id` from the navigation menu.
    fn disable_tapp(&self, tapp_id: i64);

    /// Returns whether the route to `tapp_id` was disabled.
    fn is_tapp_disabled(&self, tapp_id: i64) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
/// Navigation service for targets without a page.
pub struct NoopNavigationService;

impl NavigationService for NoopNavigationService {
    fn init(&self) {}

    fn redirect(&self, _url: &str) -> Result<(), String> {
        Ok(())
    }

    fn disable_tapp(&self, _tapp_id: i64) {}

    fn is_tapp_disabled(&self, _tapp_id: i64) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct NavigationRecord {
    initialized: bool,
    redirects: Vec<String>,
    disabled: BTreeSet<i64>,
}

#[derive(Debug, Clone, Default)]
/// Navigation service that records every call.
pub struct MemoryNavigationService {
    inner: Rc<RefCell<NavigationRecord>>,
}

impl MemoryNavigationService {
    /// Returns whether [`NavigationService::init`] ran.
    pub fn initialized(&self) -> bool {
        self.inner.borrow().initialized
    }

    /// Returns redirect targets in call order.
    pub fn redirects(&self) -> Vec<String> {
        self.inner.borrow().redirects.clone()
    }

    /// Returns disabled tapp ids in ascending order.
    pub fn disabled_tapps(&self) -> Vec<i64> {
        self.inner.borrow().disabled.iter().copied().collect()
    }
}

impl NavigationService for MemoryNavigationService {
    fn init(&self) {
        self.inner.borrow_mut().initialized = true;
    }

    fn redirect(&self, url: &str) -> Result<(), String> {
        self.inner.borrow_mut().redirects.push(url.to_string());
        Ok(())
    }

    fn disable_tapp(&self, tapp_id: i64) {
        self.inner.borrow_mut().disabled.insert(tapp_id);
    }

    fn is_tapp_disabled(&self, tapp_id: i64) -> bool {
        self.inner.borrow().disabled.contains(&tapp_id)
    }
}

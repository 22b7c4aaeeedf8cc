//! User-facing surfaces the startup sequence hands off to: alert dialogs, the login flow, and
//! tapp loading.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

/// Blocking dialog host service.
pub trait DialogService {
    /// Shows an alert with `message`.
    fn alert(&self, message: &str);
}

/// Descriptor handed to a [`TappPresenter`] when a tapp becomes active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TappLaunch {
    /// Tapp id.
    pub tapp_id: i64,
    /// Display name.
    pub show_name: String,
    /// Content URL.
    pub url: String,
    /// Whether the tapp takes over the full page.
    pub exclusive_view: bool,
    /// Whether the access token should be posted to the tapp URL.
    pub post_access_token: bool,
}

/// Host service that renders the login flow or a tapp.
pub trait TappPresenter {
    /// Switches the page to the login flow.
    fn show_login(&self);

    /// Loads `tapp` into the page.
    fn load_tapp(&self, tapp: TappLaunch);
}

#[derive(Debug, Clone, Copy, Default)]
/// Dialog and tapp presenter that ignores every call.
pub struct NoopPresenter;

impl DialogService for NoopPresenter {
    fn alert(&self, _message: &str) {}
}

impl TappPresenter for NoopPresenter {
    fn show_login(&self) {}

    fn load_tapp(&self, _tapp: TappLaunch) {}
}

/// Surface change recorded by [`MemoryPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentedSurface {
    /// An alert dialog with its message.
    Alert(String),
    /// The login flow.
    Login,
    /// A loaded tapp.
    Tapp(TappLaunch),
}

#[derive(Debug, Clone, Default)]
/// Dialog and tapp presenter recording what would have been shown.
pub struct MemoryPresenter {
    shown: Rc<RefCell<Vec<PresentedSurface>>>,
}

impl MemoryPresenter {
    /// Returns the surfaces shown so far, in order.
    pub fn shown(&self) -> Vec<PresentedSurface> {
        self.shown.borrow().clone()
    }
}

impl DialogService for MemoryPresenter {
    fn alert(&self, message: &str) {
        self.shown
            .borrow_mut()
            .push(PresentedSurface::Alert(message.to_string()));
    }
}

impl TappPresenter for MemoryPresenter {
    fn show_login(&self) {
        self.shown.borrow_mut().push(PresentedSurface::Login);
    }

    fn load_tapp(&self, tapp: TappLaunch) {
        self.shown.borrow_mut().push(PresentedSurface::Tapp(tapp));
    }
}

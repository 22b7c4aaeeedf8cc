//! Host service bundle injected into the runtime.

use std::rc::Rc;

use crate::{
    DialogService, HttpClient, NavigationService, NoopHttpClient, NoopNavigationService,
    NoopPresenter, NoopRuntimeLogger, NoopSessionStore, RuntimeLogger, SessionStore,
    TappPresenter,
};

/// Runtime-selected host service bundle.
///
/// Environment-specific selection happens before this bundle crosses into `chayns_runtime`, which
/// keeps the startup logic free of browser adapter details.
#[derive(Clone)]
pub struct HostServices {
    /// Transport for backend requests.
    pub http: Rc<dyn HttpClient>,
    /// Access-token store.
    pub session: Rc<dyn SessionStore>,
    /// Structured log sink.
    pub logger: Rc<dyn RuntimeLogger>,
    /// Page navigation and tapp menu.
    pub navigation: Rc<dyn NavigationService>,
    /// Alert dialogs.
    pub dialogs: Rc<dyn DialogService>,
    /// Login flow and tapp loading.
    pub tapps: Rc<dyn TappPresenter>,
}

impl HostServices {
    /// Bundle of no-op services, useful as a base for partially mocked hosts.
    pub fn noop() -> Self {
        Self {
            http: Rc::new(NoopHttpClient),
            session: Rc::new(NoopSessionStore),
            logger: Rc::new(NoopRuntimeLogger),
            navigation: Rc::new(NoopNavigationService),
            dialogs: Rc::new(NoopPresenter),
            tapps: Rc::new(NoopPresenter),
        }
    }
}

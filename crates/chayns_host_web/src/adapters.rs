//! Browser wiring for [`HostServices`].

use std::rc::Rc;

use chayns_host::{HostServices, TappPresenter};

use crate::{
    WebConsoleLogger, WebDialogService, WebHttpClient, WebNavigationService, WebSessionStore,
};

/// Builds the browser host service bundle.
///
/// `navigation` is shared with the caller so the page can read the disabled tapp routes after
/// startup; `tapps` is the page's own presenter.
pub fn build_host_services(
    navigation: &WebNavigationService,
    tapps: Rc<dyn TappPresenter>,
) -> HostServices {
    HostServices {
        http: Rc::new(WebHttpClient),
        session: Rc::new(WebSessionStore),
        logger: Rc::new(WebConsoleLogger),
        navigation: Rc::new(navigation.clone()),
        dialogs: Rc::new(WebDialogService),
        tapps,
    }
}

use chayns_host::{TappLaunch, TappPresenter};
use leptos::{RwSignal, SignalSet};

/// What the page body currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Surface {
    /// Startup has not finished yet.
    Starting,
    /// The login flow.
    Login,
    /// A loaded tapp.
    Tapp(TappLaunch),
}

/// Tapp presenter that drives the page view through a reactive signal.
#[derive(Debug, Clone, Copy)]
pub struct SignalPresenter {
    surface: RwSignal<Surface>,
}

impl SignalPresenter {
    pub fn new(surface: RwSignal<Surface>) -> Self {
        Self { surface }
    }
}

impl TappPresenter for SignalPresenter {
    fn show_login(&self) {
        self.surface.set(Surface::Login);
    }

    fn load_tapp(&self, tapp: TappLaunch) {
        self.surface.set(Surface::Tapp(tapp));
    }
}

#[cfg(test)]
mod tests {
    use leptos::{create_rw_signal, SignalGetUntracked};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn presenter_switches_surface() {
        let runtime = leptos::create_runtime();
        let surface = create_rw_signal(Surface::Starting);
        let presenter = SignalPresenter::new(surface);

        presenter.show_login();
        assert_eq!(surface.get_untracked(), Surface::Login);

        let launch = TappLaunch {
            tapp_id: 12,
            show_name: "Chat".to_string(),
            url: "https://chat.tapp".to_string(),
            exclusive_view: true,
            post_access_token: false,
        };
        presenter.load_tapp(launch.clone());
        assert_eq!(surface.get_untracked(), Surface::Tapp(launch));
        runtime.dispose();
    }
}

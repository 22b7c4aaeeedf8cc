use std::rc::Rc;

use chayns_host::TappPresenter;
use chayns_host_web::WebNavigationService;
use chayns_runtime::{RuntimeInfo, Tapp};
use leptos::*;
use leptos_meta::*;

use crate::{
    boot::{load_runtime_config, menu_entries, publish, run_startup},
    presenter::{SignalPresenter, Surface},
};

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    let config = load_runtime_config();
    let login_tapp_id = config.login_tapp_id;
    let login_url = config.login_tapp_url.clone();
    let surface = create_rw_signal(Surface::Starting);
    let runtime = create_rw_signal::<Option<RuntimeInfo>>(None);
    let presenter = SignalPresenter::new(surface);
    let navigation = WebNavigationService::default();

    create_effect({
        let navigation = navigation.clone();
        move |_| {
            let config = config.clone();
            let navigation = navigation.clone();
            spawn_local(async move {
                let report = run_startup(config, &navigation, Rc::new(presenter)).await;
                runtime.set(report.runtime);
            });
        }
    });

    let select = move |tapp: Tapp| {
        runtime.update(|info| {
            if let Some(info) = info {
                info.set_selected_tapp(&tapp);
                publish(info);
            }
        });
        presenter.load_tapp(tapp.launch());
    };

    let menu = move || {
        runtime.with(|info| {
            info.as_ref()
                .map(|info| menu_entries(&info.tapps, &navigation, login_tapp_id))
                .unwrap_or_default()
        })
    };
    let title = move || {
        runtime.with(|info| {
            info.as_ref()
                .map(|info| info.location_name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "chayns".to_string())
        })
    };
    let exclusive = move || runtime.with(|info| info.as_ref().is_some_and(|info| info.exclusive_mode));

    view! {
        <Title text=title />
        <Meta name="description" content="chayns web runtime" />

        <main class="chayns-root" class:exclusive=exclusive>
            <nav class="chayns-menu" aria-label="Tapps">
                <For
                    each=menu
                    key=|tapp| tapp.id
                    children=move |tapp: Tapp| {
                        let label = tapp.show_name.clone();
                        view! {
                            <button type="button" on:click=move |_| select(tapp.clone())>
                                {label}
                            </button>
                        }
                    }
                />
            </nav>
            <section class="chayns-surface">
                {move || match surface.get() {
                    Surface::Starting => {
                        view! { <p class="chayns-status">"Loading..."</p> }.into_view()
                    }
                    Surface::Login => {
                        view! {
                            <iframe class="chayns-login" src=login_url.clone() title="Login"></iframe>
                        }
                            .into_view()
                    }
                    Surface::Tapp(launch) if launch.url.is_empty() => {
                        view! { <p class="chayns-status">{launch.show_name}</p> }.into_view()
                    }
                    Surface::Tapp(launch) => {
                        view! {
                            <iframe
                                class="chayns-tapp"
                                class:exclusive=launch.exclusive_view
                                src=launch.url
                                title=launch.show_name
                            ></iframe>
                        }
                            .into_view()
                    }
                }}
            </section>
        </main>
    }
}

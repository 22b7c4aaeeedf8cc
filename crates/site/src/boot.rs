//! Page-ready startup glue between the browser adapters and the runtime.

use std::{collections::BTreeSet, rc::Rc};

use chayns_host::{NavigationService, TappPresenter};
use chayns_host_web::{
    apply_color_variable, build_host_services, current_page_context, publish_runtime_info,
    WebNavigationService,
};
use chayns_runtime::{RuntimeConfig, RuntimeInfo, StartupController, StartupReport, Tapp};
use leptos::logging;

/// Id of the optional inline `<script type="application/json">` block overriding the defaults.
pub(crate) const CONFIG_ELEMENT_ID: &str = "chayns-runtime-config";

pub(crate) fn load_runtime_config() -> RuntimeConfig {
    parse_runtime_config(inline_config_json().as_deref())
}

fn inline_config_json() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()?
            .document()?
            .get_element_by_id(CONFIG_ELEMENT_ID)?
            .text_content()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = CONFIG_ELEMENT_ID;
        None
    }
}

fn parse_runtime_config(raw: Option<&str>) -> RuntimeConfig {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return RuntimeConfig::default();
    };
    RuntimeConfig::from_json_str(raw).unwrap_or_else(|err| {
        logging::warn!("inline runtime config ignored: {err}");
        RuntimeConfig::default()
    })
}

/// Runs the startup sequence once against the browser host.
pub(crate) async fn run_startup(
    config: RuntimeConfig,
    navigation: &WebNavigationService,
    presenter: Rc<dyn TappPresenter>,
) -> StartupReport {
    let services = build_host_services(navigation, presenter);
    let report = StartupController::new(services, config, current_page_context())
        .run()
        .await;
    logging::log!("chayns startup finished: {:?}", report.outcome);

    if let Some(info) = report.runtime.as_ref() {
        publish(info);
        if let Err(err) = apply_color_variable(&info.color) {
            logging::warn!("apply location color failed: {err}");
        }
    }
    report
}

/// Republishes `info` as `window.chaynsInfo`, together with its `getGlobalData()` accessor.
pub(crate) fn publish(info: &RuntimeInfo) {
    if let Err(err) = publish_runtime_info(info, &info.global_data()) {
        logging::warn!("publish chaynsInfo failed: {err}");
    }
}

/// Tapps shown in the navigation menu, in list order. Only the first entry per id is kept.
pub(crate) fn menu_entries(
    tapps: &[Tapp],
    navigation: &dyn NavigationService,
    login_tapp_id: i64,
) -> Vec<Tapp> {
    let mut seen = BTreeSet::new();
    tapps
        .iter()
        .filter(|tapp| {
            !tapp.hide_from_menu
                && tapp.id != login_tapp_id
                && !navigation.is_tapp_disabled(tapp.id)
                && seen.insert(tapp.id)
        })
        .cloned()
        .collect()
}

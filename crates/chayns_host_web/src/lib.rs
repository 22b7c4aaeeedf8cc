//! Browser (`wasm32`) implementations of the [`chayns_host`] service contracts.
//!
//! Every adapter compiles on native targets too; there it degrades to a quiet fallback so the
//! workspace builds and tests without a browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Assembles the browser [`chayns_host::HostServices`] bundle.
pub mod adapters;
pub mod dialogs;
pub mod http;
pub mod logger;
pub mod navigation;
pub mod page;
pub mod storage;

pub use adapters::build_host_services;
pub use dialogs::WebDialogService;
pub use http::WebHttpClient;
pub use logger::WebConsoleLogger;
pub use navigation::WebNavigationService;
pub use page::{
    apply_color_variable, current_page_context, publish_runtime_info, publish_window_value,
    COLOR_CSS_VARIABLE, GLOBAL_DATA_ACCESSOR, RUNTIME_INFO_GLOBAL,
};
pub use storage::local_session::WebSessionStore;

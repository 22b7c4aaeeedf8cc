//! Typed host contracts shared by the chayns runtime and its browser adapters.
//!
//! This crate is the API-first boundary for everything the startup sequence does not own: backend
//! transport, the access-token store, structured logging, page navigation, and the dialog/tapp
//! surfaces. Concrete browser adapters live in `chayns_host_web`; the in-memory adapters here back
//! deterministic tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod http;
pub mod logger;
pub mod navigation;
pub mod page;
pub mod presenter;
pub mod session;
pub mod time;

pub use host::HostServices;
pub use http::{
    HttpClient, HttpFuture, HttpResponse, MemoryHttpClient, NoopHttpClient, STATUS_NO_CONTENT,
};
pub use logger::{
    LogEntry, LogException, LogLevel, MemoryRuntimeLogger, NoopRuntimeLogger, RuntimeLogger,
};
pub use navigation::{MemoryNavigationService, NavigationService, NoopNavigationService};
pub use page::PageContext;
pub use presenter::{
    DialogService, MemoryPresenter, NoopPresenter, PresentedSurface, TappLaunch, TappPresenter,
};
pub use session::{
    MemorySessionStore, NoopSessionStore, SessionStore, SessionStoreFuture, ACCESS_TOKEN_KEY,
};
pub use time::unix_time_ms_now;

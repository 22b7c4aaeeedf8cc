//! chayns web runtime: access-token decoding, location bootstrap, and the page startup sequence.
//!
//! Host interaction goes through [`chayns_host::HostServices`]; browser wiring lives in
//! `chayns_host_web` and the `site` entry crate.

pub mod bootstrap;
pub mod config;
mod de;
mod diagnostics;
pub mod error;
pub mod model;
pub mod session;
pub mod startup;
pub mod tapp_tree;
pub mod token;
pub mod url_params;

pub use bootstrap::{LocationBootstrapper, RuntimeSlot, TappListOutcome};
pub use config::RuntimeConfig;
pub use error::BootstrapError;
pub use model::{
    normalize_color, AppInfo, AppUser, GlobalData, LocationDesign, LocationSettings, RuntimeInfo,
    SelectedTapp, UserSession,
};
pub use session::update_session;
pub use startup::{LoginReason, StartupController, StartupOutcome, StartupReport, StartupState};
pub use tapp_tree::{find_tapp, flatten_tapps, Tapp, TappNode};
pub use token::{decode_access_token, validate_access_token, AccessTokenPayload};
pub use url_params::{parse_url_parameters, UrlParameters};

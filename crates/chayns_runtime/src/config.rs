//! Runtime configuration: backend endpoint, fallback ids, and well-known tapps.

use serde::{Deserialize, Serialize};

/// Production chayns backend.
pub const DEFAULT_BACKEND_URL: &str = "https://chaynssvc.tobit.com/v0.5";
/// Location used when the URL names none.
pub const DEFAULT_LOCATION_ID: i64 = 77783;
/// Tapp used when the URL names none.
pub const DEFAULT_TAPP_ID: i64 = -2;
/// Id of the synthetic login tapp appended to every tapp list.
pub const LOGIN_TAPP_ID: i64 = -1;
/// Intercom tapp, hidden for accounting (`tobitBuha`) tokens.
pub const INTERCOM_TAPP_ID: i64 = 251441;
/// Runtime version reported to tapps.
pub const RUNTIME_VERSION: &str = "4014";

/// Runtime configuration.
///
/// Every field is optional in serialized form; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Base URL of the location/tapp backend, without trailing slash.
    pub backend_url: String,
    /// Location used when the URL names none.
    pub default_location_id: i64,
    /// Tapp used when the URL names none.
    pub default_tapp_id: i64,
    /// Id of the synthetic login tapp.
    pub login_tapp_id: i64,
    /// URL the login tapp loads.
    pub login_tapp_url: String,
    /// Tapp disabled for `tobitBuha` tokens.
    pub intercom_tapp_id: i64,
    /// Version string exposed through `RuntimeInfo`.
    pub version: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            default_location_id: DEFAULT_LOCATION_ID,
            default_tapp_id: DEFAULT_TAPP_ID,
            login_tapp_id: LOGIN_TAPP_ID,
            login_tapp_url: "https://login.chayns.net/".to_string(),
            intercom_tapp_id: INTERCOM_TAPP_ID,
            version: RUNTIME_VERSION.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parses a JSON override block.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not a JSON object of config fields.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.backend_url = config.backend_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// `GET` endpoint for a location's settings.
    pub fn location_settings_url(&self, location_id: i64) -> String {
        format!("{}/{location_id}/LocationSettings", self.backend_url)
    }

    /// `GET` endpoint for a location's web tapp tree.
    pub fn tapps_url(&self, location_id: i64) -> String {
        format!("{}/{location_id}/Tapp?forWeb=true", self.backend_url)
    }

    /// Numeric runtime version, `2` when the version string is not numeric.
    pub fn numeric_version(&self) -> i64 {
        self.version.parse().unwrap_or(2)
    }
}

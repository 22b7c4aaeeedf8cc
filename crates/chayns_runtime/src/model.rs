//! Runtime info model exposed to tapps.
//!
//! Serialized names follow the `chaynsInfo` object tapps read from the page (`LocationID`,
//! `Tapps`, `User`, ...), so a serialized [`RuntimeInfo`] can be published as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::RuntimeConfig,
    de::{lenient_i64, lenient_string, null_as_default},
    tapp_tree::Tapp,
    token::AccessTokenPayload,
};

/// Color used when the backend design carries none.
pub const DEFAULT_COLOR: &str = "#6E6E6E";

/// Branding block of [`LocationSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationDesign {
    /// Main color, usually a bare hex string.
    #[serde(deserialize_with = "lenient_string")]
    pub color: String,
    /// Color mode id.
    #[serde(deserialize_with = "lenient_i64")]
    pub color_mode: i64,
}

/// Location settings returned by `GET {backend}/{locationId}/LocationSettings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationSettings {
    /// Site id, e.g. `67758-09144`.
    #[serde(deserialize_with = "lenient_string")]
    pub site_id: String,
    /// Display name of the location.
    #[serde(deserialize_with = "lenient_string")]
    pub location_name: String,
    /// Person id owning the location.
    #[serde(deserialize_with = "lenient_string")]
    pub location_person_id: String,
    /// Facebook app id.
    #[serde(deserialize_with = "lenient_string")]
    pub facebook_app_id: String,
    /// Facebook page id.
    #[serde(deserialize_with = "lenient_string")]
    pub facebook_id: String,
    /// Branding.
    #[serde(deserialize_with = "null_as_default")]
    pub design: LocationDesign,
}

/// Prefixes bare hex colors with `#`; other values are kept as they are.
///
/// Blank input resolves to [`DEFAULT_COLOR`].
pub fn normalize_color(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_COLOR.to_string();
    }
    let is_bare_hex = matches!(raw.len(), 3 | 4 | 6 | 8) && raw.chars().all(|c| c.is_ascii_hexdigit());
    if is_bare_hex {
        format!("#{raw}")
    } else {
        raw.to_string()
    }
}

/// Identity of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserSession {
    /// Tobit user id, `0` for anonymous users.
    #[serde(rename = "ID")]
    pub id: i64,
    /// First name.
    #[serde(rename = "FirstName")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "LastName")]
    pub last_name: String,
    /// Person id.
    #[serde(rename = "PersonID")]
    pub person_id: String,
    /// Facebook user id, only exposed through [`AppUser`].
    #[serde(skip)]
    pub facebook_user_id: String,
    /// Raw access token the identity was read from.
    #[serde(rename = "TobitAccessToken")]
    pub access_token: Option<String>,
    /// UAC group memberships. Never resolved by the runtime.
    #[serde(rename = "UACGroups")]
    pub uac_groups: Vec<i64>,
}

impl UserSession {
    /// Builds the session for `access_token`; a missing payload yields an anonymous user.
    pub fn from_token(access_token: Option<String>, payload: Option<&AccessTokenPayload>) -> Self {
        let payload = payload.cloned().unwrap_or_default();
        Self {
            id: payload.tobit_user_id,
            first_name: payload.first_name,
            last_name: payload.last_name,
            person_id: payload.person_id,
            facebook_user_id: payload.facebook_user_id,
            access_token,
            uac_groups: Vec::new(),
        }
    }

    /// `"First Last"` when both names are present, otherwise empty.
    pub fn display_name(&self) -> String {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            String::new()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Tapp fields copied into [`RuntimeInfo`] while the tapp is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectedTapp {
    pub id: i64,
    pub internal_name: String,
    pub show_name: String,
    #[serde(rename = "SortID")]
    pub sort_id: i64,
    pub exclusive_mode: bool,
    pub load_as_ajax: bool,
    pub url: String,
    pub link: String,
    pub send_authentication_header: bool,
    pub post_tobit_access_token: bool,
    pub user_group_ids: Vec<i64>,
    pub hide_from_menu: bool,
    pub mobile: bool,
    pub desktop: bool,
    pub show_only_in_admin_mode: bool,
    pub icon: String,
    pub fallback_tapp: Option<i64>,
    #[serde(rename = "isExclusiveView")]
    pub is_exclusive_view: bool,
}

impl From<&Tapp> for SelectedTapp {
    fn from(tapp: &Tapp) -> Self {
        Self {
            id: tapp.id,
            internal_name: tapp.internal_name.clone(),
            show_name: tapp.show_name.clone(),
            sort_id: tapp.sort_id,
            exclusive_mode: tapp.exclusive_view,
            load_as_ajax: tapp.load_as_ajax,
            url: tapp.url.clone(),
            link: tapp.link.clone(),
            send_authentication_header: tapp.send_authentication_header,
            post_tobit_access_token: tapp.post_tobit_access_token,
            user_group_ids: tapp.uac_group_ids.clone(),
            hide_from_menu: tapp.hide_from_menu,
            mobile: tapp.mobile,
            desktop: tapp.desktop,
            show_only_in_admin_mode: tapp.show_only_in_admin_mode,
            icon: tapp.icon.clone(),
            fallback_tapp: tapp.fallback_tapp,
            is_exclusive_view: tapp.is_exclusive_view,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Webshadow {
    pub menu_position: i64,
}

/// Page-session state consumed by tapps and UI collaborators.
///
/// Created by a successful location bootstrap; later mutated by the session updater, the tapp
/// fetch, and tapp selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuntimeInfo {
    pub version: String,
    pub base_url: String,
    #[serde(rename = "LocationID")]
    pub location_id: i64,
    #[serde(rename = "SiteID")]
    pub site_id: String,
    pub location_name: String,
    pub is_mobile: bool,
    pub exclusive_mode: bool,
    pub is_facebook: bool,
    /// Flattened tapps, login tapp last once tapps are loaded.
    pub tapps: Vec<Tapp>,
    #[serde(rename = "LocationPersonID")]
    pub location_person_id: String,
    pub domain: String,
    pub color_mode: i64,
    pub color: String,
    pub webshadow: Webshadow,
    pub user: UserSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_tapp: Option<SelectedTapp>,
    #[serde(skip)]
    pub facebook_app_id: String,
    #[serde(skip)]
    pub facebook_page_id: String,
    #[serde(skip)]
    pub current_url: String,
    #[serde(skip)]
    numeric_version: i64,
}

/// Location, color, and page fields needed to create a [`RuntimeInfo`].
#[derive(Debug, Clone)]
pub struct RuntimeInfoSeed<'a> {
    pub config: &'a RuntimeConfig,
    pub location_id: i64,
    pub settings: &'a LocationSettings,
    pub color: String,
    pub color_mode: i64,
    pub href: &'a str,
    pub host: &'a str,
    pub is_facebook: bool,
}

impl RuntimeInfo {
    /// Creates runtime info for a freshly fetched location, with an anonymous user and no tapps.
    pub fn new(seed: RuntimeInfoSeed<'_>) -> Self {
        Self {
            version: seed.config.version.clone(),
            base_url: "/".to_string(),
            location_id: seed.location_id,
            site_id: seed.settings.site_id.clone(),
            location_name: seed.settings.location_name.clone(),
            is_mobile: false,
            exclusive_mode: false,
            is_facebook: seed.is_facebook,
            tapps: Vec::new(),
            location_person_id: seed.settings.location_person_id.clone(),
            domain: seed.host.to_string(),
            color_mode: seed.color_mode,
            color: seed.color,
            webshadow: Webshadow::default(),
            user: UserSession::default(),
            selected_tapp: None,
            facebook_app_id: seed.settings.facebook_app_id.clone(),
            facebook_page_id: seed.settings.facebook_id.clone(),
            current_url: seed.href.to_string(),
            numeric_version: seed.config.numeric_version(),
        }
    }

    /// Marks `tapp` as the active tapp.
    pub fn set_selected_tapp(&mut self, tapp: &Tapp) {
        self.exclusive_mode = tapp.exclusive_view;
        self.selected_tapp = Some(SelectedTapp::from(tapp));
    }

    /// Builds the global data object handed to tapps on request.
    pub fn global_data(&self) -> GlobalData {
        GlobalData {
            app_user: AppUser {
                uac_groups: self.user.uac_groups.clone(),
                facebook_access_token: String::new(),
                facebook_user_name: self.user.display_name(),
                facebook_id: self.user.facebook_user_id.clone(),
                person_id: self.user.person_id.clone(),
                tobit_user_id: self.user.id,
                tobit_access_token: self.user.access_token.clone(),
                admin_mode: false,
            },
            device: Map::new(),
            app_info: AppInfo {
                version: self.numeric_version,
                domain: self.domain.clone(),
                tapps: self.tapps.clone(),
                tapp_selected: self.selected_tapp.clone(),
                facebook_app_id: self.facebook_app_id.clone(),
                facebook_page_id: self.facebook_page_id.clone(),
                title: self.location_name.clone(),
                current_url: self.current_url.clone(),
                site_id: self.site_id.clone(),
                location_id: self.location_id,
                is_color_scheme_dark: false,
                color_mode: self.color_mode,
                color: self.color.clone(),
            },
        }
    }
}

/// Global data object (`getGlobalData()`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalData {
    pub app_user: AppUser,
    pub device: Map<String, Value>,
    pub app_info: AppInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppUser {
    #[serde(rename = "UACGroups")]
    pub uac_groups: Vec<i64>,
    pub facebook_access_token: String,
    pub facebook_user_name: String,
    #[serde(rename = "FacebookID")]
    pub facebook_id: String,
    #[serde(rename = "PersonID")]
    pub person_id: String,
    #[serde(rename = "TobitUserID")]
    pub tobit_user_id: i64,
    pub tobit_access_token: Option<String>,
    pub admin_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppInfo {
    pub version: i64,
    #[serde(rename = "domain")]
    pub domain: String,
    pub tapps: Vec<Tapp>,
    pub tapp_selected: Option<SelectedTapp>,
    #[serde(rename = "FacebookAppID")]
    pub facebook_app_id: String,
    #[serde(rename = "FacebookPageID")]
    pub facebook_page_id: String,
    pub title: String,
    pub current_url: String,
    #[serde(rename = "SiteID")]
    pub site_id: String,
    #[serde(rename = "LocationID")]
    pub location_id: i64,
    pub is_color_scheme_dark: bool,
    #[serde(rename = "colorMode")]
    pub color_mode: i64,
    #[serde(rename = "color")]
    pub color: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn info() -> RuntimeInfo {
        let config = RuntimeConfig::default();
        let settings = LocationSettings {
            site_id: "67758-09144".to_string(),
            location_name: "David by Tobit.Software".to_string(),
            location_person_id: "141-24297".to_string(),
            facebook_app_id: "1507743286201238".to_string(),
            facebook_id: "336898073182458".to_string(),
            design: LocationDesign {
                color: "6E6E6E".to_string(),
                color_mode: 0,
            },
        };
        RuntimeInfo::new(RuntimeInfoSeed {
            config: &config,
            location_id: 77783,
            settings: &settings,
            color: normalize_color(&settings.design.color),
            color_mode: settings.design.color_mode,
            href: "https://chayns.net/?locationid=77783",
            host: "chayns.net",
            is_facebook: false,
        })
    }

    #[test]
    fn normalizes_bare_hex_colors_only() {
        assert_eq!(normalize_color("ABCDEF"), "#ABCDEF");
        assert_eq!(normalize_color("fff"), "#fff");
        assert_eq!(normalize_color("#ABCDEF"), "#ABCDEF");
        assert_eq!(normalize_color("rgb(1,2,3)"), "rgb(1,2,3)");
        assert_eq!(normalize_color(""), DEFAULT_COLOR);
    }

    #[test]
    fn settings_tolerate_numeric_ids_and_null_design() {
        let settings: LocationSettings = serde_json::from_value(serde_json::json!({
            "siteId": "1-2",
            "facebookAppId": 1507743286201238i64,
            "design": null
        }))
        .expect("settings");
        assert_eq!(settings.facebook_app_id, "1507743286201238");
        assert_eq!(settings.design, LocationDesign::default());
    }

    #[test]
    fn selecting_a_tapp_copies_fields_and_exclusive_mode() {
        let mut info = info();
        let tapp = Tapp {
            id: 12,
            show_name: "Chat".to_string(),
            exclusive_view: true,
            uac_group_ids: vec![1, 2],
            ..Default::default()
        };
        info.set_selected_tapp(&tapp);

        assert!(info.exclusive_mode);
        let selected = info.selected_tapp.clone().expect("selected");
        assert_eq!(selected.id, 12);
        assert_eq!(selected.user_group_ids, vec![1, 2]);
        assert_eq!(info.global_data().app_info.tapp_selected, Some(selected));
    }

    #[test]
    fn global_data_mirrors_location_and_user() {
        let mut info = info();
        info.user = UserSession {
            id: 1234,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            person_id: "131-1".to_string(),
            facebook_user_id: "99".to_string(),
            access_token: Some("a.b.c".to_string()),
            uac_groups: Vec::new(),
        };
        let global = info.global_data();
        assert_eq!(global.app_info.version, 4014);
        assert_eq!(global.app_info.title, "David by Tobit.Software");
        assert_eq!(global.app_info.color, "#6E6E6E");
        assert_eq!(global.app_user.facebook_user_name, "Ada Lovelace");
        assert_eq!(global.app_user.facebook_id, "99");
        assert_eq!(global.app_user.tobit_user_id, 1234);
    }

    #[test]
    fn global_data_serializes_with_accessor_field_names() {
        let mut info = info();
        info.set_selected_tapp(&Tapp {
            id: 12,
            show_name: "Chat".to_string(),
            ..Default::default()
        });

        let json = serde_json::to_value(info.global_data()).expect("serialize");
        assert_eq!(json["AppInfo"]["LocationID"], 77783);
        assert_eq!(json["AppInfo"]["TappSelected"]["Id"], 12);
        assert_eq!(json["AppInfo"]["TappSelected"]["ShowName"], "Chat");
        assert_eq!(json["AppUser"]["TobitUserID"], 0);
        assert_eq!(json["Device"], serde_json::json!({}));
    }

    #[test]
    fn serializes_with_runtime_info_field_names() {
        let json = serde_json::to_value(info()).expect("serialize");
        assert_eq!(json["LocationID"], 77783);
        assert_eq!(json["SiteID"], "67758-09144");
        assert_eq!(json["Color"], "#6E6E6E");
        assert_eq!(json["User"]["ID"], 0);
        assert!(json.get("SelectedTapp").is_none());
        assert!(json.get("FacebookAppId").is_none());
    }
}

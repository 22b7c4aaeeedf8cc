//! Location bootstrap: fetches location settings and the tapp tree and assembles
//! [`RuntimeInfo`].
//!
//! Every failure is caught here. Callers only ever see a `bool` or a [`TappListOutcome`]; the
//! detail goes to the host logger.

use chayns_host::{HostServices, LogEntry, PageContext, STATUS_NO_CONTENT};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    config::RuntimeConfig,
    diagnostics,
    error::BootstrapError,
    model::{normalize_color, LocationSettings, RuntimeInfo, RuntimeInfoSeed},
    session::update_session,
    tapp_tree::{flatten_tapps, Tapp, TappNode},
    url_params::{UrlParameters, PARAM_COLOR, PARAM_COLOR_MODE},
};

const FILE_NAME: &str = "bootstrap";

/// Holder for the page's [`RuntimeInfo`]; `None` until a location bootstrap succeeds.
pub type RuntimeSlot = Option<RuntimeInfo>;

#[derive(Deserialize)]
struct BackendEnvelope<T> {
    data: Option<T>,
}

/// How the tapp list was obtained. Every variant leaves at least the login tapp in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TappListOutcome {
    /// Backend returned a tapp tree with this many leaves.
    Loaded(usize),
    /// Backend answered `204`; the location has no tapps.
    NoContent,
    /// Request or decoding failed; treated as an empty tree.
    Failed,
}

/// Runs the location bootstrap steps against the injected host services.
pub struct LocationBootstrapper<'a> {
    services: &'a HostServices,
    config: &'a RuntimeConfig,
    page: &'a PageContext,
    params: &'a UrlParameters,
}

impl<'a> LocationBootstrapper<'a> {
    /// Creates a bootstrapper for one page session.
    pub fn new(
        services: &'a HostServices,
        config: &'a RuntimeConfig,
        page: &'a PageContext,
        params: &'a UrlParameters,
    ) -> Self {
        Self {
            services,
            config,
            page,
            params,
        }
    }

    /// Fetches settings for `location_id` and replaces `slot` with fresh runtime info.
    ///
    /// Returns `false` and leaves `slot` untouched when the location does not exist or the
    /// request fails. The user-session refresh is best effort and never fails the bootstrap.
    pub async fn bootstrap_location(&self, slot: &mut RuntimeSlot, location_id: i64) -> bool {
        let settings = match self.fetch_location_settings(location_id).await {
            Ok(settings) => settings,
            Err(BootstrapError::NotFound) => {
                diagnostics::warning(
                    self.services,
                    LogEntry::new("No location found.")
                        .location_id(location_id)
                        .source(FILE_NAME, "loadLocation"),
                );
                return false;
            }
            Err(err) => {
                diagnostics::error(
                    self.services,
                    LogEntry::new("Load location failed.")
                        .location_id(location_id)
                        .source(FILE_NAME, "loadLocation")
                        .exception(err.to_string()),
                );
                return false;
            }
        };

        let color = normalize_color(
            self.params
                .get_non_empty(PARAM_COLOR)
                .unwrap_or(settings.design.color.as_str()),
        );
        let color_mode = self
            .params
            .get_int(PARAM_COLOR_MODE)
            .unwrap_or(settings.design.color_mode);

        let mut info = RuntimeInfo::new(RuntimeInfoSeed {
            config: self.config,
            location_id,
            settings: &settings,
            color,
            color_mode,
            href: &self.page.href,
            host: &self.page.host,
            is_facebook: self.page.is_facebook(),
        });
        if let Some(previous) = slot.as_ref() {
            info.user = previous.user.clone();
        }

        update_session(self.services, &mut info).await;

        *slot = Some(info);
        true
    }

    /// Loads the tapp tree for `info`'s location and stores the flattened list in `info.tapps`.
    ///
    /// `info.tapps` always ends with the login tapp, whatever the backend answered.
    pub async fn bootstrap_tapps(&self, info: &mut RuntimeInfo) -> TappListOutcome {
        let location_id = info.location_id;
        let (nodes, degraded) = match self.fetch_tapp_tree(location_id).await {
            Ok(nodes) => (nodes, None),
            Err(BootstrapError::NotFound) => {
                diagnostics::warning(
                    self.services,
                    LogEntry::new("Location has no tapps.")
                        .location_id(location_id)
                        .custom_number(i64::from(STATUS_NO_CONTENT))
                        .source(FILE_NAME, "loadTapps"),
                );
                (Vec::new(), Some(TappListOutcome::NoContent))
            }
            Err(err) => {
                let mut entry = LogEntry::new("Load Tapps failed.")
                    .location_id(location_id)
                    .source(FILE_NAME, "loadTapps")
                    .exception(err.to_string());
                if let BootstrapError::Status(status) = err {
                    entry = entry.custom_number(i64::from(status));
                }
                diagnostics::error(self.services, entry);
                (Vec::new(), Some(TappListOutcome::Failed))
            }
        };

        info.tapps = flatten_tapps(&nodes, &Tapp::login(self.config));
        degraded.unwrap_or(TappListOutcome::Loaded(info.tapps.len() - 1))
    }

    /// Fetches the settings of `location_id`.
    ///
    /// # Errors
    ///
    /// [`BootstrapError::NotFound`] on `204`, otherwise transport, status, or decode errors.
    pub async fn fetch_location_settings(
        &self,
        location_id: i64,
    ) -> Result<LocationSettings, BootstrapError> {
        self.get_data(&self.config.location_settings_url(location_id))
            .await?
            .ok_or_else(|| BootstrapError::Decode("location settings without data".to_string()))
    }

    async fn fetch_tapp_tree(&self, location_id: i64) -> Result<Vec<TappNode>, BootstrapError> {
        Ok(self
            .get_data(&self.config.tapps_url(location_id))
            .await?
            .unwrap_or_default())
    }

    async fn get_data<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, BootstrapError> {
        let response = self
            .services
            .http
            .get(url)
            .await
            .map_err(BootstrapError::Transport)?;
        if response.is_no_content() {
            return Err(BootstrapError::NotFound);
        }
        if !response.is_success() {
            return Err(BootstrapError::Status(response.status));
        }
        let envelope: BackendEnvelope<T> = response.json().map_err(BootstrapError::Decode)?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chayns_host::{HttpResponse, LogLevel, MemoryHttpClient, MemoryRuntimeLogger};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{config::LOGIN_TAPP_ID, url_params::parse_url_parameters};

    struct Fixture {
        services: HostServices,
        http: MemoryHttpClient,
        logger: MemoryRuntimeLogger,
        config: RuntimeConfig,
        page: PageContext,
    }

    impl Fixture {
        fn new(href: &str) -> Self {
            let http = MemoryHttpClient::default();
            let logger = MemoryRuntimeLogger::default();
            let mut services = HostServices::noop();
            services.http = Rc::new(http.clone());
            services.logger = Rc::new(logger.clone());
            Self {
                services,
                http,
                logger,
                config: RuntimeConfig::default(),
                page: PageContext::from_href(href),
            }
        }

        fn settings_url(&self, location_id: i64) -> String {
            self.config.location_settings_url(location_id)
        }

        fn tapps_url(&self, location_id: i64) -> String {
            self.config.tapps_url(location_id)
        }

        fn bootstrap(&self, slot: &mut RuntimeSlot, location_id: i64) -> bool {
            let params = parse_url_parameters(&self.page.href);
            let bootstrapper =
                LocationBootstrapper::new(&self.services, &self.config, &self.page, &params);
            block_on(bootstrapper.bootstrap_location(slot, location_id))
        }

        fn load_tapps(&self, info: &mut RuntimeInfo) -> TappListOutcome {
            let params = parse_url_parameters(&self.page.href);
            let bootstrapper =
                LocationBootstrapper::new(&self.services, &self.config, &self.page, &params);
            block_on(bootstrapper.bootstrap_tapps(info))
        }
    }

    fn settings_body(color: &str) -> String {
        json!({
            "status": 200,
            "data": {
                "siteId": "67758-09144",
                "locationName": "David by Tobit.Software",
                "locationPersonId": "141-24297",
                "facebookAppId": "1507743286201238",
                "facebookId": "336898073182458",
                "design": { "color": color, "colorMode": 1 }
            }
        })
        .to_string()
    }

    fn bootstrapped(fixture: &Fixture) -> RuntimeInfo {
        fixture
            .http
            .respond(fixture.settings_url(1214), HttpResponse::new(200, settings_body("ABCDEF")));
        let mut slot = None;
        assert!(fixture.bootstrap(&mut slot, 1214));
        slot.expect("runtime info")
    }

    #[test]
    fn no_content_location_leaves_slot_unset() {
        let fixture = Fixture::new("https://chayns.net/?locationid=1214&tappid=1");
        fixture
            .http
            .respond(fixture.settings_url(1214), HttpResponse::no_content());

        let mut slot = None;
        assert!(!fixture.bootstrap(&mut slot, 1214));
        assert!(slot.is_none());
        assert!(fixture.logger.contains(LogLevel::Warning, "No location found."));
        assert!(fixture.logger.entries_at(LogLevel::Error).is_empty());
    }

    #[test]
    fn transport_failure_leaves_previous_info_in_place() {
        let fixture = Fixture::new("https://chayns.net/");
        let previous = bootstrapped(&fixture);
        fixture.http.fail(fixture.settings_url(99), "offline");

        let mut slot = Some(previous.clone());
        assert!(!fixture.bootstrap(&mut slot, 99));
        assert_eq!(slot, Some(previous));
        assert!(fixture.logger.contains(LogLevel::Error, "Load location failed."));
    }

    #[test]
    fn server_errors_and_bad_json_fail_the_bootstrap() {
        let fixture = Fixture::new("https://chayns.net/");
        fixture
            .http
            .respond(fixture.settings_url(1), HttpResponse::new(500, "oops"))
            .respond(fixture.settings_url(2), HttpResponse::new(200, "<html>"))
            .respond(fixture.settings_url(3), HttpResponse::new(200, "{\"status\":200}"));

        for location_id in 1..=3 {
            let mut slot = None;
            assert!(!fixture.bootstrap(&mut slot, location_id));
            assert!(slot.is_none());
        }
        assert_eq!(fixture.logger.entries_at(LogLevel::Error).len(), 3);
    }

    #[test]
    fn populates_location_fields_and_normalizes_color() {
        let fixture = Fixture::new("https://chayns.net/?locationid=1214&tappid=1");
        let info = bootstrapped(&fixture);

        assert_eq!(info.location_id, 1214);
        assert_eq!(info.site_id, "67758-09144");
        assert_eq!(info.location_name, "David by Tobit.Software");
        assert_eq!(info.location_person_id, "141-24297");
        assert_eq!(info.color, "#ABCDEF");
        assert_eq!(info.color_mode, 1);
        assert_eq!(info.domain, "chayns.net");
        assert!(info.tapps.is_empty());
    }

    #[test]
    fn url_color_overrides_take_precedence() {
        let fixture = Fixture::new("https://chayns.net/?color=%23112233&colormode=2");
        let info = bootstrapped(&fixture);
        assert_eq!(info.color, "#112233");
        assert_eq!(info.color_mode, 2);
    }

    #[test]
    fn invalid_color_mode_override_falls_back_to_backend() {
        let fixture = Fixture::new("https://chayns.net/?colormode=dark");
        assert_eq!(bootstrapped(&fixture).color_mode, 1);
    }

    #[test]
    fn flattens_loaded_tapps_with_login_last() {
        let fixture = Fixture::new("https://chayns.net/");
        let mut info = bootstrapped(&fixture);
        fixture.http.respond(
            fixture.tapps_url(1214),
            HttpResponse::new(
                200,
                json!({
                    "status": 200,
                    "data": [
                        { "type": 2, "tapps": [{ "type": 1, "id": 10 }, { "type": 1, "id": 11 }] },
                        { "type": 1, "id": 12 }
                    ]
                })
                .to_string(),
            ),
        );

        assert_eq!(fixture.load_tapps(&mut info), TappListOutcome::Loaded(3));
        let ids: Vec<i64> = info.tapps.iter().map(|tapp| tapp.id).collect();
        assert_eq!(ids, vec![10, 11, 12, LOGIN_TAPP_ID]);
    }

    #[test]
    fn no_content_tapp_list_degrades_to_login_only() {
        let fixture = Fixture::new("https://chayns.net/");
        let mut info = bootstrapped(&fixture);
        fixture
            .http
            .respond(fixture.tapps_url(1214), HttpResponse::no_content());

        assert_eq!(fixture.load_tapps(&mut info), TappListOutcome::NoContent);
        assert_eq!(info.tapps, vec![Tapp::login(&fixture.config)]);
        assert!(fixture.logger.contains(LogLevel::Warning, "Location has no tapps."));
    }

    #[test]
    fn failed_tapp_list_degrades_to_login_only() {
        let fixture = Fixture::new("https://chayns.net/");
        let mut info = bootstrapped(&fixture);
        fixture
            .http
            .respond(fixture.tapps_url(1214), HttpResponse::new(502, ""));

        assert_eq!(fixture.load_tapps(&mut info), TappListOutcome::Failed);
        assert_eq!(info.tapps, vec![Tapp::login(&fixture.config)]);
        let errors = fixture.logger.entries_at(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].custom_number, Some(502));
    }

    #[test]
    fn missing_tapp_data_is_an_empty_tree() {
        let fixture = Fixture::new("https://chayns.net/");
        let mut info = bootstrapped(&fixture);
        fixture
            .http
            .respond(fixture.tapps_url(1214), HttpResponse::new(200, "{\"data\":null}"));

        assert_eq!(fixture.load_tapps(&mut info), TappListOutcome::Loaded(0));
        assert_eq!(info.tapps.len(), 1);
    }
}

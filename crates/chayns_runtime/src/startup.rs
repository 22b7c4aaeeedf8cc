//! Page-ready startup sequence.
//!
//! ```text
//! ParsingParams ──► Redirecting                          (terminal)
//!        │
//!        └────────► Bootstrapping ──► (bootstrap failed)  (terminal)
//!                        │
//!                        ├──► Authenticating              (terminal)
//!                        ├──► (alert shown)               (terminal)
//!                        └──► TappLoading                 (terminal)
//! ```
//!
//! Each run ends in exactly one [`StartupOutcome`]; nothing is retried.

use chayns_host::{HostServices, LogEntry, PageContext};

use crate::{
    bootstrap::{LocationBootstrapper, RuntimeSlot, TappListOutcome},
    config::RuntimeConfig,
    diagnostics,
    tapp_tree::find_tapp,
    token::{decode_access_token, validate_access_token, AccessTokenPayload, ROLE_TOBIT_BUHA},
    url_params::{
        parse_url_parameters, UrlParameters, PARAM_ACCESS_TOKEN, PARAM_FORCE_LOGIN,
        PARAM_LOCATION_ID, PARAM_TAPP_ID,
    },
};

const FILE_NAME: &str = "startup";
/// Legacy tapp id still found in old links; served by [`REMAPPED_TAPP_ID`].
const LEGACY_TAPP_ID: i64 = -7;
const REMAPPED_TAPP_ID: i64 = -2;

/// States the startup sequence passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupState {
    /// Reading the page URL.
    ParsingParams,
    /// Replacing the page with a corrected URL.
    Redirecting,
    /// Loading location settings, user session, and tapps.
    Bootstrapping,
    /// Handing off to the login flow.
    Authenticating,
    /// Handing off to the tapp presenter.
    TappLoading,
}

/// Why the login flow was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    /// `forcelogin` was present in the URL.
    ForceLogin,
    /// The requested tapp does not exist and nobody is signed in.
    NoTappFound,
    /// The login tapp itself was requested.
    LoginTapp,
    /// The requested tapp needs a signed-in user.
    RequiresLogin,
}

impl LoginReason {
    const fn label(self) -> &'static str {
        match self {
            Self::ForceLogin => "forcelogin",
            Self::NoTappFound => "no tapp found",
            Self::LoginTapp => "login tapp",
            Self::RequiresLogin => "requires login",
        }
    }
}

/// Terminal result of one startup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    /// Required parameters were missing; the page was sent to `url`.
    Redirected {
        /// Corrected URL.
        url: String,
    },
    /// The location could not be loaded. Already logged.
    BootstrapFailed {
        /// Location that failed.
        location_id: i64,
    },
    /// The tapp does not exist or is not visible to the signed-in user; an alert was shown.
    TappNotFound {
        /// Requested tapp id.
        tapp_id: i64,
    },
    /// The login flow was shown.
    LoginShown {
        /// Trigger.
        reason: LoginReason,
    },
    /// The tapp was handed to the presenter.
    TappLoaded {
        /// Loaded tapp id.
        tapp_id: i64,
    },
}

/// Result of [`StartupController::run`].
#[derive(Debug, Clone)]
pub struct StartupReport {
    /// How the run ended.
    pub outcome: StartupOutcome,
    /// Runtime info, set when the location bootstrap succeeded.
    pub runtime: RuntimeSlot,
    /// States visited, in order.
    pub states: Vec<StartupState>,
    /// Tapp list result, when tapps were fetched.
    pub tapp_list: Option<TappListOutcome>,
}

/// Ids requested by the page URL, before defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestedIds {
    location_id: Option<i64>,
    tapp_id: Option<i64>,
}

impl RequestedIds {
    fn from_params(params: &UrlParameters) -> Self {
        let tapp_id = params
            .get_int(PARAM_TAPP_ID)
            .filter(|id| *id != 0)
            .map(|id| if id == LEGACY_TAPP_ID { REMAPPED_TAPP_ID } else { id });
        let location_id = params.get_int(PARAM_LOCATION_ID).filter(|id| *id != 0);
        Self {
            location_id,
            tapp_id,
        }
    }
}

/// Drives one page session from URL parsing to login or tapp hand-off.
pub struct StartupController {
    services: HostServices,
    config: RuntimeConfig,
    page: PageContext,
}

impl StartupController {
    /// Creates a controller for the page described by `page`.
    pub fn new(services: HostServices, config: RuntimeConfig, page: PageContext) -> Self {
        Self {
            services,
            config,
            page,
        }
    }

    /// Runs the startup sequence once.
    pub async fn run(&self) -> StartupReport {
        let mut report = StartupReport {
            outcome: StartupOutcome::BootstrapFailed { location_id: 0 },
            runtime: None,
            states: vec![StartupState::ParsingParams],
            tapp_list: None,
        };

        let params = parse_url_parameters(&self.page.href);
        let requested = RequestedIds::from_params(&params);

        let mut entry = LogEntry::new("chayns runtime requested").source(FILE_NAME, "startup");
        if let Some(location_id) = requested.location_id {
            entry = entry.location_id(location_id);
        }
        if let Some(tapp_id) = requested.tapp_id {
            entry = entry.custom_number(tapp_id);
        }
        diagnostics::info(&self.services, entry);

        let location_id = match self.adopt_parameter_token(&params).await {
            Some(payload) => Some(payload.location_id)
                .filter(|id| *id != 0)
                .or(requested.location_id)
                .unwrap_or(self.config.default_location_id),
            None => match requested {
                RequestedIds {
                    location_id: Some(location_id),
                    tapp_id: Some(_),
                } => location_id,
                _ => {
                    let url = corrected_url(&self.page.href, requested, &self.config);
                    report.states.push(StartupState::Redirecting);
                    if let Err(err) = self.services.navigation.redirect(&url) {
                        diagnostics::error(
                            &self.services,
                            LogEntry::new("Redirect failed.")
                                .source(FILE_NAME, "startup")
                                .exception(err),
                        );
                    }
                    report.outcome = StartupOutcome::Redirected { url };
                    return report;
                }
            },
        };
        let tapp_id = requested.tapp_id.unwrap_or(self.config.default_tapp_id);

        self.services.navigation.init();
        report.states.push(StartupState::Bootstrapping);

        let bootstrapper =
            LocationBootstrapper::new(&self.services, &self.config, &self.page, &params);
        if !bootstrapper
            .bootstrap_location(&mut report.runtime, location_id)
            .await
        {
            report.outcome = StartupOutcome::BootstrapFailed { location_id };
            return report;
        }
        let Some(info) = report.runtime.as_mut() else {
            report.outcome = StartupOutcome::BootstrapFailed { location_id };
            return report;
        };

        report.tapp_list = Some(bootstrapper.bootstrap_tapps(info).await);

        let token_valid = match self.services.session.access_token().await {
            Ok(token) => token.as_deref().is_some_and(validate_access_token),
            Err(err) => {
                diagnostics::warning(
                    &self.services,
                    LogEntry::new("Access token unavailable.")
                        .location_id(location_id)
                        .source(FILE_NAME, "init")
                        .exception(err),
                );
                false
            }
        };
        let tapp = find_tapp(&info.tapps, tapp_id).cloned();

        let login_reason = if params.contains(PARAM_FORCE_LOGIN) {
            Some(LoginReason::ForceLogin)
        } else {
            match &tapp {
                None if !token_valid => Some(LoginReason::NoTappFound),
                None => None,
                Some(tapp) if tapp.id == self.config.login_tapp_id => Some(LoginReason::LoginTapp),
                Some(tapp) if tapp.requires_login && !token_valid => {
                    Some(LoginReason::RequiresLogin)
                }
                Some(_) => None,
            }
        };

        if let Some(reason) = login_reason {
            diagnostics::info(
                &self.services,
                LogEntry::new(format!("show login tapp ({})", reason.label()))
                    .location_id(location_id)
                    .custom_number(tapp_id)
                    .source(FILE_NAME, "init"),
            );
            report.states.push(StartupState::Authenticating);
            self.services.tapps.show_login();
            report.outcome = StartupOutcome::LoginShown { reason };
            return report;
        }

        let Some(tapp) = tapp else {
            diagnostics::warning(
                &self.services,
                LogEntry::new("no tapp found")
                    .location_id(location_id)
                    .custom_number(tapp_id)
                    .source(FILE_NAME, "loadTapp"),
            );
            self.services.dialogs.alert(&format!(
                "The Tapp \"{tapp_id}\" does not exist on the location \"{location_id}\" or you have not the right permissions to see it."
            ));
            report.outcome = StartupOutcome::TappNotFound { tapp_id };
            return report;
        };

        info.set_selected_tapp(&tapp);
        report.states.push(StartupState::TappLoading);
        self.services.tapps.load_tapp(tapp.launch());
        report.outcome = StartupOutcome::TappLoaded { tapp_id: tapp.id };
        report
    }

    /// Signs in with a valid `accesstoken` URL parameter.
    ///
    /// Returns the decoded payload when the token was adopted.
    async fn adopt_parameter_token(&self, params: &UrlParameters) -> Option<AccessTokenPayload> {
        let token = params.get(PARAM_ACCESS_TOKEN)?.trim();
        if !validate_access_token(token) {
            return None;
        }
        let payload = decode_access_token(token)?;

        if let Err(err) = self.services.session.set_access_token(token).await {
            diagnostics::error(
                &self.services,
                LogEntry::new("Storing accessToken failed.")
                    .source(FILE_NAME, "startup")
                    .exception(err),
            );
        }
        diagnostics::info(
            &self.services,
            LogEntry::new("accessToken as URLParameter")
                .person_id(payload.person_id.clone())
                .source(FILE_NAME, "startup"),
        );

        if payload.has_role(ROLE_TOBIT_BUHA) {
            self.services
                .navigation
                .disable_tapp(self.config.intercom_tapp_id);
        }
        Some(payload)
    }
}

/// Appends the default location and tapp ids the URL is missing.
///
/// Any fragment is kept at the end of the URL.
fn corrected_url(href: &str, requested: RequestedIds, config: &RuntimeConfig) -> String {
    let (base, fragment) = match href.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (href, None),
    };

    let mut url = base.to_string();
    if !url.contains('?') {
        url.push('?');
    }
    if requested.location_id.is_none() {
        push_query_pair(&mut url, PARAM_LOCATION_ID, config.default_location_id);
    }
    if requested.tapp_id.is_none() {
        push_query_pair(&mut url, "tappId", config.default_tapp_id);
    }
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

fn push_query_pair(url: &mut String, key: &str, value: i64) {
    if !url.ends_with(['?', '&']) {
        url.push('&');
    }
    url.push_str(&format!("{key}={value}"));
}

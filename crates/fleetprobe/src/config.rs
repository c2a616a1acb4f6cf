//! Suite configuration.
//!
//! One YAML file per suite, every section optional:
//!
//! ```yaml
//! base_url: https://fleet.example.test
//! credentials:
//!   username: dispatcher
//!   password: change-me
//! fixtures:
//!   document: fixtures/registration.pdf
//! wait:
//!   timeout_ms: 15000
//! selectors:
//!   calendar:
//!     in_view_class: ant-picker-cell-in-view
//! ```
//!
//! Environment variables override the file (see [`SuiteConfig::apply_env`]).

use crate::login::{Credentials, LoginParams};
use crate::network::Route;
use crate::result::{FleetError, FleetResult};
use crate::wait::WaitPolicy;
use crate::widgets::upload::DEFAULT_NOTE;
use crate::widgets::WidgetSelectors;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides `base_url`
pub const ENV_BASE_URL: &str = "FLEETPROBE_BASE_URL";
/// Overrides `credentials.username`
pub const ENV_USERNAME: &str = "FLEETPROBE_USERNAME";
/// Overrides `credentials.password`
pub const ENV_PASSWORD: &str = "FLEETPROBE_PASSWORD";
/// Overrides `wait.timeout_ms`
pub const ENV_TIMEOUT_MS: &str = "FLEETPROBE_TIMEOUT_MS";

/// Local files used by upload primitives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    /// Document attached by uploads
    pub document: PathBuf,
    /// Note entered in upload dialogs
    pub note: String,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            document: PathBuf::from("fixtures/sample.pdf"),
            note: DEFAULT_NOTE.to_string(),
        }
    }
}

/// Login request and landing-view contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSettings {
    /// Glob matched against the login request URL
    pub route: String,
    /// Required response status
    pub expected_status: u16,
    /// JSON field that must be present in the response body
    pub success_field: String,
    /// Required value of the success field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_value: Option<String>,
    /// Label of the landing navigation entry
    pub home_label: String,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            route: "**/api/auth/login".to_string(),
            expected_status: 200,
            success_field: "message".to_string(),
            success_value: None,
            home_label: "Home".to_string(),
        }
    }
}

/// Configuration handed to a [`TestContext`](crate::context::TestContext)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Application entry URL
    pub base_url: String,
    /// Account used by the login flow
    pub credentials: Credentials,
    /// Local fixture files
    pub fixtures: Fixtures,
    /// Login contract
    pub login: LoginSettings,
    /// Wait policy shared by every primitive
    pub wait: WaitPolicy,
    /// Widget markup contract
    pub selectors: WidgetSelectors,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            credentials: Credentials::default(),
            fixtures: Fixtures::default(),
            login: LoginSettings::default(),
            wait: WaitPolicy::default(),
            selectors: WidgetSelectors::default(),
        }
    }
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML text
    pub fn from_yaml(text: &str) -> FleetResult<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Read a YAML file
    pub fn load(path: &Path) -> FleetResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(path = %path.display(), "loaded suite config");
        Ok(config)
    }

    /// Apply `FLEETPROBE_*` environment overrides
    pub fn apply_env(&mut self) -> FleetResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> FleetResult<()> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.credentials.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.credentials.password = password;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            self.wait.timeout_ms = timeout.trim().parse().map_err(|_| {
                FleetError::config(format!("{ENV_TIMEOUT_MS} must be a number of milliseconds, got {timeout:?}"))
            })?;
        }
        Ok(())
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> FleetResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(FleetError::config("base_url must not be empty"));
        }
        if self.login.route.trim().is_empty() {
            return Err(FleetError::config("login.route must not be empty"));
        }
        self.wait.validate()
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the credentials
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the wait policy
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Set the widget selectors
    #[must_use]
    pub fn with_selectors(mut self, selectors: WidgetSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Login parameters for this suite
    #[must_use]
    pub fn login_params(&self) -> LoginParams {
        let mut params = LoginParams::new(self.base_url.clone(), self.credentials.clone())
            .with_route(Route::post(self.login.route.clone()));
        params.expected_status = self.login.expected_status;
        params.success_field.clone_from(&self.login.success_field);
        params.success_value.clone_from(&self.login.success_value);
        params.home_label.clone_from(&self.login.home_label);
        params
    }

    /// YAML rendering with the password masked
    pub fn to_redacted_yaml(&self) -> FleetResult<String> {
        let mut shown = self.clone();
        if !shown.credentials.password.is_empty() {
            shown.credentials.password = "***".to_string();
        }
        Ok(serde_yaml_ng::to_string(&shown)?)
    }
}

//! Login flow: submit credentials, check the login response, check the
//! landing view.

use crate::driver::UiDriver;
use crate::locator::Locator;
use crate::network::{InterceptedResponse, Route};
use crate::page::Page;
use crate::result::{FleetError, FleetResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account used to sign in
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Markup contract of the login form and the landing view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSelectors {
    /// Username input
    pub username: String,
    /// Password input
    pub password: String,
    /// Submit button
    pub submit: String,
    /// Navigation entry shown once signed in
    pub home_nav: String,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            username: "input#username".to_string(),
            password: "input#password".to_string(),
            submit: "button[type='submit']".to_string(),
            home_nav: ".ant-menu-item-selected .ant-menu-title-content".to_string(),
        }
    }
}

/// Parameters for [`login`]
#[derive(Debug, Clone)]
pub struct LoginParams {
    /// Application entry URL
    pub base_url: String,
    /// Account to sign in with
    pub credentials: Credentials,
    /// Login request to observe
    pub route: Route,
    /// Required status of the login response
    pub expected_status: u16,
    /// JSON field that must be present and non-null in the response body
    pub success_field: String,
    /// Required value of `success_field`, if any
    pub success_value: Option<String>,
    /// Text of the navigation entry on the landing view
    pub home_label: String,
}

impl LoginParams {
    /// Parameters with the usual contract: `POST **/api/auth/login`, status
    /// 200, a `message` field and a "Home" navigation entry
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            route: Route::post("**/api/auth/login"),
            expected_status: 200,
            success_field: "message".to_string(),
            success_value: None,
            home_label: "Home".to_string(),
        }
    }

    /// Set the login request to observe
    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    /// Require `success_field` to equal `value`
    #[must_use]
    pub fn with_success_value(mut self, value: impl Into<String>) -> Self {
        self.success_value = Some(value.into());
        self
    }
}

fn check_response(params: &LoginParams, response: &InterceptedResponse) -> FleetResult<()> {
    if response.status != params.expected_status {
        return Err(FleetError::UnexpectedResponse {
            url: response.url.clone(),
            status: response.status,
            expected: params.expected_status,
        });
    }
    let body = response.body_json()?;
    let field = body
        .get(&params.success_field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| {
            FleetError::assertion(format!(
                "login response has no {:?} field",
                params.success_field
            ))
        })?;
    if let Some(expected) = &params.success_value {
        let actual = field
            .as_str()
            .map_or_else(|| field.to_string(), ToString::to_string);
        if actual != *expected {
            return Err(FleetError::assertion(format!(
                "login response {:?} is {actual:?}, expected {expected:?}",
                params.success_field
            )));
        }
    }
    Ok(())
}

/// Sign in and confirm the landing view.
///
/// Returns the captured login response.
pub async fn login<D: UiDriver>(
    page: &Page<D>,
    params: &LoginParams,
    selectors: &LoginSelectors,
) -> FleetResult<InterceptedResponse> {
    tracing::debug!(url = %params.base_url, user = %params.credentials.username, "login: start");
    page.goto(&params.base_url).await?;
    page.intercept(&params.route).await?;

    page.fill(&Locator::new(selectors.username.as_str()), &params.credentials.username)
        .await?;
    page.fill(&Locator::new(selectors.password.as_str()), &params.credentials.password)
        .await?;
    page.click(&Locator::new(selectors.submit.as_str())).await?;

    let response = page.wait_for_response(&params.route).await?;
    tracing::debug!(status = response.status, url = %response.url, "login: response");
    check_response(params, &response)?;

    let home = page.wait_for(&Locator::new(selectors.home_nav.as_str())).await?;
    if home.text.trim() != params.home_label {
        return Err(FleetError::assertion(format!(
            "landing navigation shows {:?}, expected {:?}",
            home.text.trim(),
            params.home_label
        )));
    }

    tracing::info!(user = %params.credentials.username, "login: signed in");
    Ok(response)
}

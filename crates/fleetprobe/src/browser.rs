//! Chromium driver over the Chrome `DevTools` Protocol.
//!
//! Element snapshots are taken with one `querySelectorAll` evaluation per
//! query; actions re-resolve the element by selector and index. Login-style
//! response checks use `Network.responseReceived` plus
//! `Network.getResponseBody`, so requests are observed, never modified.

#![allow(
    clippy::significant_drop_tightening,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

use crate::driver::{ElementHandle, UiDriver};
use crate::network::{HttpMethod, InterceptedResponse, Route};
use crate::result::{FleetError, FleetResult};
use async_trait::async_trait;
use base64::Engine;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFinished, EventRequestWillBeSent, EventResponseReceived,
    GetResponseBodyParams, RequestId,
};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1440,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

type Shared<T> = Arc<Mutex<T>>;

fn cdp_error(e: impl std::fmt::Display) -> FleetError {
    FleetError::driver(e.to_string())
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    tag: String,
    text: String,
    classes: Vec<String>,
    disabled: bool,
    visible: bool,
}

fn snapshot_script(css: &str) -> FleetResult<String> {
    let css = serde_json::to_string(css)?;
    Ok(format!(
        r"(() => Array.from(document.querySelectorAll({css})).map((e) => {{
            const r = e.getBoundingClientRect();
            const s = window.getComputedStyle(e);
            const field = e instanceof HTMLInputElement || e instanceof HTMLTextAreaElement;
            return {{
                tag: e.tagName.toLowerCase(),
                text: field ? e.value : (e.innerText || e.textContent || ''),
                classes: Array.from(e.classList),
                disabled: e.disabled === true || e.getAttribute('aria-disabled') === 'true',
                visible: r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none',
            }};
        }}))()"
    ))
}

fn decode_body(body: &str, base64_encoded: bool) -> Vec<u8> {
    if base64_encoded {
        base64::engine::general_purpose::STANDARD
            .decode(body)
            .unwrap_or_default()
    } else {
        body.as_bytes().to_vec()
    }
}

/// [`UiDriver`] backed by a real Chromium instance
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: tokio::sync::Mutex<CdpBrowser>,
    page: CdpPage,
    routes: Shared<Vec<Route>>,
    captured: Shared<VecDeque<InterceptedResponse>>,
    handler: JoinHandle<()>,
    listener: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page with network capture enabled
    pub async fn launch(config: BrowserConfig) -> FleetResult<Self> {
        let mut builder = CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(cdp_error)?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(cdp_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(cdp_error)?;
        page.execute(EnableParams::default()).await.map_err(cdp_error)?;

        let routes: Shared<Vec<Route>> = Arc::default();
        let captured: Shared<VecDeque<InterceptedResponse>> = Arc::default();
        let listener = Self::capture(page.clone(), Arc::clone(&routes), Arc::clone(&captured)).await?;
        tracing::debug!(headless = config.headless, "chromium launched");

        Ok(Self {
            browser: tokio::sync::Mutex::new(browser),
            page,
            routes,
            captured,
            handler,
            listener,
        })
    }

    async fn capture(
        page: CdpPage,
        routes: Shared<Vec<Route>>,
        captured: Shared<VecDeque<InterceptedResponse>>,
    ) -> FleetResult<JoinHandle<()>> {
        let mut requests = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(cdp_error)?;
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(cdp_error)?;
        let mut finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(cdp_error)?;

        Ok(tokio::spawn(async move {
            let mut methods: HashMap<RequestId, HttpMethod> = HashMap::new();
            let mut pending: HashMap<RequestId, InterceptedResponse> = HashMap::new();
            loop {
                tokio::select! {
                    Some(event) = requests.next() => {
                        methods.insert(event.request_id.clone(), HttpMethod::parse(&event.request.method));
                    }
                    Some(event) = responses.next() => {
                        let method = methods.remove(&event.request_id).unwrap_or(HttpMethod::Any);
                        let url = event.response.url.clone();
                        let watched = routes
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .iter()
                            .any(|route| route.matches(&url, &method));
                        if watched {
                            let status = u16::try_from(event.response.status).unwrap_or_default();
                            pending.insert(event.request_id.clone(), InterceptedResponse::new(url, method, status));
                        }
                    }
                    Some(event) = finished.next() => {
                        if let Some(mut response) = pending.remove(&event.request_id) {
                            match page.execute(GetResponseBodyParams::new(event.request_id.clone())).await {
                                Ok(body) => response.body = decode_body(&body.body, body.base64_encoded),
                                Err(e) => tracing::warn!(url = %response.url, error = %e, "response body unavailable"),
                            }
                            captured
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .push_back(response);
                        }
                    }
                    else => break,
                }
            }
        }))
    }

    async fn resolve(&self, element: &ElementHandle) -> FleetResult<Element> {
        self.page
            .find_elements(element.selector.as_str())
            .await
            .map_err(cdp_error)?
            .into_iter()
            .nth(element.index)
            .ok_or_else(|| FleetError::driver(format!("stale element {}", element.id)))
    }

    /// Close the browser
    pub async fn close(self) -> FleetResult<()> {
        self.listener.abort();
        let mut browser = self.browser.into_inner();
        browser.close().await.map_err(cdp_error)?;
        self.handler.abort();
        Ok(())
    }
}

#[async_trait]
impl UiDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> FleetResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| FleetError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> FleetResult<String> {
        Ok(self.page.url().await.map_err(cdp_error)?.unwrap_or_default())
    }

    async fn query_all(&self, css: &str) -> FleetResult<Vec<ElementHandle>> {
        let snapshots: Vec<Snapshot> = self
            .page
            .evaluate(snapshot_script(css)?)
            .await
            .map_err(cdp_error)?
            .into_value()
            .map_err(cdp_error)?;
        Ok(snapshots
            .into_iter()
            .enumerate()
            .map(|(index, s)| {
                let mut element = ElementHandle::new(css, index)
                    .with_tag(s.tag)
                    .with_text(s.text)
                    .with_disabled(s.disabled)
                    .with_visible(s.visible);
                element.classes = s.classes;
                element
            })
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> FleetResult<()> {
        self.resolve(element).await?.click().await.map_err(cdp_error)?;
        Ok(())
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> FleetResult<()> {
        let target = self.resolve(element).await?;
        target.click().await.map_err(cdp_error)?;
        target
            .call_js_fn("function() { if (this.select) { this.select(); } }", false)
            .await
            .map_err(cdp_error)?;
        target.type_str(text).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn attach_file(&self, element: &ElementHandle, path: &Path) -> FleetResult<()> {
        let target = self.resolve(element).await?;
        let params = SetFileInputFilesParams::builder()
            .files(vec![path.display().to_string()])
            .backend_node_id(target.backend_node_id)
            .build()
            .map_err(cdp_error)?;
        self.page.execute(params).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn intercept(&self, route: &Route) -> FleetResult<()> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.clone());
        Ok(())
    }

    async fn take_response(&self, route: &Route) -> FleetResult<Option<InterceptedResponse>> {
        let mut captured = self.captured.lock().unwrap_or_else(PoisonError::into_inner);
        let position = captured
            .iter()
            .position(|r| route.matches(&r.url, &r.method));
        Ok(position.and_then(|i| captured.remove(i)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_builder() {
        let config = BrowserConfig::default()
            .with_headless(false)
            .with_viewport(1280, 720)
            .with_no_sandbox();
        assert!(!config.headless);
        assert_eq!(config.viewport_width, 1280);
        assert!(!config.sandbox);
    }

    #[test]
    fn test_snapshot_script_escapes_selector() {
        let script = snapshot_script("input[name=\"user\"]").unwrap();
        assert!(script.contains(r#"querySelectorAll("input[name=\"user\"]")"#));
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body("{}", false), b"{}".to_vec());
        assert_eq!(decode_body("e30=", true), b"{}".to_vec());
    }
}

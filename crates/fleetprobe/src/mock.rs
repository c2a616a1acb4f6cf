//! Scriptable in-memory driver for unit testing primitives.
//!
//! A [`MockDriver`] holds a flat list of element snapshots keyed by the CSS
//! selector they answer to. Clicks can trigger [`Reaction`]s (step a numeric
//! display, show or hide elements, deliver a network response), and every
//! driver call is recorded as a [`DriverCall`] for order assertions.
//!
//! ```ignore
//! let mock = MockDriver::new();
//! mock.add(".ant-picker-input", "");
//! mock.on_click(".ant-picker-input", Reaction::show(".ant-picker-dropdown", ""));
//! ```

use crate::driver::{ElementHandle, UiDriver};
use crate::network::{InterceptedResponse, Route};
use crate::result::{FleetError, FleetResult};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A recorded driver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    /// `navigate(url)`
    Navigate(String),
    /// `click` on an element
    Click {
        /// Selector the element answers to
        selector: String,
        /// Element identity
        id: String,
    },
    /// `fill` on an element
    Fill {
        /// Selector the element answers to
        selector: String,
        /// Element identity
        id: String,
        /// Text entered
        text: String,
    },
    /// `attach_file` on an element
    AttachFile {
        /// Selector the element answers to
        selector: String,
        /// Element identity
        id: String,
        /// Attached path
        path: PathBuf,
    },
    /// `intercept(route)`
    Intercept(Route),
}

impl DriverCall {
    /// Whether this call acted on `target` (a selector or an element id)
    #[must_use]
    pub fn targets(&self, target: &str) -> bool {
        match self {
            Self::Click { selector, id }
            | Self::Fill { selector, id, .. }
            | Self::AttachFile { selector, id, .. } => selector == target || id == target,
            Self::Navigate(_) | Self::Intercept(_) => false,
        }
    }

    /// Whether this is a click on `target`
    #[must_use]
    pub fn is_click_on(&self, target: &str) -> bool {
        matches!(self, Self::Click { .. }) && self.targets(target)
    }
}

/// Side effect applied when a matching element is clicked
#[derive(Debug, Clone)]
pub enum Reaction {
    /// Add `delta` to the number shown by every element under `display`.
    /// With a modulus the value wraps; without one it saturates at zero.
    Step {
        /// Selector of the display element
        display: String,
        /// Amount added per click
        delta: i64,
        /// Wrap-around range, if any
        modulus: Option<u32>,
    },
    /// Add an element
    Show(ElementHandle),
    /// Remove every element answering to a selector
    Hide(String),
    /// Deliver a network response
    Respond(InterceptedResponse),
}

impl Reaction {
    /// Show a new element under `selector` with `text`
    #[must_use]
    pub fn show(selector: &str, text: &str) -> Self {
        Self::Show(ElementHandle::new(selector, 0).with_text(text))
    }

    /// Hide every element under `selector`
    #[must_use]
    pub fn hide(selector: &str) -> Self {
        Self::Hide(selector.to_string())
    }
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    elements: Vec<ElementHandle>,
    values: HashMap<String, String>,
    reactions: Vec<(String, Reaction)>,
    routes: Vec<Route>,
    responses: VecDeque<InterceptedResponse>,
    history: Vec<DriverCall>,
    next_id: u64,
}

impl MockState {
    fn insert(&mut self, mut element: ElementHandle) -> ElementHandle {
        self.next_id += 1;
        element.id = format!("{}#{}", element.selector, self.next_id);
        self.elements.push(element.clone());
        element
    }

    fn find(&self, element: &ElementHandle) -> FleetResult<&ElementHandle> {
        self.elements
            .iter()
            .find(|e| e.id == element.id)
            .ok_or_else(|| FleetError::driver(format!("stale element {}", element.id)))
    }

    fn apply(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Step {
                display,
                delta,
                modulus,
            } => {
                for element in self.elements.iter_mut().filter(|e| e.selector == display) {
                    let current = element.text.trim().parse::<i64>().unwrap_or(0);
                    let next = match modulus {
                        Some(m) => (current + delta).rem_euclid(i64::from(m)),
                        None => (current + delta).max(0),
                    };
                    element.text = format!("{next:02}");
                }
            }
            Reaction::Show(element) => {
                self.insert(element);
            }
            Reaction::Hide(selector) => self.elements.retain(|e| e.selector != selector),
            Reaction::Respond(response) => self.responses.push_back(response),
        }
    }
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an element snapshot; its id is replaced by a unique one and the
    /// stored handle is returned
    pub fn add_element(&self, element: ElementHandle) -> ElementHandle {
        self.state().insert(element)
    }

    /// Add a visible, enabled element with `text` under `selector`
    pub fn add(&self, selector: &str, text: &str) -> ElementHandle {
        self.add_element(ElementHandle::new(selector, 0).with_text(text))
    }

    /// Remove every element under `selector`
    pub fn remove(&self, selector: &str) {
        self.state().elements.retain(|e| e.selector != selector);
    }

    /// Register a reaction for clicks on `trigger` (a selector or element id)
    pub fn on_click(&self, trigger: &str, reaction: Reaction) {
        self.state().reactions.push((trigger.to_string(), reaction));
    }

    /// Deliver a response immediately, as if the request had already completed
    pub fn push_response(&self, response: InterceptedResponse) {
        self.state().responses.push_back(response);
    }

    /// Current text of the first element under `selector`
    #[must_use]
    pub fn text_of(&self, selector: &str) -> Option<String> {
        self.state()
            .elements
            .iter()
            .find(|e| e.selector == selector)
            .map(|e| e.text.clone())
    }

    /// Last value filled into the first element under `selector`
    #[must_use]
    pub fn value_of(&self, selector: &str) -> Option<String> {
        let state = self.state();
        let id = state.elements.iter().find(|e| e.selector == selector)?.id.clone();
        state.values.get(&id).cloned()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<DriverCall> {
        self.state().history.clone()
    }

    /// Number of clicks on `target` (a selector or element id)
    #[must_use]
    pub fn clicks_on(&self, target: &str) -> usize {
        self.state()
            .history
            .iter()
            .filter(|c| c.is_click_on(target))
            .count()
    }

    /// Index of the first recorded call satisfying `predicate`
    #[must_use]
    pub fn position_of(&self, predicate: impl Fn(&DriverCall) -> bool) -> Option<usize> {
        self.state().history.iter().position(predicate)
    }

    /// Check if any call acted on `target`
    #[must_use]
    pub fn was_targeted(&self, target: &str) -> bool {
        self.state().history.iter().any(|c| c.targets(target))
    }
}

#[async_trait]
impl UiDriver for MockDriver {
    async fn navigate(&self, url: &str) -> FleetResult<()> {
        let mut state = self.state();
        state.history.push(DriverCall::Navigate(url.to_string()));
        state.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> FleetResult<String> {
        Ok(self.state().url.clone())
    }

    async fn query_all(&self, css: &str) -> FleetResult<Vec<ElementHandle>> {
        Ok(self
            .state()
            .elements
            .iter()
            .filter(|e| e.selector == css)
            .enumerate()
            .map(|(index, e)| ElementHandle {
                index,
                ..e.clone()
            })
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> FleetResult<()> {
        let mut state = self.state();
        let (selector, id) = {
            let found = state.find(element)?;
            (found.selector.clone(), found.id.clone())
        };
        state.history.push(DriverCall::Click {
            selector: selector.clone(),
            id: id.clone(),
        });
        let triggered: Vec<Reaction> = state
            .reactions
            .iter()
            .filter(|(trigger, _)| *trigger == selector || *trigger == id)
            .map(|(_, reaction)| reaction.clone())
            .collect();
        for reaction in triggered {
            state.apply(reaction);
        }
        Ok(())
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> FleetResult<()> {
        let mut state = self.state();
        let (selector, id) = {
            let found = state.find(element)?;
            (found.selector.clone(), found.id.clone())
        };
        state.history.push(DriverCall::Fill {
            selector,
            id: id.clone(),
            text: text.to_string(),
        });
        state.values.insert(id, text.to_string());
        Ok(())
    }

    async fn attach_file(&self, element: &ElementHandle, path: &Path) -> FleetResult<()> {
        let mut state = self.state();
        let (selector, id) = {
            let found = state.find(element)?;
            (found.selector.clone(), found.id.clone())
        };
        state.history.push(DriverCall::AttachFile {
            selector,
            id,
            path: path.to_path_buf(),
        });
        Ok(())
    }

    async fn intercept(&self, route: &Route) -> FleetResult<()> {
        let mut state = self.state();
        state.history.push(DriverCall::Intercept(route.clone()));
        state.routes.push(route.clone());
        Ok(())
    }

    async fn take_response(&self, route: &Route) -> FleetResult<Option<InterceptedResponse>> {
        let mut state = self.state();
        if !state.routes.contains(route) {
            return Ok(None);
        }
        let position = state
            .responses
            .iter()
            .position(|r| route.matches(&r.url, &r.method));
        Ok(position.and_then(|i| state.responses.remove(i)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::network::HttpMethod;

    #[tokio::test]
    async fn test_mock_driver_navigate() {
        let driver = MockDriver::new();
        driver.navigate("https://fleet.test").await.unwrap();
        assert_eq!(driver.current_url().await.unwrap(), "https://fleet.test");
        assert_eq!(
            driver.history(),
            vec![DriverCall::Navigate("https://fleet.test".to_string())]
        );
    }

    #[tokio::test]
    async fn test_query_all_reindexes_per_selector() {
        let driver = MockDriver::new();
        driver.add(".a", "1");
        driver.add(".b", "x");
        driver.add(".a", "2");
        let found = driver.query_all(".a").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].index, 0);
        assert_eq!(found[1].index, 1);
        assert_eq!(found[1].text, "2");
        assert_ne!(found[0].id, found[1].id);
    }

    #[tokio::test]
    async fn test_step_reaction_wraps_with_modulus() {
        let driver = MockDriver::new();
        driver.add(".display", "23");
        let up = driver.add(".up", "+");
        driver.on_click(
            ".up",
            Reaction::Step {
                display: ".display".to_string(),
                delta: 1,
                modulus: Some(24),
            },
        );
        driver.click(&up).await.unwrap();
        assert_eq!(driver.text_of(".display").as_deref(), Some("00"));
        assert_eq!(driver.clicks_on(".up"), 1);
    }

    #[tokio::test]
    async fn test_step_reaction_saturates_without_modulus() {
        let driver = MockDriver::new();
        driver.add(".display", "00");
        let down = driver.add(".down", "-");
        driver.on_click(
            ".down",
            Reaction::Step {
                display: ".display".to_string(),
                delta: -1,
                modulus: None,
            },
        );
        driver.click(&down).await.unwrap();
        assert_eq!(driver.text_of(".display").as_deref(), Some("00"));
    }

    #[tokio::test]
    async fn test_show_and_hide_reactions() {
        let driver = MockDriver::new();
        let open = driver.add(".open", "Open");
        let close = driver.add(".close", "Close");
        driver.on_click(".open", Reaction::show(".dialog", "Upload"));
        driver.on_click(".close", Reaction::hide(".dialog"));

        driver.click(&open).await.unwrap();
        assert_eq!(driver.query_all(".dialog").await.unwrap().len(), 1);
        driver.click(&close).await.unwrap();
        assert!(driver.query_all(".dialog").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_click_on_removed_element_is_stale() {
        let driver = MockDriver::new();
        let gone = driver.add(".gone", "");
        driver.remove(".gone");
        assert!(matches!(
            driver.click(&gone).await,
            Err(FleetError::Driver { .. })
        ));
    }

    #[tokio::test]
    async fn test_responses_require_registered_route() {
        let driver = MockDriver::new();
        let route = Route::post("**/login");
        driver.push_response(InterceptedResponse::new(
            "https://fleet.test/login",
            HttpMethod::Post,
            200,
        ));
        assert!(driver.take_response(&route).await.unwrap().is_none());

        driver.intercept(&route).await.unwrap();
        let response = driver.take_response(&route).await.unwrap().unwrap();
        assert_eq!(response.status, 200);
        assert!(driver.take_response(&route).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fill_records_value() {
        let driver = MockDriver::new();
        let input = driver.add("#username", "");
        driver.fill(&input, "dispatcher").await.unwrap();
        assert_eq!(driver.value_of("#username").as_deref(), Some("dispatcher"));
        assert!(driver.was_targeted("#username"));
    }
}

//! Page: a driver plus the wait policy, with auto-waiting actions.
//!
//! Every action first waits for its target under the shared [`WaitPolicy`],
//! so no primitive sleeps for a fixed amount of time.

use crate::driver::{ElementHandle, UiDriver};
use crate::locator::Locator;
use crate::network::{InterceptedResponse, Route};
use crate::result::{FleetError, FleetResult};
use crate::wait::{WaitPolicy, Waiter};
use std::path::Path;
use std::time::Duration;

/// Auto-waiting wrapper around a [`UiDriver`]
#[derive(Debug)]
pub struct Page<D> {
    driver: D,
    waiter: Waiter,
}

impl<D: UiDriver> Page<D> {
    /// Create a page over `driver`
    pub const fn new(driver: D, policy: WaitPolicy) -> Self {
        Self {
            driver,
            waiter: Waiter::new(policy),
        }
    }

    /// The underlying driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Give the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// The waiter built from the page's policy
    pub const fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    /// The page's wait policy
    pub const fn policy(&self) -> &WaitPolicy {
        self.waiter.policy()
    }

    /// Navigate to `url`
    pub async fn goto(&self, url: &str) -> FleetResult<()> {
        tracing::debug!(url, "navigate");
        self.driver.navigate(url).await
    }

    /// Elements currently matching `locator`, without waiting
    pub async fn locate(&self, locator: &Locator) -> FleetResult<Vec<ElementHandle>> {
        Ok(locator.filter(self.driver.query_all(locator.css()).await?))
    }

    /// Wait for the first element matching `locator`
    pub async fn wait_for(&self, locator: &Locator) -> FleetResult<ElementHandle> {
        let mut found = self.wait_for_all(locator).await?;
        Ok(found.swap_remove(0))
    }

    /// Wait until at least one element matches `locator` and return all matches
    pub async fn wait_for_all(&self, locator: &Locator) -> FleetResult<Vec<ElementHandle>> {
        let page = self;
        self.waiter
            .until(&locator.to_string(), move || async move {
                let found = page.locate(locator).await?;
                Ok((!found.is_empty()).then_some(found))
            })
            .await
            .map_err(|e| self.not_found(locator, e))
    }

    /// Wait until nothing matches `locator`
    pub async fn wait_for_absent(&self, locator: &Locator) -> FleetResult<()> {
        let page = self;
        self.waiter
            .until(&format!("{locator} to disappear"), move || async move {
                Ok(page.locate(locator).await?.is_empty().then_some(()))
            })
            .await
    }

    /// Look for `locator` for at most `window`; `None` when it never appears
    pub async fn find_within(
        &self,
        locator: &Locator,
        window: Duration,
    ) -> FleetResult<Option<ElementHandle>> {
        let page = self;
        self.waiter
            .within(window, move || async move {
                Ok(page.locate(locator).await?.into_iter().next())
            })
            .await
    }

    /// Wait for `locator` and click the first match
    pub async fn click(&self, locator: &Locator) -> FleetResult<ElementHandle> {
        let element = self.wait_for(locator).await?;
        self.click_element(&element).await?;
        Ok(element)
    }

    /// Click an element already located
    pub async fn click_element(&self, element: &ElementHandle) -> FleetResult<()> {
        tracing::debug!(element = %element.id, "click");
        self.driver.click(element).await
    }

    /// Wait for `locator` and replace its value with `text`
    pub async fn fill(&self, locator: &Locator, text: &str) -> FleetResult<()> {
        let element = self.wait_for(locator).await?;
        tracing::debug!(element = %element.id, chars = text.chars().count(), "fill");
        self.driver.fill(&element, text).await
    }

    /// Wait for `locator` and attach `path` to it
    pub async fn attach_file(&self, locator: &Locator, path: &Path) -> FleetResult<()> {
        let element = self.wait_for(locator).await?;
        tracing::debug!(element = %element.id, path = %path.display(), "attach file");
        self.driver.attach_file(&element, path).await
    }

    /// Read the text of the first match once two consecutive reads agree
    pub async fn read_stable_text(&self, locator: &Locator) -> FleetResult<String> {
        self.wait_for(locator).await?;
        let page = self;
        let text = self
            .waiter
            .stable(&locator.to_string(), move || async move {
                Ok(page
                    .locate(locator)
                    .await?
                    .into_iter()
                    .next()
                    .map(|e| e.text))
            })
            .await?;
        text.ok_or_else(|| FleetError::ElementNotFound {
            description: locator.to_string(),
            timeout_ms: self.policy().timeout_ms,
        })
    }

    /// Start capturing responses for `route`
    pub async fn intercept(&self, route: &Route) -> FleetResult<()> {
        tracing::debug!(%route, "intercept");
        self.driver.intercept(route).await
    }

    /// Wait for the next captured response on `route`
    pub async fn wait_for_response(&self, route: &Route) -> FleetResult<InterceptedResponse> {
        let driver = &self.driver;
        self.waiter
            .until(&format!("response to {route}"), move || async move {
                driver.take_response(route).await
            })
            .await
    }

    /// Pause for the policy's settle window
    pub async fn settle(&self) {
        self.waiter.settle().await;
    }

    fn not_found(&self, locator: &Locator, error: FleetError) -> FleetError {
        match error {
            FleetError::Timeout { .. } => FleetError::ElementNotFound {
                description: locator.to_string(),
                timeout_ms: self.policy().timeout_ms,
            },
            other => other,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{DriverCall, MockDriver, Reaction};
    use crate::network::HttpMethod;
    use std::sync::Arc;

    fn page() -> (Arc<MockDriver>, Page<Arc<MockDriver>>) {
        let mock = Arc::new(MockDriver::new());
        let page = Page::new(Arc::clone(&mock), WaitPolicy::fast().with_timeout(50));
        (mock, page)
    }

    mod wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_for_missing_is_element_not_found() {
            let (_mock, page) = page();
            let err = page.wait_for(&Locator::new(".missing")).await.unwrap_err();
            match err {
                FleetError::ElementNotFound {
                    description,
                    timeout_ms,
                } => {
                    assert_eq!(description, ".missing");
                    assert_eq!(timeout_ms, 50);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_wait_for_applies_text_filter() {
            let (mock, page) = page();
            mock.add(".opt", "Inactive");
            mock.add(".opt", "Active");
            let found = page
                .wait_for(&Locator::new(".opt").with_text("Active"))
                .await
                .unwrap();
            assert_eq!(found.text, "Active");
            assert_eq!(found.index, 1);
        }

        #[tokio::test]
        async fn test_find_within_absent_is_none() {
            let (_mock, page) = page();
            let found = page
                .find_within(&Locator::new(".remove"), Duration::from_millis(10))
                .await
                .unwrap();
            assert!(found.is_none());
        }

        #[tokio::test]
        async fn test_wait_for_absent() {
            let (mock, page) = page();
            assert!(page.wait_for_absent(&Locator::new(".dialog")).await.is_ok());
            mock.add(".dialog", "");
            assert!(page
                .wait_for_absent(&Locator::new(".dialog"))
                .await
                .unwrap_err()
                .is_timeout());
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_triggers_reaction() {
            let (mock, page) = page();
            mock.add(".open", "Open");
            mock.on_click(".open", Reaction::show(".popup", ""));
            page.click(&Locator::new(".open")).await.unwrap();
            assert!(page.wait_for(&Locator::new(".popup")).await.is_ok());
        }

        #[tokio::test]
        async fn test_fill_and_attach_are_recorded() {
            let (mock, page) = page();
            mock.add("#notes", "");
            mock.add(".drop", "");
            page.fill(&Locator::new("#notes"), "hello").await.unwrap();
            page.attach_file(&Locator::new(".drop"), Path::new("doc.pdf"))
                .await
                .unwrap();
            let history = mock.history();
            assert!(matches!(&history[0], DriverCall::Fill { text, .. } if text == "hello"));
            assert!(matches!(&history[1], DriverCall::AttachFile { .. }));
        }

        #[tokio::test]
        async fn test_read_stable_text() {
            let (mock, page) = page();
            mock.add(".hour", "15");
            assert_eq!(page.read_stable_text(&Locator::new(".hour")).await.unwrap(), "15");
        }

        #[tokio::test]
        async fn test_wait_for_response() {
            let (mock, page) = page();
            let route = Route::post("**/login");
            page.intercept(&route).await.unwrap();
            mock.push_response(InterceptedResponse::new(
                "https://fleet.test/login",
                HttpMethod::Post,
                200,
            ));
            let response = page.wait_for_response(&route).await.unwrap();
            assert_eq!(response.status, 200);
            assert!(page.wait_for_response(&route).await.unwrap_err().is_timeout());
        }
    }
}

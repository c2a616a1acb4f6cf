//! UiDriver - Abstract Browser Automation Trait
//!
//! The primitives never talk to a browser directly. They go through
//! [`UiDriver`], which has two implementations in this crate:
//!
//! - `ChromiumDriver` (feature `browser`) - CDP via chromiumoxide
//! - [`MockDriver`](crate::mock::MockDriver) - scriptable in-memory UI for unit tests
//!
//! The trait stays small: CSS queries that return element snapshots,
//! and actions addressed by those snapshots. Waiting, text matching and
//! disabled-state filtering live above it.

use crate::network::{InterceptedResponse, Route};
use crate::result::FleetResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Snapshot of one DOM element, as returned by [`UiDriver::query_all`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-specific identity, stable for the lifetime of the element
    pub id: String,
    /// CSS selector the element was found with
    pub selector: String,
    /// Position among the selector's matches at query time
    pub index: usize,
    /// Element tag name
    pub tag_name: String,
    /// Visible text content
    pub text: String,
    /// CSS classes
    pub classes: Vec<String>,
    /// Whether the element is disabled (attribute or `aria-disabled`)
    pub disabled: bool,
    /// Whether the element is rendered with a non-empty box
    pub visible: bool,
}

impl ElementHandle {
    /// Create a new visible, enabled element handle
    #[must_use]
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        let selector = selector.into();
        Self {
            id: format!("{selector}[{index}]"),
            selector,
            index,
            tag_name: "div".to_string(),
            text: String::new(),
            classes: Vec::new(),
            disabled: false,
            visible: true,
        }
    }

    /// Set the identity
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the tag name
    #[must_use]
    pub fn with_tag(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    /// Set the visible text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add a CSS class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the disabled flag
    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the visibility flag
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Check for a CSS class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Abstract driver trait for browser automation
///
/// All methods take `&self`; implementations hold their mutable state behind
/// locks so a driver can be shared by reference across primitives.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Navigate to URL
    async fn navigate(&self, url: &str) -> FleetResult<()>;

    /// Get current URL
    async fn current_url(&self) -> FleetResult<String>;

    /// Snapshot every element matching a CSS selector, in document order
    async fn query_all(&self, css: &str) -> FleetResult<Vec<ElementHandle>>;

    /// Click element
    async fn click(&self, element: &ElementHandle) -> FleetResult<()>;

    /// Replace the element's value with `text`
    async fn fill(&self, element: &ElementHandle, text: &str) -> FleetResult<()>;

    /// Attach a local file to a file input or drop zone
    async fn attach_file(&self, element: &ElementHandle, path: &Path) -> FleetResult<()>;

    /// Start capturing responses for a route
    async fn intercept(&self, route: &Route) -> FleetResult<()>;

    /// Take the oldest captured response for a route, if one has arrived
    async fn take_response(&self, route: &Route) -> FleetResult<Option<InterceptedResponse>>;
}

#[async_trait]
impl<D: UiDriver + ?Sized> UiDriver for Arc<D> {
    async fn navigate(&self, url: &str) -> FleetResult<()> {
        (**self).navigate(url).await
    }

    async fn current_url(&self) -> FleetResult<String> {
        (**self).current_url().await
    }

    async fn query_all(&self, css: &str) -> FleetResult<Vec<ElementHandle>> {
        (**self).query_all(css).await
    }

    async fn click(&self, element: &ElementHandle) -> FleetResult<()> {
        (**self).click(element).await
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> FleetResult<()> {
        (**self).fill(element, text).await
    }

    async fn attach_file(&self, element: &ElementHandle, path: &Path) -> FleetResult<()> {
        (**self).attach_file(element, path).await
    }

    async fn intercept(&self, route: &Route) -> FleetResult<()> {
        (**self).intercept(route).await
    }

    async fn take_response(&self, route: &Route) -> FleetResult<Option<InterceptedResponse>> {
        (**self).take_response(route).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_element_handle_creation() {
            let elem = ElementHandle::new(".ant-picker-cell", 3);
            assert_eq!(elem.id, ".ant-picker-cell[3]");
            assert_eq!(elem.index, 3);
            assert_eq!(elem.tag_name, "div");
            assert!(elem.text.is_empty());
            assert!(elem.visible);
            assert!(!elem.disabled);
        }

        #[test]
        fn test_element_handle_builder() {
            let elem = ElementHandle::new("td", 0)
                .with_tag("td")
                .with_text("19")
                .with_class("ant-picker-cell")
                .with_class("ant-picker-cell-disabled")
                .with_disabled(true)
                .with_id("cell-19-prev");
            assert_eq!(elem.id, "cell-19-prev");
            assert!(elem.has_class("ant-picker-cell-disabled"));
            assert!(!elem.has_class("ant-picker-cell-in-view"));
            assert!(elem.disabled);
        }
    }
}

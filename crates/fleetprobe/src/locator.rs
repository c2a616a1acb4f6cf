//! Locator abstraction for element selection.
//!
//! A [`Locator`] is the typed form of an interaction target: a CSS selector,
//! an optional visible-text filter and a visibility requirement. Drivers only
//! understand CSS; text and visibility filtering happen here, on the element
//! snapshots a driver returns, so every driver filters identically.

use crate::driver::ElementHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a locator compares an element's visible text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Trimmed text equals the expected text
    #[default]
    Exact,
    /// Text contains the expected text as a substring
    Contains,
}

impl TextMatch {
    /// Compare `actual` visible text with `expected`
    #[must_use]
    pub fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Exact => actual.trim() == expected.trim(),
            Self::Contains => actual.contains(expected),
        }
    }
}

/// Visible-text filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    /// Expected text
    pub text: String,
    /// Comparison mode
    pub mode: TextMatch,
}

/// A locator for finding elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    css: String,
    text: Option<TextFilter>,
    visible: bool,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text: None,
            visible: true,
        }
    }

    /// Keep only elements whose trimmed text equals `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_text_match(text, TextMatch::Exact)
    }

    /// Keep only elements whose text contains `text`
    #[must_use]
    pub fn containing_text(self, text: impl Into<String>) -> Self {
        self.with_text_match(text, TextMatch::Contains)
    }

    /// Keep only elements whose text matches `text` under `mode`
    #[must_use]
    pub fn with_text_match(mut self, text: impl Into<String>, mode: TextMatch) -> Self {
        self.text = Some(TextFilter {
            text: text.into(),
            mode,
        });
        self
    }

    /// Set visibility requirement
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Scope this locator under a parent selector
    #[must_use]
    pub fn within(&self, parent: &str) -> Self {
        Self {
            css: format!("{parent} {}", self.css),
            text: self.text.clone(),
            visible: self.visible,
        }
    }

    /// The CSS selector handed to the driver
    #[must_use]
    pub fn css(&self) -> &str {
        &self.css
    }

    /// The text filter, if any
    #[must_use]
    pub const fn text_filter(&self) -> Option<&TextFilter> {
        self.text.as_ref()
    }

    /// Whether only visible elements match
    #[must_use]
    pub const fn requires_visible(&self) -> bool {
        self.visible
    }

    /// Check one element snapshot against the text and visibility filters
    #[must_use]
    pub fn accepts(&self, element: &ElementHandle) -> bool {
        if self.visible && !element.visible {
            return false;
        }
        self.text
            .as_ref()
            .map_or(true, |f| f.mode.matches(&element.text, &f.text))
    }

    /// Filter a query result down to matching elements, preserving order
    #[must_use]
    pub fn filter(&self, elements: Vec<ElementHandle>) -> Vec<ElementHandle> {
        elements.into_iter().filter(|e| self.accepts(e)).collect()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)?;
        if let Some(filter) = &self.text {
            match filter.mode {
                TextMatch::Exact => write!(f, " with text {:?}", filter.text)?,
                TextMatch::Contains => write!(f, " containing {:?}", filter.text)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for Locator {
    fn from(css: &str) -> Self {
        Self::new(css)
    }
}

impl From<String> for Locator {
    fn from(css: String) -> Self {
        Self::new(css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> ElementHandle {
        ElementHandle::new(".cell", 0).with_text(text)
    }

    mod text_match_tests {
        use super::*;

        #[test]
        fn test_exact_trims() {
            assert!(TextMatch::Exact.matches("  Active ", "Active"));
            assert!(!TextMatch::Exact.matches("Inactive", "Active"));
        }

        #[test]
        fn test_contains_is_substring() {
            assert!(TextMatch::Contains.matches("Vehicle Registration", "Registration"));
            assert!(TextMatch::Contains.matches("Registration", "Registration"));
            assert!(!TextMatch::Contains.matches("Inactive", "Active"));
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_locator_css() {
            let loc = Locator::new("button.primary");
            assert_eq!(loc.css(), "button.primary");
            assert!(loc.text_filter().is_none());
            assert!(loc.requires_visible());
        }

        #[test]
        fn test_locator_with_text_filters() {
            let loc = Locator::new(".cell").with_text("19");
            let kept = loc.filter(vec![cell("9"), cell("19"), cell("19 ")]);
            assert_eq!(kept.len(), 2);
        }

        #[test]
        fn test_locator_rejects_hidden() {
            let loc = Locator::new(".cell");
            let hidden = cell("1").with_visible(false);
            assert!(!loc.accepts(&hidden));
            assert!(loc.clone().with_visible(false).accepts(&hidden));
        }

        #[test]
        fn test_locator_within() {
            let loc = Locator::new(".ant-select").with_text("Type").within(".upload-dialog");
            assert_eq!(loc.css(), ".upload-dialog .ant-select");
            assert_eq!(loc.text_filter().map(|f| f.text.as_str()), Some("Type"));
        }

        #[test]
        fn test_locator_display() {
            assert_eq!(
                Locator::new(".opt").containing_text("Act").to_string(),
                ".opt containing \"Act\""
            );
            assert_eq!(Locator::from("#id").to_string(), "#id");
        }
    }
}

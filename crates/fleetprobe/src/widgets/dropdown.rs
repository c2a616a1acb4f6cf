//! List-type select control.

use crate::driver::{ElementHandle, UiDriver};
use crate::locator::{Locator, TextMatch};
use crate::page::Page;
use crate::result::FleetResult;
use serde::{Deserialize, Serialize};

/// Markup contract of the dropdown's option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownSelectors {
    /// Rendered option rows
    pub option: String,
}

impl Default for DropdownSelectors {
    fn default() -> Self {
        Self {
            option: ".ant-select-item-option".to_string(),
        }
    }
}

/// Parameters for [`select_option`]
#[derive(Debug, Clone)]
pub struct DropdownParams {
    /// The select control
    pub target: Locator,
    /// Visible text of the option to pick
    pub value: String,
    /// How option text is compared with `value`
    pub matching: TextMatch,
}

impl DropdownParams {
    /// Create parameters with exact matching
    #[must_use]
    pub fn new(target: impl Into<Locator>, value: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            value: value.into(),
            matching: TextMatch::Exact,
        }
    }

    /// Set the text comparison mode
    #[must_use]
    pub const fn with_matching(mut self, matching: TextMatch) -> Self {
        self.matching = matching;
        self
    }
}

/// Open the control and click the option whose text matches `params.value`.
///
/// With [`TextMatch::Contains`] several options may match; the first is taken
/// and a warning is logged.
pub async fn select_option<D: UiDriver>(
    page: &Page<D>,
    params: &DropdownParams,
    selectors: &DropdownSelectors,
) -> FleetResult<ElementHandle> {
    tracing::debug!(control = %params.target, value = %params.value, "dropdown: open");
    page.click(&params.target).await?;

    let options = Locator::new(selectors.option.as_str())
        .with_text_match(params.value.as_str(), params.matching);
    let mut matches = page.wait_for_all(&options).await?;
    if matches.len() > 1 {
        tracing::warn!(
            value = %params.value,
            count = matches.len(),
            candidates = ?matches.iter().map(|e| e.text.as_str()).collect::<Vec<_>>(),
            "dropdown: several options match, taking the first"
        );
    }
    let option = matches.swap_remove(0);
    page.click_element(&option).await?;
    tracing::info!(value = %option.text, "dropdown: option selected");
    Ok(option)
}

//! Calendar popup: year view, month view, then a day cell.

use crate::driver::{ElementHandle, UiDriver};
use crate::locator::Locator;
use crate::page::Page;
use crate::result::{FleetError, FleetResult};
use crate::temporal::StructuredDate;
use serde::{Deserialize, Serialize};

/// Markup contract of the date picker popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSelectors {
    /// Open popup panel
    pub popup: String,
    /// Header button that switches to the year view
    pub year_button: String,
    /// Cells of the year view
    pub year_cell: String,
    /// Cells of the month view
    pub month_cell: String,
    /// Cells of the day grid
    pub day_cell: String,
    /// Class marking a non-selectable cell
    pub disabled_class: String,
    /// Class marking a cell that belongs to the month on display
    pub in_view_class: String,
}

impl Default for CalendarSelectors {
    fn default() -> Self {
        Self {
            popup: ".ant-picker-dropdown".to_string(),
            year_button: ".ant-picker-year-btn".to_string(),
            year_cell: ".ant-picker-year-panel .ant-picker-cell".to_string(),
            month_cell: ".ant-picker-month-panel .ant-picker-cell".to_string(),
            day_cell: ".ant-picker-date-panel .ant-picker-cell".to_string(),
            disabled_class: "ant-picker-cell-disabled".to_string(),
            in_view_class: "ant-picker-cell-in-view".to_string(),
        }
    }
}

impl CalendarSelectors {
    /// Whether a day cell can be picked: enabled and inside the displayed month
    #[must_use]
    pub fn is_selectable(&self, cell: &ElementHandle) -> bool {
        !cell.disabled && !cell.has_class(&self.disabled_class) && cell.has_class(&self.in_view_class)
    }
}

/// Parameters for [`select_date`]
#[derive(Debug, Clone)]
pub struct CalendarParams {
    /// Control that opens the popup
    pub target: Locator,
    /// Date to pick
    pub date: StructuredDate,
}

impl CalendarParams {
    /// Create parameters
    #[must_use]
    pub fn new(target: impl Into<Locator>, date: StructuredDate) -> Self {
        Self {
            target: target.into(),
            date,
        }
    }
}

/// Pick `params.date` in the popup opened from `params.target`.
///
/// The day cell must be unique among enabled, in-view cells carrying the day
/// label. Returns the clicked cell.
pub async fn select_date<D: UiDriver>(
    page: &Page<D>,
    params: &CalendarParams,
    selectors: &CalendarSelectors,
) -> FleetResult<ElementHandle> {
    let date = &params.date;
    tracing::debug!(control = %params.target, %date, "calendar: open");
    page.click(&params.target).await?;
    page.wait_for(&Locator::new(selectors.popup.as_str())).await?;
    page.settle().await;

    page.click(&Locator::new(selectors.year_button.as_str())).await?;
    page.click(&Locator::new(selectors.year_cell.as_str()).with_text(date.year_label()))
        .await?;
    page.click(&Locator::new(selectors.month_cell.as_str()).with_text(date.month_label()))
        .await?;

    let cells = Locator::new(selectors.day_cell.as_str()).with_text(date.day_label());
    let cells_ref = &cells;
    let description = format!("{cells} in view and enabled");
    let mut candidates = page
        .waiter()
        .until(&description, move || async move {
            let found: Vec<ElementHandle> = page
                .locate(cells_ref)
                .await?
                .into_iter()
                .filter(|cell| selectors.is_selectable(cell))
                .collect();
            Ok((!found.is_empty()).then_some(found))
        })
        .await
        .map_err(|e| match e {
            FleetError::Timeout { ms, .. } => FleetError::ElementNotFound {
                description: description.clone(),
                timeout_ms: ms,
            },
            other => other,
        })?;

    if candidates.len() > 1 {
        return Err(FleetError::AmbiguousMatch {
            description,
            count: candidates.len(),
        });
    }
    let cell = candidates.swap_remove(0);
    page.click_element(&cell).await?;
    tracing::info!(%date, "calendar: date selected");
    Ok(cell)
}

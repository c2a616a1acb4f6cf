//! Interaction primitives for the component library's composite widgets.
//!
//! Each primitive takes a [`Page`](crate::page::Page), a typed parameter
//! struct and the widget's selector contract. [`WidgetSelectors`] bundles the
//! contracts so a suite can override class names from its config file.

pub mod calendar;
pub mod dropdown;
pub mod time_picker;
pub mod upload;

use crate::login::LoginSelectors;
use serde::{Deserialize, Serialize};

pub use calendar::{select_date, CalendarParams, CalendarSelectors};
pub use dropdown::{select_option, DropdownParams, DropdownSelectors};
pub use time_picker::{set_time, SpinnerSelectors, StepStrategy, TimePickerParams, TimePickerSelectors};
pub use upload::{upload_document, upload_typed_document, UploadParams, UploadSelectors, DEFAULT_NOTE};

/// Markup contract of every widget the primitives drive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSelectors {
    /// Date picker popup
    pub calendar: CalendarSelectors,
    /// Time picker spinners
    pub time_picker: TimePickerSelectors,
    /// Select option list
    pub dropdown: DropdownSelectors,
    /// Upload dialog
    pub upload: UploadSelectors,
    /// Login form and landing view
    pub login: LoginSelectors,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let yaml = "calendar:\n  in_view_class: in-month\ndropdown:\n  option: li.option\n";
        let selectors: WidgetSelectors = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(selectors.calendar.in_view_class, "in-month");
        assert_eq!(
            selectors.calendar.disabled_class,
            CalendarSelectors::default().disabled_class
        );
        assert_eq!(selectors.dropdown.option, "li.option");
        assert_eq!(selectors.upload, UploadSelectors::default());
    }
}

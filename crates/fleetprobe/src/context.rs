//! Per-suite test context.
//!
//! A [`TestContext`] is created once at suite setup from a [`SuiteConfig`]
//! and a driver. It carries the base URL, credentials, fixture paths and the
//! widget contract, so test code only passes what varies per call.

use crate::config::SuiteConfig;
use crate::driver::{ElementHandle, UiDriver};
use crate::locator::Locator;
use crate::network::InterceptedResponse;
use crate::page::Page;
use crate::result::FleetResult;
use crate::temporal::{StructuredDate, StructuredTime};
use crate::widgets::{
    calendar, dropdown, time_picker, upload, CalendarParams, DropdownParams, TimePickerParams,
    UploadParams,
};

/// Configuration plus an auto-waiting page
#[derive(Debug)]
pub struct TestContext<D> {
    config: SuiteConfig,
    page: Page<D>,
}

impl<D: UiDriver> TestContext<D> {
    /// Validate `config` and wrap `driver`
    pub fn new(driver: D, config: SuiteConfig) -> FleetResult<Self> {
        config.validate()?;
        let page = Page::new(driver, config.wait);
        Ok(Self { config, page })
    }

    /// The suite configuration
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// The page
    pub const fn page(&self) -> &Page<D> {
        &self.page
    }

    /// Give the driver back, e.g. to close the browser
    pub fn into_driver(self) -> D {
        self.page.into_driver()
    }

    /// Sign in with the configured account
    pub async fn login(&self) -> FleetResult<InterceptedResponse> {
        crate::login::login(
            &self.page,
            &self.config.login_params(),
            &self.config.selectors.login,
        )
        .await
    }

    /// Pick a date in the calendar opened from `target`
    pub async fn select_date(
        &self,
        target: impl Into<Locator>,
        date: StructuredDate,
    ) -> FleetResult<ElementHandle> {
        let params = CalendarParams::new(target, date);
        calendar::select_date(&self.page, &params, &self.config.selectors.calendar).await
    }

    /// Set a time with the default stepping strategy
    pub async fn set_time(
        &self,
        target: impl Into<Locator>,
        time: StructuredTime,
    ) -> FleetResult<StructuredTime> {
        self.set_time_with(&TimePickerParams::new(target, time)).await
    }

    /// Set a time with explicit parameters
    pub async fn set_time_with(&self, params: &TimePickerParams) -> FleetResult<StructuredTime> {
        time_picker::set_time(&self.page, params, &self.config.selectors.time_picker).await
    }

    /// Select the option of `target` whose text equals `value`
    pub async fn select_option(
        &self,
        target: impl Into<Locator>,
        value: impl Into<String>,
    ) -> FleetResult<ElementHandle> {
        self.select_option_with(&DropdownParams::new(target, value))
            .await
    }

    /// Select an option with explicit parameters
    pub async fn select_option_with(&self, params: &DropdownParams) -> FleetResult<ElementHandle> {
        dropdown::select_option(&self.page, params, &self.config.selectors.dropdown).await
    }

    /// Upload parameters for `slot` using the configured fixture and note
    #[must_use]
    pub fn upload_params(&self, slot: impl Into<Locator>, date: StructuredDate) -> UploadParams {
        UploadParams::new(slot, self.config.fixtures.document.clone(), date)
            .with_note(self.config.fixtures.note.clone())
    }

    /// Upload the fixture document into an untyped slot
    pub async fn upload_document(
        &self,
        slot: impl Into<Locator>,
        date: StructuredDate,
    ) -> FleetResult<()> {
        let params = self.upload_params(slot, date);
        upload::upload_document(&self.page, &params, &self.config.selectors).await
    }

    /// Upload the fixture document and set its type
    pub async fn upload_typed_document(
        &self,
        slot: impl Into<Locator>,
        date: StructuredDate,
        document_type: impl Into<String>,
    ) -> FleetResult<()> {
        let params = self.upload_params(slot, date).with_type(document_type);
        upload::upload_typed_document(&self.page, &params, &self.config.selectors).await
    }
}

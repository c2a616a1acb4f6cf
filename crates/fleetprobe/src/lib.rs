//! Fleetprobe: typed UI-interaction primitives for fleet-management E2E tests
//!
//! The fleet web app (medallions, vehicles, drivers, leases) is built on a
//! component library whose date pickers, time spinners, selects and upload
//! dialogs need multi-step choreography to drive. Fleetprobe wraps each of
//! those idioms in a typed primitive that waits under one policy and fails
//! with a precise error.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  TestContext (SuiteConfig: base URL, credentials, fixtures)  │
//! │      │                                                       │
//! │      ▼                                                       │
//! │  login · calendar · time_picker · dropdown · upload          │
//! │      │                                                       │
//! │      ▼                                                       │
//! │  Page (Locator + Waiter)  ───►  UiDriver                     │
//! │                                  ├─ ChromiumDriver (CDP)     │
//! │                                  └─ MockDriver (in memory)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let driver = ChromiumDriver::launch(BrowserConfig::default()).await?;
//! let ctx = TestContext::new(driver, SuiteConfig::load(path)?)?;
//! ctx.login().await?;
//! ctx.select_date("#leaseStart", StructuredDate::parse("2025", "Mar", "19")?).await?;
//! ctx.upload_typed_document("#registration", date, "Vehicle Registration").await?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod driver;
pub mod ident;
pub mod locator;
pub mod login;
pub mod mock;
pub mod network;
pub mod page;
mod result;
pub mod temporal;
pub mod wait;
#[allow(clippy::missing_errors_doc, clippy::future_not_send)]
pub mod widgets;

/// Chromium driver over CDP
#[cfg(feature = "browser")]
pub mod browser;

#[cfg(feature = "browser")]
pub use browser::{BrowserConfig, ChromiumDriver};
pub use config::{Fixtures, LoginSettings, SuiteConfig};
pub use context::TestContext;
pub use driver::{ElementHandle, UiDriver};
pub use ident::{dmv_license_number, medallion_number, vin};
pub use locator::{Locator, TextMatch};
pub use login::{login, Credentials, LoginParams, LoginSelectors};
pub use mock::{DriverCall, MockDriver, Reaction};
pub use network::{HttpMethod, InterceptedResponse, Route, UrlPattern, UrlRegex};
pub use page::Page;
pub use result::{FleetError, FleetResult};
pub use temporal::{format_canonical, Month, StructuredDate, StructuredTime, TimeUnit};
pub use wait::{WaitPolicy, Waiter};
pub use widgets::{
    select_date, select_option, set_time, upload_document, upload_typed_document, CalendarParams,
    CalendarSelectors, DropdownParams, DropdownSelectors, StepStrategy, TimePickerParams,
    TimePickerSelectors, UploadParams, UploadSelectors, WidgetSelectors,
};

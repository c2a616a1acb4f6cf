//! Time picker with one increment/decrement spinner per unit.
//!
//! Each unit is adjusted by clicking its arrow once per step and waiting for
//! the display to show the next value before clicking again.

use crate::driver::UiDriver;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::{FleetError, FleetResult};
use crate::temporal::{StructuredTime, TimeUnit};
use serde::{Deserialize, Serialize};

/// How the picker walks from the displayed value to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStrategy {
    /// Signed difference `target - current`, never crossing the wrap boundary
    #[default]
    Direct,
    /// Fewest clicks, wrapping around the unit's range when shorter
    Shortest,
}

impl StepStrategy {
    /// Signed number of steps for `unit` from `current` to `target`.
    /// Positive means increments.
    #[must_use]
    pub fn plan(self, unit: TimeUnit, current: u32, target: u32) -> i64 {
        let diff = i64::from(target) - i64::from(current);
        match self {
            Self::Direct => diff,
            Self::Shortest => {
                let modulus = i64::from(unit.modulus());
                let up = diff.rem_euclid(modulus);
                let down = modulus - up;
                if up == 0 {
                    0
                } else if up <= down {
                    up
                } else {
                    -down
                }
            }
        }
    }

    /// Value the display should show after one step from `value`
    #[must_use]
    pub fn next(self, unit: TimeUnit, value: u32, increment: bool) -> u32 {
        let modulus = i64::from(unit.modulus());
        let step = if increment { 1 } else { -1 };
        let next = i64::from(value) + step;
        let next = match self {
            Self::Direct => next.clamp(0, modulus - 1),
            Self::Shortest => next.rem_euclid(modulus),
        };
        u32::try_from(next).unwrap_or_default()
    }
}

/// Display and arrow controls of one spinner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinnerSelectors {
    /// Element showing the current value
    pub display: String,
    /// Arrow that adds one
    pub increment: String,
    /// Arrow that subtracts one
    pub decrement: String,
}

impl SpinnerSelectors {
    fn for_unit(unit: &str) -> Self {
        let root = format!(".time-spinner-{unit}");
        Self {
            display: format!("{root} .time-spinner-value"),
            increment: format!("{root} .time-spinner-up"),
            decrement: format!("{root} .time-spinner-down"),
        }
    }
}

/// Markup contract of the time picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimePickerSelectors {
    /// Open picker panel
    pub panel: String,
    /// Hour spinner
    pub hour: SpinnerSelectors,
    /// Minute spinner
    pub minute: SpinnerSelectors,
    /// Second spinner
    pub second: SpinnerSelectors,
}

impl Default for TimePickerSelectors {
    fn default() -> Self {
        Self {
            panel: ".time-picker-panel".to_string(),
            hour: SpinnerSelectors::for_unit("hour"),
            minute: SpinnerSelectors::for_unit("minute"),
            second: SpinnerSelectors::for_unit("second"),
        }
    }
}

impl TimePickerSelectors {
    /// Spinner for `unit`
    #[must_use]
    pub const fn spinner(&self, unit: TimeUnit) -> &SpinnerSelectors {
        match unit {
            TimeUnit::Hour => &self.hour,
            TimeUnit::Minute => &self.minute,
            TimeUnit::Second => &self.second,
        }
    }
}

/// Parameters for [`set_time`]
#[derive(Debug, Clone)]
pub struct TimePickerParams {
    /// Control that opens the picker
    pub target: Locator,
    /// Time to set
    pub time: StructuredTime,
    /// Stepping strategy
    pub strategy: StepStrategy,
}

impl TimePickerParams {
    /// Create parameters with the default strategy
    #[must_use]
    pub fn new(target: impl Into<Locator>, time: StructuredTime) -> Self {
        Self {
            target: target.into(),
            time,
            strategy: StepStrategy::default(),
        }
    }

    /// Set the stepping strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: StepStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

async fn read_value<D: UiDriver>(page: &Page<D>, unit: TimeUnit, display: &Locator) -> FleetResult<u32> {
    let text = page.read_stable_text(display).await?;
    text.trim().parse().map_err(|_| {
        FleetError::assertion(format!("{unit} display shows {text:?}, not a number"))
    })
}

/// Open the picker at `params.target` and step every unit to `params.time`.
///
/// Units are adjusted hour, minute, second. Returns the time shown once all
/// three spinners have settled.
pub async fn set_time<D: UiDriver>(
    page: &Page<D>,
    params: &TimePickerParams,
    selectors: &TimePickerSelectors,
) -> FleetResult<StructuredTime> {
    let strategy = params.strategy;
    tracing::debug!(control = %params.target, time = %params.time, ?strategy, "time picker: open");
    page.click(&params.target).await?;
    page.wait_for(&Locator::new(selectors.panel.as_str())).await?;
    page.settle().await;

    let mut shown = [0u32; 3];
    for (slot, unit) in TimeUnit::ORDER.into_iter().enumerate() {
        let spinner = selectors.spinner(unit);
        let display = Locator::new(spinner.display.as_str());
        let target = params.time.get(unit);
        let mut value = read_value(page, unit, &display).await?;
        let steps = strategy.plan(unit, value, target);
        let increment = steps > 0;
        let arrow = Locator::new(if increment {
            spinner.increment.as_str()
        } else {
            spinner.decrement.as_str()
        });
        tracing::debug!(%unit, from = value, to = target, steps, "time picker: adjust");

        for _ in 0..steps.unsigned_abs() {
            page.click(&arrow).await?;
            let expected = strategy.next(unit, value, increment);
            let display_ref = &display;
            page.waiter()
                .until(&format!("{unit} display to show {expected:02}"), move || async move {
                    let text = page
                        .locate(display_ref)
                        .await?
                        .into_iter()
                        .next()
                        .map(|e| e.text);
                    Ok(text
                        .and_then(|t| t.trim().parse::<u32>().ok())
                        .filter(|v| *v == expected)
                        .map(|_| ()))
                })
                .await?;
            value = expected;
        }
        shown[slot] = value;
    }

    let time = StructuredTime::new(shown[0], shown[1], shown[2])?;
    tracing::info!(%time, "time picker: time set");
    Ok(time)
}

//! Calendar and clock values consumed by the date and time primitives.
//!
//! The widgets render the month as a 3-letter abbreviation and the day
//! without padding; forms display dates as `MM/DD/YYYY`.

use crate::result::{FleetError, FleetResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Month as labelled in the date picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    /// January
    Jan,
    /// February
    Feb,
    /// March
    Mar,
    /// April
    Apr,
    /// May
    May,
    /// June
    Jun,
    /// July
    Jul,
    /// August
    Aug,
    /// September
    Sep,
    /// October
    Oct,
    /// November
    Nov,
    /// December
    Dec,
}

impl Month {
    /// All months in calendar order
    pub const ALL: [Self; 12] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];

    /// 3-letter abbreviation
    #[must_use]
    pub const fn abbrev(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        }
    }

    /// 1-based month number
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Month from its 1-based number
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }
}

impl FromStr for Month {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.abbrev() == s)
            .ok_or_else(|| FleetError::InvalidDate {
                message: format!("unknown month abbreviation {s:?}"),
            })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

// =============================================================================
// STRUCTURED DATE
// =============================================================================

/// A calendar date as the date picker presents it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DateParts", into = "DateParts")]
pub struct StructuredDate {
    date: NaiveDate,
}

/// Wire form of [`StructuredDate`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct DateParts {
    year: i32,
    month: Month,
    day: u32,
}

impl TryFrom<DateParts> for StructuredDate {
    type Error = FleetError;

    fn try_from(parts: DateParts) -> FleetResult<Self> {
        Self::new(parts.year, parts.month, parts.day)
    }
}

impl From<StructuredDate> for DateParts {
    fn from(date: StructuredDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl StructuredDate {
    /// Build from the widget's string labels, e.g. `("2025", "Mar", "19")`.
    pub fn parse(year: &str, month: &str, date: &str) -> FleetResult<Self> {
        let year = year.trim().parse::<i32>().map_err(|_| FleetError::InvalidDate {
            message: format!("year {year:?} is not a number"),
        })?;
        let month = month.trim().parse::<Month>()?;
        let day = date.trim().parse::<u32>().map_err(|_| FleetError::InvalidDate {
            message: format!("day {date:?} is not a number"),
        })?;
        Self::new(year, month, day)
    }

    /// Build from typed parts, checking the day exists in that month.
    pub fn new(year: i32, month: Month, day: u32) -> FleetResult<Self> {
        if !(1..=9999).contains(&year) {
            return Err(FleetError::InvalidDate {
                message: format!("year {year} outside 1..=9999"),
            });
        }
        NaiveDate::from_ymd_opt(year, month.number(), day)
            .map(|date| Self { date })
            .ok_or_else(|| FleetError::InvalidDate {
                message: format!("{month} {day}, {year} does not exist"),
            })
    }

    /// Convert from a chrono date; years outside `1..=9999` are rejected
    pub fn from_naive(date: NaiveDate) -> FleetResult<Self> {
        Self::new(date.year(), Month::ALL[date.month0() as usize], date.day())
    }

    /// Convert to a chrono date
    #[must_use]
    pub const fn to_naive(&self) -> NaiveDate {
        self.date
    }

    /// Today's local date
    #[must_use]
    pub fn today() -> Self {
        Self {
            date: chrono::Local::now().date_naive(),
        }
    }

    /// Year
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month
    #[must_use]
    pub fn month(&self) -> Month {
        Month::ALL[self.date.month0() as usize]
    }

    /// Day of month
    #[must_use]
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// Year cell label, e.g. `"2025"`
    #[must_use]
    pub fn year_label(&self) -> String {
        self.year().to_string()
    }

    /// Month cell label, e.g. `"Mar"`
    #[must_use]
    pub fn month_label(&self) -> &'static str {
        self.month().abbrev()
    }

    /// Day cell label, unpadded, e.g. `"3"`
    #[must_use]
    pub fn day_label(&self) -> String {
        self.day().to_string()
    }

    /// Canonical `MM/DD/YYYY` form used by the forms
    #[must_use]
    pub fn to_canonical(&self) -> String {
        format!("{:02}/{:02}/{:04}", self.month().number(), self.day(), self.year())
    }
}

impl fmt::Display for StructuredDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

/// String-in, string-out canonical formatting: `("2025", "Jan", "3")` gives
/// `"01/03/2025"`.
pub fn format_canonical(year: &str, month: &str, date: &str) -> FleetResult<String> {
    StructuredDate::parse(year, month, date).map(|d| d.to_canonical())
}

// =============================================================================
// STRUCTURED TIME
// =============================================================================

/// Unit of a time spinner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Hours, 0-23
    Hour,
    /// Minutes, 0-59
    Minute,
    /// Seconds, 0-59
    Second,
}

impl TimeUnit {
    /// Adjustment order used by the time picker
    pub const ORDER: [Self; 3] = [Self::Hour, Self::Minute, Self::Second];

    /// Number of distinct values the spinner cycles through
    #[must_use]
    pub const fn modulus(self) -> u32 {
        match self {
            Self::Hour => 24,
            Self::Minute | Self::Second => 60,
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 24-hour wall clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeParts", into = "TimeParts")]
pub struct StructuredTime {
    hour: u32,
    minute: u32,
    second: u32,
}

/// Wire form of [`StructuredTime`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct TimeParts {
    hour: u32,
    minute: u32,
    second: u32,
}

impl TryFrom<TimeParts> for StructuredTime {
    type Error = FleetError;

    fn try_from(parts: TimeParts) -> FleetResult<Self> {
        Self::new(parts.hour, parts.minute, parts.second)
    }
}

impl From<StructuredTime> for TimeParts {
    fn from(time: StructuredTime) -> Self {
        Self {
            hour: time.hour,
            minute: time.minute,
            second: time.second,
        }
    }
}

impl StructuredTime {
    /// Build from numeric parts
    pub fn new(hour: u32, minute: u32, second: u32) -> FleetResult<Self> {
        let time = Self {
            hour,
            minute,
            second,
        };
        for unit in TimeUnit::ORDER {
            if time.get(unit) >= unit.modulus() {
                return Err(FleetError::InvalidTime {
                    message: format!("{unit} {} outside 0..{}", time.get(unit), unit.modulus()),
                });
            }
        }
        Ok(time)
    }

    /// Build from 1-2 digit strings, e.g. `("15", "03", "31")`
    pub fn parse(hour: &str, minute: &str, second: &str) -> FleetResult<Self> {
        Self::new(
            parse_component(TimeUnit::Hour, hour)?,
            parse_component(TimeUnit::Minute, minute)?,
            parse_component(TimeUnit::Second, second)?,
        )
    }

    /// Component value
    #[must_use]
    pub const fn get(&self, unit: TimeUnit) -> u32 {
        match unit {
            TimeUnit::Hour => self.hour,
            TimeUnit::Minute => self.minute,
            TimeUnit::Second => self.second,
        }
    }

    /// Hour
    #[must_use]
    pub const fn hour(&self) -> u32 {
        self.hour
    }

    /// Minute
    #[must_use]
    pub const fn minute(&self) -> u32 {
        self.minute
    }

    /// Second
    #[must_use]
    pub const fn second(&self) -> u32 {
        self.second
    }
}

fn parse_component(unit: TimeUnit, raw: &str) -> FleetResult<u32> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FleetError::InvalidTime {
            message: format!("{unit} {raw:?} is not a 1-2 digit number"),
        });
    }
    raw.parse::<u32>().map_err(|_| FleetError::InvalidTime {
        message: format!("{unit} {raw:?} is not a number"),
    })
}

impl FromStr for StructuredTime {
    type Err = FleetError;

    /// Parses `HH:MM:SS`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), Some(sec), None) => Self::parse(h, m, sec),
            _ => Err(FleetError::InvalidTime {
                message: format!("{s:?} is not HH:MM:SS"),
            }),
        }
    }
}

impl fmt::Display for StructuredTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod month_tests {
        use super::*;

        #[test]
        fn test_month_round_trip_labels() {
            for (i, month) in Month::ALL.into_iter().enumerate() {
                assert_eq!(month.number(), i as u32 + 1);
                assert_eq!(month.abbrev().parse::<Month>().unwrap(), month);
                assert_eq!(Month::from_number(month.number()), Some(month));
            }
        }

        #[test]
        fn test_month_rejects_unknown() {
            assert!("March".parse::<Month>().is_err());
            assert!("mar".parse::<Month>().is_err());
            assert!("".parse::<Month>().is_err());
            assert_eq!(Month::from_number(0), None);
            assert_eq!(Month::from_number(13), None);
        }
    }

    mod date_tests {
        use super::*;

        #[test]
        fn test_canonical_pads_day() {
            let date = StructuredDate::parse("2025", "Jan", "3").unwrap();
            assert_eq!(date.to_canonical(), "01/03/2025");
            assert_eq!(date.day_label(), "3");
            assert_eq!(date.month_label(), "Jan");
            assert_eq!(date.year_label(), "2025");
        }

        #[test]
        fn test_canonical_two_digit_day() {
            assert_eq!(
                format_canonical("2024", "Dec", "25").unwrap(),
                "12/25/2024"
            );
        }

        #[test]
        fn test_invalid_month_is_an_error() {
            let err = format_canonical("2025", "Sept", "1").unwrap_err();
            assert!(matches!(err, FleetError::InvalidDate { .. }));
        }

        #[test]
        fn test_nonexistent_day_rejected() {
            assert!(StructuredDate::parse("2025", "Feb", "29").is_err());
            assert!(StructuredDate::parse("2024", "Feb", "29").is_ok());
            assert!(StructuredDate::parse("2025", "Apr", "31").is_err());
            assert!(StructuredDate::parse("2025", "Apr", "0").is_err());
            assert!(StructuredDate::parse("twenty", "Apr", "1").is_err());
        }

        #[test]
        fn test_naive_conversion() {
            let naive = NaiveDate::from_ymd_opt(2025, 3, 19).unwrap();
            let date = StructuredDate::from_naive(naive).unwrap();
            assert_eq!(date.month(), Month::Mar);
            assert_eq!(date.day(), 19);
            assert_eq!(date.to_naive(), naive);
            assert!(StructuredDate::from_naive(NaiveDate::MIN).is_err());
        }

        #[test]
        fn test_deserialize_checks_day_exists() {
            let date: StructuredDate =
                serde_json::from_str(r#"{"year":2025,"month":"Mar","day":19}"#).unwrap();
            assert_eq!(date.to_canonical(), "03/19/2025");
            assert_eq!(
                serde_json::to_value(date).unwrap(),
                serde_json::json!({"year": 2025, "month": "Mar", "day": 19})
            );
            let err = serde_json::from_str::<StructuredDate>(r#"{"year":2025,"month":"Feb","day":31}"#)
                .unwrap_err();
            assert!(err.to_string().contains("does not exist"));
        }
    }

    mod time_tests {
        use super::*;

        #[test]
        fn test_time_parse_and_display() {
            let time: StructuredTime = "15:03:31".parse().unwrap();
            assert_eq!(time.hour(), 15);
            assert_eq!(time.minute(), 3);
            assert_eq!(time.second(), 31);
            assert_eq!(time.to_string(), "15:03:31");
        }

        #[test]
        fn test_time_range_checks() {
            assert!(StructuredTime::new(24, 0, 0).is_err());
            assert!(StructuredTime::new(0, 60, 0).is_err());
            assert!(StructuredTime::new(0, 0, 60).is_err());
            assert!(StructuredTime::new(23, 59, 59).is_ok());
        }

        #[test]
        fn test_deserialize_checks_range() {
            let time: StructuredTime =
                serde_json::from_str(r#"{"hour":15,"minute":3,"second":31}"#).unwrap();
            assert_eq!(time.to_string(), "15:03:31");
            assert!(serde_json::from_str::<StructuredTime>(r#"{"hour":25,"minute":0,"second":0}"#).is_err());
        }

        #[test]
        fn test_time_component_format() {
            assert!(StructuredTime::parse("1", "2", "3").is_ok());
            assert!(StructuredTime::parse("123", "0", "0").is_err());
            assert!(StructuredTime::parse("-1", "0", "0").is_err());
            assert!("15:03".parse::<StructuredTime>().is_err());
        }

        #[test]
        fn test_unit_modulus() {
            assert_eq!(TimeUnit::Hour.modulus(), 24);
            assert_eq!(TimeUnit::Minute.modulus(), 60);
            assert_eq!(TimeUnit::Second.modulus(), 60);
        }
    }

    proptest! {
        #[test]
        fn prop_single_digit_days_are_zero_padded(
            month in 0usize..12,
            day in 1u32..=9,
            year in 1900i32..2100,
        ) {
            let month = Month::ALL[month];
            let formatted = format_canonical(&year.to_string(), month.abbrev(), &day.to_string()).unwrap();
            let re = regex::Regex::new(r"^\d{2}/0\d/\d{4}$").unwrap();
            prop_assert!(re.is_match(&formatted), "{formatted}");
            prop_assert_eq!(&formatted[..2], format!("{:02}", month.number()));
        }
    }
}

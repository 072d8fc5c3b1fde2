//! Date sources for the cache
//!
//! The cache only ever asks "what calendar day is it?". Entries are valid for
//! exactly the day reported here.

use chrono::{Days, Local, NaiveDate, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Format of a date-stamp (`2025-08-21`)
pub const DATE_STAMP_FORMAT: &str = "%Y-%m-%d";

/// Render a date as a date-stamp
pub fn date_stamp(date: NaiveDate) -> String {
    date.format(DATE_STAMP_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date-stamp
pub fn parse_date_stamp(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_STAMP_FORMAT).map_err(|source| Error::InvalidDate {
        input: input.to_string(),
        source,
    })
}

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    /// Today's date
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Calendar date in the process's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Calendar date in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcClock;

impl Clock for UtcClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock whose date only changes when told to
///
/// Share it with a cache through an `Arc` to simulate day rollover.
#[derive(Debug)]
pub struct ManualClock {
    date: RwLock<NaiveDate>,
}

impl ManualClock {
    /// Create a clock fixed at `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: RwLock::new(date),
        }
    }

    /// Create a clock fixed at a `YYYY-MM-DD` date-stamp
    pub fn parse(stamp: &str) -> Result<Self> {
        parse_date_stamp(stamp).map(Self::new)
    }

    /// Move the clock to `date`
    pub fn set(&self, date: NaiveDate) {
        *self.date.write() = date;
    }

    /// Move the clock forward by `days`, saturating at the last
    /// representable date
    pub fn advance(&self, days: u64) {
        let mut date = self.date.write();
        *date = date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.date.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_stamp_format() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        assert_eq!(date_stamp(date), "2025-08-01");
    }

    #[test]
    fn test_parse_date_stamp() {
        let date = parse_date_stamp("2025-08-21").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 21).unwrap());

        assert!(matches!(
            parse_date_stamp("2025/08/21"),
            Err(Error::InvalidDate { .. })
        ));
        assert!(parse_date_stamp("2025-02-30").is_err());
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::parse("2025-08-21").unwrap();
        assert_eq!(date_stamp(clock.today()), "2025-08-21");

        clock.advance(1);
        assert_eq!(date_stamp(clock.today()), "2025-08-22");

        // Month boundary
        clock.advance(10);
        assert_eq!(date_stamp(clock.today()), "2025-09-01");
    }

    #[test]
    fn test_manual_clock_set_and_saturate() {
        let clock = ManualClock::parse("2025-08-21").unwrap();

        clock.set(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(date_stamp(clock.today()), "2024-01-01");

        clock.set(NaiveDate::MAX);
        clock.advance(1);
        assert_eq!(clock.today(), NaiveDate::MAX);
    }

    #[test]
    fn test_shared_clock() {
        let clock = Arc::new(ManualClock::parse("2025-08-21").unwrap());
        let shared: Box<dyn Clock> = Box::new(Arc::clone(&clock));

        clock.advance(1);
        assert_eq!(date_stamp(shared.today()), "2025-08-22");
    }

    #[test]
    fn test_system_clocks_agree_within_a_day() {
        let local = LocalClock.today();
        let utc = UtcClock.today();

        let diff = (local - utc).num_days().abs();
        assert!(diff <= 1);
    }
}

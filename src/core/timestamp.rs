//! Timestamp formatting utilities
//!
//! The file sink embeds a `yyyy_MM_dd` date in every file name and prefixes
//! every entry with an `HH:mm:ss.SSS` time of day. Both are rendered in local
//! time. The [`Clock`] trait lets tests pin "now".

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use parking_lot::Mutex;
use std::sync::Arc;

/// strftime pattern of the date embedded in log file names
pub const FILE_DATE_FORMAT: &str = "%Y_%m_%d";

/// strftime pattern of the time prefix of each file entry
pub const ENTRY_TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Milliseconds in one retention day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Format the date segment of a log file name, e.g. `2024_01_06`
#[must_use]
pub fn file_date(datetime: &DateTime<Local>) -> String {
    datetime.format(FILE_DATE_FORMAT).to_string()
}

/// Format the time-of-day prefix of a file entry, e.g. `10:30:45.123`
#[must_use]
pub fn entry_time(datetime: &DateTime<Local>) -> String {
    datetime.format(ENTRY_TIME_FORMAT).to_string()
}

/// Parse a `yyyy_MM_dd` segment into midnight of that day
///
/// Parsing is strict: `2024_13_45` is rejected rather than rolled over.
#[must_use]
pub fn parse_file_date(segment: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(segment, FILE_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a settable instant
///
/// # Examples
///
/// ```
/// use rust_log_utils::core::timestamp::{Clock, FixedClock};
///
/// let clock = FixedClock::at_local(2024, 1, 6, 9, 30, 0);
/// assert_eq!(clock.now().format("%Y_%m_%d").to_string(), "2024_01_06");
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Build a clock from local wall-clock fields
    ///
    /// # Panics
    ///
    /// Panics if the fields do not name a valid local time
    pub fn at_local(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let now = Local
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .earliest()
            .expect("valid local datetime");
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}

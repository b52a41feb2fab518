//! Year-agnostic position within the calendar.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Year onto which every observation is projected when regrouping.
///
/// 2000 is a leap year, so February 29 is representable.
pub const REFERENCE_YEAR: i32 = 2000;

/// Position of a timestamp within any year: month, day and time of day.
///
/// Ordering follows the calendar (January 1 00:00 first, December 31 last).
/// February 29 is a valid position; it only exists in leap years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarPosition {
    month: u8,
    day: u8,
    seconds: u32,
}

impl CalendarPosition {
    /// Creates a position from month, day and seconds after midnight.
    ///
    /// Returns `None` if the month/day pair does not exist in the leap
    /// reference year or `seconds` is not within a day.
    pub fn new(month: u8, day: u8, seconds: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, u32::from(month), u32::from(day))?;
        if seconds >= 86_400 {
            return None;
        }
        Some(Self {
            month,
            day,
            seconds,
        })
    }

    /// Returns the position of `timestamp`, discarding its year.
    pub fn of(timestamp: NaiveDateTime) -> Self {
        // chrono guarantees month in 1..=12, day in 1..=31.
        Self {
            month: timestamp.month() as u8,
            day: timestamp.day() as u8,
            seconds: timestamp.num_seconds_from_midnight(),
        }
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day within the month (1..=31).
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the seconds after midnight.
    pub fn seconds(self) -> u32 {
        self.seconds
    }

    /// Returns `true` for February 29.
    pub fn is_leap_day(self) -> bool {
        self.month == 2 && self.day == 29
    }

    /// Returns this position as a date in the reference year.
    pub fn reference_date(self) -> NaiveDate {
        // Every valid position exists in the leap reference year.
        self.date_in(REFERENCE_YEAR).unwrap_or(NaiveDate::MIN)
    }

    /// Returns the date of this position in `year`, or `None` when the
    /// position is February 29 and `year` is not a leap year.
    pub fn date_in(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, u32::from(self.month), u32::from(self.day))
    }

    /// Returns the timestamp of this position in `year`, or `None` when the
    /// position does not exist in that year.
    pub fn in_year(self, year: i32) -> Option<NaiveDateTime> {
        let time = NaiveTime::from_num_seconds_from_midnight_opt(self.seconds, 0)?;
        Some(self.date_in(year)?.and_time(time))
    }
}

/// Returns `true` if `year` has a February 29.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

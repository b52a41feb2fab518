//! Calendar frequencies: parsing, inference and group keys.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::error::CalendarError;
use crate::notice::{Diagnostics, NoticeKind};
use crate::position::{CalendarPosition, REFERENCE_YEAR};

/// Calendar granularity at which observations are grouped and fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Frequency {
    /// One group per calendar day.
    Daily,
    /// One group per week, weeks ending on Sunday.
    Weekly,
    /// One group per calendar month.
    Monthly,
}

impl Frequency {
    /// Parses a frequency token.
    ///
    /// Accepts `D`, `W`, anchored weekly tokens such as `W-SUN` or `W-MON`
    /// (all normalized to [`Frequency::Weekly`]) and the monthly tokens `M`,
    /// `ME` and `MS`. Surrounding whitespace is ignored; letters are
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::UnsupportedFrequency`] for anything else.
    pub fn parse(token: &str) -> Result<Self, CalendarError> {
        let upper = token.trim().to_ascii_uppercase();
        match upper.as_str() {
            "D" | "1D" => Ok(Self::Daily),
            "W" | "1W" => Ok(Self::Weekly),
            "M" | "ME" | "MS" | "1M" => Ok(Self::Monthly),
            s if s
                .strip_prefix("W-")
                .is_some_and(|day| day.parse::<Weekday>().is_ok()) =>
            {
                Ok(Self::Weekly)
            }
            _ => Err(CalendarError::UnsupportedFrequency {
                token: token.to_string(),
            }),
        }
    }

    /// Canonical token: `D`, `W` or `M`.
    pub fn token(self) -> &'static str {
        match self {
            Self::Daily => "D",
            Self::Weekly => "W",
            Self::Monthly => "M",
        }
    }

    /// Returns `true` for frequencies that support a rolling fit window.
    pub fn supports_fit_window(self) -> bool {
        matches!(self, Self::Daily | Self::Weekly)
    }

    /// Number of days spanned by one period, used to convert a window
    /// expressed in periods into calendar positions.
    pub fn window_days(self) -> Option<usize> {
        match self {
            Self::Daily => Some(1),
            Self::Weekly => Some(7),
            Self::Monthly => None,
        }
    }

    /// Key of the group that owns `position`, as a date in the reference
    /// year.
    ///
    /// Daily groups are keyed by the position's own date, weekly groups by
    /// the Sunday on or after it and monthly groups by the month's last day.
    pub fn group_key(self, position: CalendarPosition) -> NaiveDate {
        let date = position.reference_date();
        match self {
            Self::Daily => date,
            Self::Weekly => {
                let ahead = (7 - date.weekday().num_days_from_sunday()) % 7;
                date + Duration::days(i64::from(ahead))
            }
            Self::Monthly => month_end(REFERENCE_YEAR, date.month()),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

fn month_end(year: i32, month: u32) -> NaiveDate {
    let (y, m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

fn is_month_end(t: NaiveDateTime) -> bool {
    t.date().succ_opt().is_some_and(|next| next.month() != t.month())
}

fn month_number(t: NaiveDateTime) -> i64 {
    i64::from(t.year()) * 12 + i64::from(t.month0())
}

/// Infers the sampling frequency of a chronologically ordered index.
///
/// Recognises constant 1-day spacing, constant 7-day spacing and monthly
/// spacing (consecutive months on the same day of month, or on month
/// ends). Anything else, including indices with fewer than three
/// timestamps, falls back to [`Frequency::Monthly`] and records a
/// [`NoticeKind::FrequencyFallback`] notice.
pub fn infer_frequency(index: &[NaiveDateTime], diagnostics: &mut Diagnostics) -> Frequency {
    if index.len() >= 3 {
        let steps: Vec<Duration> = index.windows(2).map(|w| w[1] - w[0]).collect();
        if steps.iter().all(|&d| d == Duration::days(1)) {
            return Frequency::Daily;
        }
        if steps.iter().all(|&d| d == Duration::days(7)) {
            return Frequency::Weekly;
        }
        let monthly = index.windows(2).all(|w| {
            month_number(w[1]) - month_number(w[0]) == 1
                && w[0].time() == w[1].time()
                && (w[0].day() == w[1].day() || (is_month_end(w[0]) && is_month_end(w[1])))
        });
        if monthly {
            return Frequency::Monthly;
        }
    }

    diagnostics.push(
        NoticeKind::FrequencyFallback,
        "could not infer a regular frequency from the index; using monthly ('M')",
    );
    Frequency::Monthly
}

//! Error types for the spei-si crate.

use chrono::{NaiveDate, NaiveDateTime};
use spei_calendar::CalendarError;
use spei_dist::DistError;

/// Broad failure category, for callers that branch on the cause rather than
/// the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input is not a single labeled series.
    Type,
    /// The input values or index cannot be used as given.
    Value,
    /// The requested combination of options is not supported.
    Config,
    /// A distribution could not be fitted to a group.
    Numerical,
    /// A lookup found no matching fitted group.
    Lookup,
}

/// Error type for all fallible operations in the spei-si crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SiError {
    /// Wrapped error from the spei-calendar crate.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Wrapped error from the spei-dist crate.
    #[error(transparent)]
    Dist(#[from] DistError),

    /// Returned when fitting one calendar group fails; aborts the whole run.
    #[error("fitting group {group} failed: {source}")]
    GroupFit {
        /// Key date of the failing group in the reference year.
        group: NaiveDate,
        /// Underlying fit error.
        source: DistError,
    },

    /// Returned when a fit window is combined with a frequency other than
    /// daily or weekly.
    #[error("frequency fit_freq must be 'D' or 'W', not '{token}', if a fit_window is provided")]
    InvalidFitWindowFrequency {
        /// Frequency token as given.
        token: String,
    },

    /// Returned by `get_dist` when no fitted group contains the timestamp.
    #[error("no fitted distribution contains {timestamp}")]
    DateNotFound {
        /// The timestamp that was looked up.
        timestamp: NaiveDateTime,
    },

    /// Returned when an operation needs a fitted distribution but the
    /// normal-scores transform is active.
    #[error("{operation} is not available with the normal-scores transform")]
    NormalScoresUnsupported {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// Returned when no observations remain after rolling aggregation.
    #[error("series is empty after aggregating over {timescale} periods")]
    EmptySeries {
        /// Accumulation timescale that was applied.
        timescale: usize,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl SiError {
    /// Broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Calendar(e) => calendar_kind(e),
            Self::Dist(e) | Self::GroupFit { source: e, .. } => dist_kind(e),
            Self::InvalidFitWindowFrequency { .. }
            | Self::NormalScoresUnsupported { .. }
            | Self::InvalidConfig { .. } => ErrorKind::Config,
            Self::DateNotFound { .. } => ErrorKind::Lookup,
            Self::EmptySeries { .. } => ErrorKind::Value,
        }
    }
}

fn calendar_kind(e: &CalendarError) -> ErrorKind {
    match e {
        _ if e.is_shape_error() => ErrorKind::Type,
        CalendarError::UnsupportedFrequency { .. } | CalendarError::InvalidWindow { .. } => {
            ErrorKind::Config
        }
        _ => ErrorKind::Value,
    }
}

fn dist_kind(e: &DistError) -> ErrorKind {
    if e.is_config_error() {
        ErrorKind::Config
    } else {
        ErrorKind::Numerical
    }
}

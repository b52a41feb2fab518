//! Error types for the spei-calendar crate.

/// Error type for all fallible operations in the spei-calendar crate.
///
/// Covers input-shape failures (the caller handed over something that is not
/// a single labeled series), index failures (labels that cannot be read as
/// timestamps, duplicates) and unsupported calendar frequencies.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when the input carries no index labels at all.
    #[error("expected a labeled time series, got {found}")]
    NotASeries {
        /// Short description of what was provided instead.
        found: String,
    },

    /// Returned when a table with more than one value column is provided.
    #[error("expected a single series, got a table with {n_columns} columns")]
    MultipleColumns {
        /// Number of value columns in the table.
        n_columns: usize,
    },

    /// Returned when a table has no value column.
    #[error("table has no value column")]
    NoColumns,

    /// Returned when index labels and values differ in length.
    #[error("length mismatch: index has {index_len} labels, values has {values_len}")]
    LengthMismatch {
        /// Number of index labels.
        index_len: usize,
        /// Number of values.
        values_len: usize,
    },

    /// Returned when an index label cannot be parsed as a timestamp.
    #[error("cannot interpret index label {label:?} as a timestamp")]
    UnparseableLabel {
        /// The offending label.
        label: String,
    },

    /// Returned when the same timestamp occurs more than once.
    #[error("duplicate timestamp {timestamp} in index; remove duplicates before computing an index")]
    DuplicateTimestamp {
        /// The first duplicated timestamp, formatted.
        timestamp: String,
    },

    /// Returned when a frequency token is not one of the supported tokens.
    #[error("unsupported frequency {token:?} (expected one of D, W, W-<DAY>, M, ME, MS)")]
    UnsupportedFrequency {
        /// The token that was provided.
        token: String,
    },

    /// Returned when a window length of zero is requested.
    #[error("invalid window: {reason}")]
    InvalidWindow {
        /// Description of the problem.
        reason: String,
    },
}

impl CalendarError {
    /// Returns `true` for errors caused by the shape of the input rather
    /// than by its contents.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::NotASeries { .. } | Self::MultipleColumns { .. } | Self::NoColumns
        )
    }
}

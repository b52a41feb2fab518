//! Timestamp-indexed series of observations.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::CalendarError;

/// Aggregation applied over a trailing rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggFunc {
    /// Sum of the window (accumulated precipitation, discharge volume).
    #[default]
    Sum,
    /// Arithmetic mean of the window (levels, soil moisture).
    Mean,
}

/// A strictly increasing, duplicate-free timestamp index with one `f64` per
/// timestamp. Missing observations are stored as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    index: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Creates a series, ordering the pairs chronologically.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::LengthMismatch`] if the lengths differ and
    /// [`CalendarError::DuplicateTimestamp`] if a timestamp repeats.
    pub fn new(index: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self, CalendarError> {
        if index.len() != values.len() {
            return Err(CalendarError::LengthMismatch {
                index_len: index.len(),
                values_len: values.len(),
            });
        }

        let (index, values) = if index.windows(2).all(|w| w[0] < w[1]) {
            (index, values)
        } else {
            let mut pairs: Vec<(NaiveDateTime, f64)> = index.into_iter().zip(values).collect();
            pairs.sort_by_key(|&(t, _)| t);
            pairs.into_iter().unzip()
        };

        if let Some(w) = index.windows(2).find(|w| w[0] == w[1]) {
            return Err(CalendarError::DuplicateTimestamp {
                timestamp: w[0].to_string(),
            });
        }

        Ok(Self { index, values })
    }

    /// Creates a series from calendar dates at midnight.
    pub fn from_dates(dates: &[NaiveDate], values: Vec<f64>) -> Result<Self, CalendarError> {
        let index = dates
            .iter()
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .collect();
        Self::new(index, values)
    }

    /// Creates an all-NaN series over the same index as `self`.
    pub fn nan_like(&self) -> Self {
        Self {
            index: self.index.clone(),
            values: vec![f64::NAN; self.index.len()],
        }
    }

    /// Number of timestamps.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the series has no timestamps.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Timestamps in chronological order.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Values aligned with [`index`](Self::index).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// Position of `timestamp` in the index.
    pub fn position_of(&self, timestamp: NaiveDateTime) -> Option<usize> {
        self.index.binary_search(&timestamp).ok()
    }

    /// Value at `timestamp`, if the timestamp is in the index.
    pub fn get(&self, timestamp: NaiveDateTime) -> Option<f64> {
        self.position_of(timestamp).map(|i| self.values[i])
    }

    /// Overwrites the value at `timestamp`. Returns `false` if the timestamp
    /// is not part of the index.
    pub fn set(&mut self, timestamp: NaiveDateTime, value: f64) -> bool {
        match self.position_of(timestamp) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Number of non-NaN values.
    pub fn count_valid(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Returns a copy without NaN entries.
    pub fn dropna(&self) -> Self {
        let (index, values) = self.iter().filter(|(_, v)| !v.is_nan()).unzip();
        Self { index, values }
    }

    /// Distinct calendar years present in the index, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.index.iter().map(|t| t.year()).collect();
        years.dedup();
        years
    }

    /// Applies `f` to every value, keeping the index.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            index: self.index.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Trailing rolling aggregate over `window` consecutive observations.
    ///
    /// Each output value is stamped with the last timestamp of its window.
    /// Only full windows produce a value, a window containing NaN yields
    /// NaN, and NaN results are dropped, so the output starts at the
    /// `window`-th observation.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidWindow`] if `window` is zero.
    pub fn rolling_aggregate(&self, window: usize, agg: AggFunc) -> Result<Self, CalendarError> {
        if window == 0 {
            return Err(CalendarError::InvalidWindow {
                reason: "rolling window must be at least 1".to_string(),
            });
        }

        let mut index = Vec::with_capacity(self.len().saturating_sub(window - 1));
        let mut values = Vec::with_capacity(index.capacity());
        for (end, slice) in self.values.windows(window).enumerate() {
            if slice.iter().any(|v| v.is_nan()) {
                continue;
            }
            let sum: f64 = slice.iter().sum();
            let value = match agg {
                AggFunc::Sum => sum,
                AggFunc::Mean => sum / window as f64,
            };
            index.push(self.index[end + window - 1]);
            values.push(value);
        }

        Ok(Self { index, values })
    }
}

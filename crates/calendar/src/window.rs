//! Cyclic calendar windows that wrap across the year boundary.

use std::collections::BTreeMap;

use crate::position::CalendarPosition;
use crate::yearly::{Observation, YearlyTable, observations_at};

/// Where a padded row sits relative to the calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Copy of an end-of-year row placed before January 1.
    Before,
    /// Original row.
    Within,
    /// Copy of a start-of-year row placed after December 31.
    After,
}

/// One row of a [`CyclicTable`].
#[derive(Debug, Clone, Copy)]
pub struct PaddedRow<'a> {
    position: CalendarPosition,
    placement: Placement,
    values: &'a BTreeMap<i32, f64>,
}

impl PaddedRow<'_> {
    /// Calendar position of the source row.
    pub fn position(&self) -> CalendarPosition {
        self.position
    }

    /// Where the row sits in the padded axis.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// `year → value` of the source row.
    pub fn values(&self) -> &BTreeMap<i32, f64> {
        self.values
    }
}

/// A [`YearlyTable`] whose calendar axis is padded by `period` wrapped rows
/// on both sides.
///
/// Padding reuses existing rows only, so no position (such as February 29)
/// is fabricated.
#[derive(Debug, Clone)]
pub struct CyclicTable<'a> {
    rows: Vec<PaddedRow<'a>>,
    period: usize,
}

/// Pads `table` with its last `period` rows before the first row and its
/// first `period` rows after the last row.
///
/// When `period` exceeds the number of positions the padding wraps around
/// the table repeatedly. The padded length is always
/// `table.len() + 2 * period` (or zero for an empty table).
pub fn cyclic_window(table: &YearlyTable, period: usize) -> CyclicTable<'_> {
    let body: Vec<(CalendarPosition, &BTreeMap<i32, f64>)> = table.rows().collect();
    let n = body.len();
    if n == 0 {
        return CyclicTable {
            rows: Vec::new(),
            period,
        };
    }

    let row = |i: usize, placement| {
        let (position, values) = body[i % n];
        PaddedRow {
            position,
            placement,
            values,
        }
    };

    let mut rows = Vec::with_capacity(n + 2 * period);
    let offset = n - period % n;
    rows.extend((0..period).map(|k| row(offset + k, Placement::Before)));
    rows.extend((0..n).map(|k| row(k, Placement::Within)));
    rows.extend((0..period).map(|k| row(k, Placement::After)));

    CyclicTable { rows, period }
}

impl<'a> CyclicTable<'a> {
    /// Number of padded rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Padding on each side.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Padded rows in axis order.
    pub fn rows(&self) -> &[PaddedRow<'a>] {
        &self.rows
    }

    /// Centered windows of `width` rows, one per padded row.
    ///
    /// Windows near either end of the padded axis are truncated; they are
    /// still yielded but report `false` from [`Window::is_complete`], so
    /// callers decide explicitly whether to skip them. An even `width` is
    /// treated as `width + 1`.
    pub fn windows(&self, width: usize) -> impl Iterator<Item = Window<'_, 'a>> + '_ {
        let half = width / 2;
        let len = self.rows.len();
        (0..len).map(move |center| {
            let start = center.saturating_sub(half);
            let end = (center + half + 1).min(len);
            Window {
                rows: &self.rows[start..end],
                center: &self.rows[center],
                complete: center >= half && center + half < len,
            }
        })
    }
}

/// A run of consecutive padded rows around a center row.
#[derive(Debug, Clone, Copy)]
pub struct Window<'t, 'a> {
    rows: &'t [PaddedRow<'a>],
    center: &'t PaddedRow<'a>,
    complete: bool,
}

impl Window<'_, '_> {
    /// `true` when the window has its full width.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// `true` when the center is an original (unpadded) row.
    pub fn is_centered_within_year(&self) -> bool {
        self.center.placement == Placement::Within
    }

    /// Calendar position of the center row.
    pub fn center_position(&self) -> CalendarPosition {
        self.center.position
    }

    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the window has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of all rows, pooled into one sample.
    pub fn pooled_values(&self) -> Vec<f64> {
        self.rows
            .iter()
            .flat_map(|r| r.values.values().copied())
            .collect()
    }

    /// Observations of the center row with their real timestamps.
    pub fn center_observations(&self) -> Vec<Observation> {
        observations_at(self.center.position, self.center.values).collect()
    }
}

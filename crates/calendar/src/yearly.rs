//! Year-agnostic regrouping of a multi-year series.
//!
//! [`group_yearly`] pivots a series into a table keyed by
//! [`CalendarPosition`], with one value per source year, so that e.g. every
//! January 15 across all years forms one sample. [`ungroup_yearly`] is the
//! inverse.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::CalendarError;
use crate::freq::Frequency;
use crate::position::CalendarPosition;
use crate::series::TimeSeries;

/// One observation with its real timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Timestamp in the source year.
    pub timestamp: NaiveDateTime,
    /// Observed value (never NaN).
    pub value: f64,
}

/// Calendar position → (source year → value).
///
/// Every `(position, year)` pair occurs at most once and February 29 only
/// appears for leap source years. Missing (NaN) observations are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearlyTable {
    rows: BTreeMap<CalendarPosition, BTreeMap<i32, f64>>,
}

impl YearlyTable {
    /// Number of distinct calendar positions.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table holds no observations.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Calendar positions in calendar order.
    pub fn positions(&self) -> impl Iterator<Item = CalendarPosition> + '_ {
        self.rows.keys().copied()
    }

    /// Rows in calendar order.
    pub fn rows(&self) -> impl Iterator<Item = (CalendarPosition, &BTreeMap<i32, f64>)> + '_ {
        self.rows.iter().map(|(p, r)| (*p, r))
    }

    /// The `year → value` row at `position`.
    pub fn row(&self, position: CalendarPosition) -> Option<&BTreeMap<i32, f64>> {
        self.rows.get(&position)
    }

    /// Value observed at `position` in `year`.
    pub fn get(&self, position: CalendarPosition, year: i32) -> Option<f64> {
        self.rows.get(&position)?.get(&year).copied()
    }

    /// Distinct source years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.values().flat_map(|r| r.keys().copied()).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Total number of stored observations.
    pub fn n_observations(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Partitions the table into frequency groups keyed by
    /// [`Frequency::group_key`], each holding its observations in
    /// chronological order.
    pub fn partition(&self, freq: Frequency) -> BTreeMap<NaiveDate, Vec<Observation>> {
        let mut groups: BTreeMap<NaiveDate, Vec<Observation>> = BTreeMap::new();
        for (position, row) in &self.rows {
            let group = groups.entry(freq.group_key(*position)).or_default();
            group.extend(observations_at(*position, row));
        }
        for group in groups.values_mut() {
            group.sort_by_key(|o| o.timestamp);
        }
        groups
    }
}

/// Observations of one row, projected back onto their source years.
pub(crate) fn observations_at(
    position: CalendarPosition,
    row: &BTreeMap<i32, f64>,
) -> impl Iterator<Item = Observation> + '_ {
    row.iter().filter_map(move |(&year, &value)| {
        position
            .in_year(year)
            .map(|timestamp| Observation { timestamp, value })
    })
}

/// Groups `series` by calendar position across years.
///
/// NaN values are skipped.
pub fn group_yearly(series: &TimeSeries) -> YearlyTable {
    let mut rows: BTreeMap<CalendarPosition, BTreeMap<i32, f64>> = BTreeMap::new();
    for (t, v) in series.iter().filter(|(_, v)| !v.is_nan()) {
        rows.entry(CalendarPosition::of(t))
            .or_default()
            .insert(t.year(), v);
    }
    YearlyTable { rows }
}

/// Expands a [`YearlyTable`] back into a chronological series.
///
/// February 29 entries whose source year is not a leap year are discarded.
pub fn ungroup_yearly(table: &YearlyTable) -> Result<TimeSeries, CalendarError> {
    let (index, values): (Vec<NaiveDateTime>, Vec<f64>) = table
        .rows
        .iter()
        .flat_map(|(p, row)| observations_at(*p, row))
        .map(|o| (o.timestamp, o.value))
        .unzip();
    TimeSeries::new(index, values)
}

impl FromIterator<(CalendarPosition, i32, f64)> for YearlyTable {
    fn from_iter<I: IntoIterator<Item = (CalendarPosition, i32, f64)>>(iter: I) -> Self {
        let mut rows: BTreeMap<CalendarPosition, BTreeMap<i32, f64>> = BTreeMap::new();
        for (position, year, value) in iter {
            if !value.is_nan() {
                rows.entry(position).or_default().insert(year, value);
            }
        }
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(start: NaiveDate, n: usize) -> TimeSeries {
        let dates: Vec<NaiveDate> = start.iter_days().take(n).collect();
        let values = (0..n).map(|i| i as f64).collect();
        TimeSeries::from_dates(&dates, values).unwrap()
    }

    #[test]
    fn groups_same_day_across_years() {
        let s = daily(ymd(2001, 1, 1), 365 * 2);
        let table = group_yearly(&s);
        assert_eq!(table.len(), 365);
        let jan15 = CalendarPosition::new(1, 15, 0).unwrap();
        assert_eq!(table.get(jan15, 2001), Some(14.0));
        assert_eq!(table.get(jan15, 2002), Some(379.0));
        assert_eq!(table.years(), vec![2001, 2002]);
    }

    #[test]
    fn nan_is_not_stored() {
        let dates = [ymd(2001, 1, 1), ymd(2001, 1, 2)];
        let s = TimeSeries::from_dates(&dates, vec![1.0, f64::NAN]).unwrap();
        let table = group_yearly(&s);
        assert_eq!(table.n_observations(), 1);
    }

    #[test]
    fn ungroup_inverts_group() {
        let s = daily(ymd(1999, 3, 1), 800);
        let back = ungroup_yearly(&group_yearly(&s)).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn spurious_leap_day_is_discarded() {
        let feb29 = CalendarPosition::new(2, 29, 0).unwrap();
        let mar1 = CalendarPosition::new(3, 1, 0).unwrap();
        let table: YearlyTable = [(feb29, 2003, 1.0), (feb29, 2004, 2.0), (mar1, 2003, 3.0)]
            .into_iter()
            .collect();
        let s = ungroup_yearly(&table).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.values(), &[3.0, 2.0]);
    }

    #[test]
    fn monthly_partition() {
        let s = daily(ymd(2001, 1, 1), 365 * 3);
        let parts = group_yearly(&s).partition(Frequency::Monthly);
        assert_eq!(parts.len(), 12);
        let jan = &parts[&ymd(2000, 1, 31)];
        assert_eq!(jan.len(), 31 * 3);
        assert!(jan.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        let feb = &parts[&ymd(2000, 2, 29)];
        assert_eq!(feb.len(), 28 * 3);
    }

    #[test]
    fn daily_partition_matches_positions() {
        let s = daily(ymd(2003, 1, 1), 365 * 2 + 1);
        let table = group_yearly(&s);
        let parts = table.partition(Frequency::Daily);
        assert_eq!(parts.len(), table.len());
    }
}

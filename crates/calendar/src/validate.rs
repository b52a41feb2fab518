//! Input validation: turning loosely labeled data into a [`TimeSeries`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::CalendarError;
use crate::notice::{Diagnostics, NoticeKind};
use crate::series::TimeSeries;

/// An index label as handed over by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexLabel {
    /// Already a timestamp; used as-is.
    Timestamp(NaiveDateTime),
    /// A calendar date, interpreted as midnight.
    Date(NaiveDate),
    /// Free text, parsed on a best-effort basis.
    Text(String),
}

impl From<NaiveDateTime> for IndexLabel {
    fn from(t: NaiveDateTime) -> Self {
        Self::Timestamp(t)
    }
}

impl From<NaiveDate> for IndexLabel {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<&str> for IndexLabel {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for IndexLabel {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A named column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<f64>,
}

impl Column {
    /// Creates a named column.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Raw input accepted by [`validate_series`].
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesInput {
    /// One labeled sequence of values.
    Series {
        /// Index labels, one per value.
        index: Vec<IndexLabel>,
        /// Observations; NaN marks a missing value.
        values: Vec<f64>,
    },
    /// A table sharing one index across named columns.
    Table {
        /// Index labels, one per row.
        index: Vec<IndexLabel>,
        /// Value columns.
        columns: Vec<Column>,
    },
    /// Values without any index.
    Values(Vec<f64>),
}

/// Validates raw input and returns a chronologically ordered [`TimeSeries`].
///
/// A table with exactly one column is converted to a series and a
/// [`NoticeKind::TableSqueezed`] notice is recorded. Labels are coerced with
/// [`validate_index`]; out-of-order labels are sorted with a
/// [`NoticeKind::IndexSorted`] notice.
///
/// # Errors
///
/// - [`CalendarError::NotASeries`] for unlabeled values.
/// - [`CalendarError::MultipleColumns`] / [`CalendarError::NoColumns`] for
///   tables that are not exactly one column wide.
/// - Any error from [`validate_index`] or [`TimeSeries::new`].
pub fn validate_series(
    input: SeriesInput,
    diagnostics: &mut Diagnostics,
) -> Result<TimeSeries, CalendarError> {
    let (labels, values) = match input {
        SeriesInput::Series { index, values } => (index, values),
        SeriesInput::Table { index, mut columns } => match columns.len() {
            0 => return Err(CalendarError::NoColumns),
            1 => {
                let column = columns.remove(0);
                diagnostics.push(
                    NoticeKind::TableSqueezed,
                    format!(
                        "converted single-column table {:?} to a series; pass a series directly",
                        column.name
                    ),
                );
                (index, column.values)
            }
            n => return Err(CalendarError::MultipleColumns { n_columns: n }),
        },
        SeriesInput::Values(values) => {
            return Err(CalendarError::NotASeries {
                found: format!("{} unlabeled values", values.len()),
            });
        }
    };

    if labels.len() != values.len() {
        return Err(CalendarError::LengthMismatch {
            index_len: labels.len(),
            values_len: values.len(),
        });
    }

    let index = validate_index(&labels, diagnostics)?;
    if !index.windows(2).all(|w| w[0] < w[1]) {
        diagnostics.push(
            NoticeKind::IndexSorted,
            "index was not in chronological order; sorted observations by timestamp",
        );
    }

    TimeSeries::new(index, values)
}

/// Coerces index labels to timestamps.
///
/// Dates become midnight timestamps and text labels are parsed (see
/// [`parse_label`]). When any label needed conversion a single
/// [`NoticeKind::IndexCoerced`] notice is recorded.
///
/// # Errors
///
/// Returns [`CalendarError::UnparseableLabel`] for text that is not a
/// recognised date format and [`CalendarError::DuplicateTimestamp`] if two
/// labels resolve to the same timestamp.
pub fn validate_index(
    labels: &[IndexLabel],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<NaiveDateTime>, CalendarError> {
    let mut converted = 0usize;
    let mut index = Vec::with_capacity(labels.len());

    for label in labels {
        let t = match label {
            IndexLabel::Timestamp(t) => *t,
            IndexLabel::Date(d) => {
                converted += 1;
                d.and_time(NaiveTime::MIN)
            }
            IndexLabel::Text(s) => {
                converted += 1;
                parse_label(s).ok_or_else(|| CalendarError::UnparseableLabel { label: s.clone() })?
            }
        };
        index.push(t);
    }

    if converted > 0 {
        diagnostics.push(
            NoticeKind::IndexCoerced,
            format!("expected a datetime index; converted {converted} labels to timestamps"),
        );
    }

    let mut sorted = index.clone();
    sorted.sort_unstable();
    if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(CalendarError::DuplicateTimestamp {
            timestamp: w[0].to_string(),
        });
    }

    Ok(index)
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%d-%m-%Y"];

/// Parses a text label as a timestamp.
///
/// Accepts ISO-like date-times, RFC 3339 (converted to UTC), plain dates,
/// year-month (`2020-03`, first of month) and bare years (`2018`, January 1).
pub fn parse_label(label: &str) -> Option<NaiveDateTime> {
    let s = label.trim();
    if s.is_empty() {
        return None;
    }

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s.parse().ok()?;
        return Some(NaiveDate::from_ymd_opt(year, 1, 1)?.and_time(NaiveTime::MIN));
    }

    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    // Year-month: "2020-03" or "2020/03".
    let normalized = s.replace('/', "-");
    if normalized.len() == 7 {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{normalized}-01"), "%Y-%m-%d") {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_year_only() {
        assert_eq!(parse_label("2018"), Some(midnight(2018, 1, 1)));
    }

    #[test]
    fn parse_year_month() {
        assert_eq!(parse_label("2020-03"), Some(midnight(2020, 3, 1)));
    }

    #[test]
    fn parse_iso_date_and_datetime() {
        assert_eq!(parse_label("2020-02-29"), Some(midnight(2020, 2, 29)));
        assert_eq!(
            parse_label("2020-02-29 06:30:00"),
            Some(
                NaiveDate::from_ymd_opt(2020, 2, 29)
                    .unwrap()
                    .and_hms_opt(6, 30, 0)
                    .unwrap()
            )
        );
        assert_eq!(parse_label(" 20200101 "), Some(midnight(2020, 1, 1)));
    }

    #[test]
    fn parse_rfc3339_to_utc() {
        let t = parse_label("2020-01-01T01:00:00+01:00").unwrap();
        assert_eq!(t, midnight(2020, 1, 1));
    }

    #[test]
    fn parse_garbage() {
        assert_eq!(parse_label("a"), None);
        assert_eq!(parse_label(""), None);
        assert_eq!(parse_label("2019-02-29"), None);
    }

    #[test]
    fn timestamps_need_no_coercion() {
        let mut d = Diagnostics::new();
        let labels = vec![IndexLabel::from(midnight(2000, 1, 1))];
        let index = validate_index(&labels, &mut d).unwrap();
        assert_eq!(index, vec![midnight(2000, 1, 1)]);
        assert!(d.is_empty());
    }

    #[test]
    fn text_labels_are_coerced_with_notice() {
        let mut d = Diagnostics::new();
        let labels: Vec<IndexLabel> = ["2018", "2019", "2020"].into_iter().map(Into::into).collect();
        let index = validate_index(&labels, &mut d).unwrap();
        assert_eq!(index[2], midnight(2020, 1, 1));
        assert!(d.contains(NoticeKind::IndexCoerced));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn duplicates_after_coercion_fail() {
        let mut d = Diagnostics::new();
        let labels = vec![
            IndexLabel::from("2000-01-01"),
            IndexLabel::from(midnight(2000, 1, 1)),
        ];
        let err = validate_index(&labels, &mut d).unwrap_err();
        assert!(matches!(err, CalendarError::DuplicateTimestamp { .. }));
    }

    #[test]
    fn unparseable_label_fails() {
        let mut d = Diagnostics::new();
        let labels: Vec<IndexLabel> = ["a", "b"].into_iter().map(Into::into).collect();
        assert_eq!(
            validate_index(&labels, &mut d).unwrap_err(),
            CalendarError::UnparseableLabel {
                label: "a".to_string()
            }
        );
    }

    #[test]
    fn unlabeled_values_are_a_shape_error() {
        let mut d = Diagnostics::new();
        let err = validate_series(SeriesInput::Values(vec![1.0, 2.0, 3.0]), &mut d).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn single_column_table_is_squeezed() {
        let mut d = Diagnostics::new();
        let input = SeriesInput::Table {
            index: vec![midnight(2000, 1, 1).into(), midnight(2000, 1, 2).into()],
            columns: vec![Column::new("s", vec![1.0, 2.0])],
        };
        let s = validate_series(input, &mut d).unwrap();
        assert_eq!(s.values(), &[1.0, 2.0]);
        assert!(d.contains(NoticeKind::TableSqueezed));
    }

    #[test]
    fn multi_column_table_fails() {
        let mut d = Diagnostics::new();
        let input = SeriesInput::Table {
            index: vec![midnight(2000, 1, 1).into()],
            columns: vec![Column::new("a", vec![1.0]), Column::new("b", vec![2.0])],
        };
        assert_eq!(
            validate_series(input, &mut d).unwrap_err(),
            CalendarError::MultipleColumns { n_columns: 2 }
        );
    }

    #[test]
    fn empty_table_fails() {
        let mut d = Diagnostics::new();
        let input = SeriesInput::Table {
            index: vec![],
            columns: vec![],
        };
        assert_eq!(
            validate_series(input, &mut d).unwrap_err(),
            CalendarError::NoColumns
        );
    }

    #[test]
    fn unordered_series_is_sorted_with_notice() {
        let mut d = Diagnostics::new();
        let input = SeriesInput::Series {
            index: vec!["2000-01-02".into(), "2000-01-01".into()],
            values: vec![2.0, 1.0],
        };
        let s = validate_series(input, &mut d).unwrap();
        assert_eq!(s.values(), &[1.0, 2.0]);
        assert!(d.contains(NoticeKind::IndexSorted));
        assert!(d.contains(NoticeKind::IndexCoerced));
    }

    #[test]
    fn series_length_mismatch() {
        let mut d = Diagnostics::new();
        let input = SeriesInput::Series {
            index: vec!["2000-01-01".into()],
            values: vec![1.0, 2.0],
        };
        assert!(matches!(
            validate_series(input, &mut d),
            Err(CalendarError::LengthMismatch { .. })
        ));
    }
}

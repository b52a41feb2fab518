//! Preprocessing: validation, aggregation, frequency and regrouping.

use spei_calendar::{
    Diagnostics, Frequency, NoticeKind, SeriesInput, TimeSeries, YearlyTable, group_yearly,
    infer_frequency, validate_series,
};
use tracing::info;

use crate::config::SiConfig;
use crate::error::SiError;

/// Smallest rolling fit window.
pub const MIN_FIT_WINDOW: usize = 3;

/// Derived run state after preprocessing, ready to be fitted.
///
/// Holds the validated (and timescale-aggregated) series, its calendar
/// table, the resolved fitting frequency and the corrected fit window.
#[derive(Debug, Clone)]
pub struct PreparedSi {
    pub(crate) config: SiConfig,
    pub(crate) series: TimeSeries,
    pub(crate) table: YearlyTable,
    pub(crate) fit_freq: Frequency,
    pub(crate) fit_window: usize,
    pub(crate) diagnostics: Diagnostics,
}

impl SiConfig {
    /// Preprocesses `input` for fitting.
    ///
    /// Validates the series, applies the trailing rolling aggregate when
    /// `timescale > 0`, infers the frequency if none was configured,
    /// builds the calendar table and corrects the fit window to an odd
    /// value of at least 3. Every correction is recorded as a notice.
    ///
    /// # Errors
    ///
    /// - Any validation error of the input series.
    /// - [`SiError::EmptySeries`] if aggregation leaves no observations.
    /// - A configuration error from [`SiConfig::validate`].
    #[tracing::instrument(level = "info", skip_all, fields(dist = %self.dist(), timescale = self.timescale()))]
    pub fn prepare(&self, input: SeriesInput) -> Result<PreparedSi, SiError> {
        self.validate()?;
        let mut diagnostics = Diagnostics::new();

        let mut series = validate_series(input, &mut diagnostics)?;
        if self.timescale() > 0 {
            series = series.rolling_aggregate(self.timescale(), self.agg_func())?;
            if series.is_empty() {
                return Err(SiError::EmptySeries {
                    timescale: self.timescale(),
                });
            }
        }

        let fit_freq = match self.parsed_fit_freq()? {
            Some(freq) => freq,
            None => {
                let freq = infer_frequency(series.index(), &mut diagnostics);
                info!(%freq, "inferred fitting frequency");
                freq
            }
        };

        let table = group_yearly(&series);
        let fit_window = correct_fit_window(self.fit_window(), &mut diagnostics);
        info!(
            n = series.len(),
            positions = table.len(),
            %fit_freq,
            fit_window,
            "series prepared"
        );

        Ok(PreparedSi {
            config: self.clone(),
            series,
            table,
            fit_freq,
            fit_window,
            diagnostics,
        })
    }
}

/// Odd window of at least [`MIN_FIT_WINDOW`]; zero stays zero (disabled).
fn correct_fit_window(requested: usize, diagnostics: &mut Diagnostics) -> usize {
    let corrected = match requested {
        0 => 0,
        n if n < MIN_FIT_WINDOW => MIN_FIT_WINDOW,
        n if n % 2 == 0 => n + 1,
        n => n,
    };
    if corrected != requested {
        let message = format!(
            "fit_window must be odd and at least {MIN_FIT_WINDOW}; changed {requested} to {corrected}"
        );
        diagnostics.push(NoticeKind::FitWindowAdjusted, message);
    }
    corrected
}

impl PreparedSi {
    /// Configuration this state was prepared from.
    pub fn config(&self) -> &SiConfig {
        &self.config
    }

    /// Validated and aggregated series; the output index of every result.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Calendar-grouped table of [`series`](Self::series).
    pub fn table(&self) -> &YearlyTable {
        &self.table
    }

    /// Resolved fitting frequency.
    pub fn fit_frequency(&self) -> Frequency {
        self.fit_freq
    }

    /// Effective fit window after parity correction (0 = disabled).
    pub fn fit_window(&self) -> usize {
        self.fit_window
    }

    /// Notices recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use spei_calendar::IndexLabel;
    use spei_dist::Family;

    fn daily_input(n: usize) -> SeriesInput {
        let index: Vec<IndexLabel> = NaiveDate::from_ymd_opt(2001, 1, 1)
            .unwrap()
            .iter_days()
            .take(n)
            .map(IndexLabel::from)
            .collect();
        let values = (0..n).map(|i| (i % 17) as f64 + 1.0).collect();
        SeriesInput::Series { index, values }
    }

    #[test]
    fn window_correction() {
        let mut d = Diagnostics::new();
        assert_eq!(correct_fit_window(0, &mut d), 0);
        assert!(d.is_empty());
        assert_eq!(correct_fit_window(1, &mut d), 3);
        assert_eq!(correct_fit_window(2, &mut d), 3);
        assert_eq!(correct_fit_window(4, &mut d), 5);
        assert_eq!(d.len(), 3);
        assert_eq!(correct_fit_window(7, &mut d), 7);
        assert_eq!(d.len(), 3);
        assert!(
            d.notices()
                .iter()
                .all(|n| n.kind() == NoticeKind::FitWindowAdjusted)
        );
    }

    #[test]
    fn aggregation_drops_partial_windows() {
        let prepared = SiConfig::new(Family::Normal)
            .with_timescale(3)
            .prepare(daily_input(10))
            .unwrap();
        assert_eq!(prepared.series().len(), 8);
        assert_eq!(prepared.series().values()[0], 1.0 + 2.0 + 3.0);
        assert_eq!(prepared.fit_frequency(), Frequency::Daily);
    }

    #[test]
    fn aggregation_longer_than_series_is_empty() {
        let err = SiConfig::new(Family::Normal)
            .with_timescale(30)
            .prepare(daily_input(10))
            .unwrap_err();
        assert_eq!(err, SiError::EmptySeries { timescale: 30 });
    }

    #[test]
    fn configured_frequency_wins() {
        let prepared = SiConfig::new(Family::Normal)
            .with_fit_freq("ME")
            .prepare(daily_input(40))
            .unwrap();
        assert_eq!(prepared.fit_frequency(), Frequency::Monthly);
        assert!(!prepared.diagnostics().contains(NoticeKind::FrequencyFallback));
    }

    #[test]
    fn table_covers_series() {
        let prepared = SiConfig::new(Family::Normal)
            .prepare(daily_input(730))
            .unwrap();
        assert_eq!(prepared.table().n_observations(), 730);
        assert_eq!(prepared.table().len(), 365);
    }
}

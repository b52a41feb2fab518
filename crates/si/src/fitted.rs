//! Ready state: scatter-gather of per-group results into full series.

use chrono::{NaiveDate, NaiveDateTime};
use spei_calendar::{Diagnostics, Frequency, TimeSeries, YearlyTable};
use spei_dist::FittedDist;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::config::SiConfig;
use crate::error::SiError;
use crate::fit::GroupFit;
use crate::prepare::PreparedSi;

/// A standardized index run with every calendar group fitted.
///
/// Every output series is aligned to [`series`](Self::series); positions
/// not owned by any group stay NaN.
#[derive(Debug, Clone)]
pub struct FittedSi {
    config: SiConfig,
    series: TimeSeries,
    table: YearlyTable,
    fit_freq: Frequency,
    fit_window: usize,
    groups: Vec<GroupFit>,
    diagnostics: Diagnostics,
}

impl FittedSi {
    pub(crate) fn new(prepared: PreparedSi, groups: Vec<GroupFit>) -> Self {
        Self {
            config: prepared.config,
            series: prepared.series,
            table: prepared.table,
            fit_freq: prepared.fit_freq,
            fit_window: prepared.fit_window,
            groups,
            diagnostics: prepared.diagnostics,
        }
    }

    /// Cumulative probability of every observation under its group's
    /// distribution.
    ///
    /// With the normal-scores transform, each group's observations get the
    /// plotting positions `(2i - 1) / 2n` in rank order instead.
    pub fn cdf(&self) -> TimeSeries {
        let mut out = self.series.nan_like();
        if self.config.normal_scores_transform() {
            for mut group in self.table.partition(self.fit_freq).into_values() {
                group.retain(|o| !o.value.is_nan());
                group.sort_by(|a, b| a.value.total_cmp(&b.value));
                let probabilities = spei_stats::plotting_positions(group.len());
                for (obs, p) in group.iter().zip(probabilities) {
                    out.set(obs.timestamp, p);
                }
            }
        } else {
            for group in &self.groups {
                scatter(&mut out, group, group.dist().cdf());
            }
        }
        out
    }

    /// Density of every observation under its group's distribution.
    ///
    /// # Errors
    ///
    /// - [`SiError::NormalScoresUnsupported`] with the normal-scores
    ///   transform.
    /// - The zero-inflated density error when `prob_zero` is enabled.
    pub fn pdf(&self) -> Result<TimeSeries, SiError> {
        self.require_fits("pdf")?;
        let mut out = self.series.nan_like();
        for group in &self.groups {
            scatter(&mut out, group, group.dist().pdf()?);
        }
        Ok(out)
    }

    /// The `q`-quantile of each observation's group distribution, written at
    /// every observation of that group.
    ///
    /// # Errors
    ///
    /// - [`SiError::NormalScoresUnsupported`] with the normal-scores
    ///   transform.
    /// - The invalid-probability error unless `0 <= q <= 1`.
    pub fn ppf(&self, q: f64) -> Result<TimeSeries, SiError> {
        self.require_fits("ppf")?;
        let mut out = self.series.nan_like();
        for group in &self.groups {
            let x = group.dist().ppf(q)?;
            for &t in group.timestamps() {
                out.set(t, x);
            }
        }
        Ok(out)
    }

    /// The standardized index: [`cdf`](Self::cdf) mapped through the
    /// inverse standard normal CDF.
    ///
    /// Probabilities of exactly 0 or 1 map to negative or positive infinity.
    pub fn norm_ppf(&self) -> TimeSeries {
        let normal = Normal::standard();
        self.cdf().map_values(|p| {
            if p.is_nan() {
                f64::NAN
            } else {
                normal.inverse_cdf(p.clamp(0.0, 1.0))
            }
        })
    }

    /// Alias of [`norm_ppf`](Self::norm_ppf).
    pub fn si(&self) -> TimeSeries {
        self.norm_ppf()
    }

    /// The distribution of the group whose targets include `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`SiError::DateNotFound`] if no group contains it, which is
    /// always the case with the normal-scores transform.
    pub fn get_dist(&self, timestamp: NaiveDateTime) -> Result<&FittedDist, SiError> {
        self.groups
            .iter()
            .find(|g| g.contains(timestamp))
            .map(GroupFit::dist)
            .ok_or(SiError::DateNotFound { timestamp })
    }

    /// All group fits, ordered by group key.
    pub fn dists(&self) -> &[GroupFit] {
        &self.groups
    }

    /// Kolmogorov–Smirnov p-value of every group fit, by group key.
    pub fn ks_pvalues(&self) -> Vec<(NaiveDate, f64)> {
        self.groups
            .iter()
            .map(|g| (g.key(), g.dist().ks_test()))
            .collect()
    }

    /// Configuration of the run.
    pub fn config(&self) -> &SiConfig {
        &self.config
    }

    /// Validated and aggregated input series.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Resolved fitting frequency.
    pub fn fit_frequency(&self) -> Frequency {
        self.fit_freq
    }

    /// Effective fit window (0 = disabled).
    pub fn fit_window(&self) -> usize {
        self.fit_window
    }

    /// Notices recorded while preparing the run.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn require_fits(&self, operation: &'static str) -> Result<(), SiError> {
        if self.config.normal_scores_transform() {
            return Err(SiError::NormalScoresUnsupported { operation });
        }
        Ok(())
    }
}

fn scatter(out: &mut TimeSeries, group: &GroupFit, values: Vec<f64>) {
    for (&t, v) in group.timestamps().iter().zip(values) {
        out.set(t, v);
    }
}

//! Fit phase: one distribution per calendar group.

use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use spei_calendar::{Observation, cyclic_window};
use spei_dist::{FitConfig, Family, FittedDist};
use tracing::{debug, info};

use crate::error::SiError;
use crate::fitted::FittedSi;
use crate::prepare::PreparedSi;

/// A fitted distribution and the timestamps of the observations it
/// evaluates.
///
/// `timestamps[i]` belongs to `dist.target()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFit {
    key: NaiveDate,
    timestamps: Vec<NaiveDateTime>,
    dist: FittedDist,
}

impl GroupFit {
    /// Group key in the reference year: the group date for a partition fit,
    /// the window center for a rolling-window fit.
    pub fn key(&self) -> NaiveDate {
        self.key
    }

    /// Timestamps of the target observations, chronological.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// The fitted distribution.
    pub fn dist(&self) -> &FittedDist {
        &self.dist
    }

    /// Returns `true` if `timestamp` is one of the group's targets.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.timestamps.binary_search(&timestamp).is_ok()
    }
}

/// Work item of the fit phase.
struct GroupTask {
    key: NaiveDate,
    target: Vec<Observation>,
    window: Option<Vec<f64>>,
}

impl GroupTask {
    fn fit(self, family: Family, config: &FitConfig) -> Result<GroupFit, SiError> {
        let (timestamps, values): (Vec<NaiveDateTime>, Vec<f64>) = self
            .target
            .into_iter()
            .map(|o| (o.timestamp, o.value))
            .unzip();
        let dist = FittedDist::fit(family, values, self.window, config).map_err(|source| {
            SiError::GroupFit {
                group: self.key,
                source,
            }
        })?;
        debug!(group = %self.key, n = timestamps.len(), params = %dist.params(), "group fitted");
        Ok(GroupFit {
            key: self.key,
            timestamps,
            dist,
        })
    }
}

impl PreparedSi {
    /// Fits the distributions and returns the ready-to-query state.
    ///
    /// Three paths:
    ///
    /// 1. Normal-scores transform: nothing is fitted; probabilities are
    ///    plotting positions computed on demand.
    /// 2. Fit window > 0: for each calendar position, one distribution is
    ///    fitted to the pooled values of the cyclic window centered on it
    ///    and evaluated on that position's own observations. The window is
    ///    counted in days, so a weekly window of `n` spans `7n` positions.
    /// 3. Otherwise: one distribution per group of the fitting frequency.
    ///
    /// Groups are fitted in parallel; results keep group order.
    ///
    /// # Errors
    ///
    /// - [`SiError::InvalidFitWindowFrequency`] if a fit window is combined
    ///   with a frequency other than daily or weekly.
    /// - [`SiError::GroupFit`] for the first group whose fit fails; no
    ///   partial result is returned.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(dist = %self.config.dist(), freq = %self.fit_freq, fit_window = self.fit_window)
    )]
    pub fn fit_distribution(self) -> Result<FittedSi, SiError> {
        if self.config.normal_scores_transform() {
            info!("normal-scores transform, no distributions fitted");
            return Ok(FittedSi::new(self, Vec::new()));
        }

        let tasks = if self.fit_window > 0 {
            self.window_tasks()?
        } else {
            self.partition_tasks()
        };

        let family = self.config.dist();
        let fit_config = self.config.fit_config();
        let groups = tasks
            .into_par_iter()
            .map(|task| task.fit(family, &fit_config))
            .collect::<Result<Vec<GroupFit>, SiError>>()?;
        info!(n_groups = groups.len(), "distributions fitted");

        Ok(FittedSi::new(self, groups))
    }

    fn partition_tasks(&self) -> Vec<GroupTask> {
        self.table
            .partition(self.fit_freq)
            .into_iter()
            .map(|(key, target)| GroupTask {
                key,
                target,
                window: None,
            })
            .collect()
    }

    fn window_tasks(&self) -> Result<Vec<GroupTask>, SiError> {
        let Some(days) = self.fit_freq.window_days() else {
            return Err(SiError::InvalidFitWindowFrequency {
                token: self
                    .config
                    .fit_freq()
                    .unwrap_or(self.fit_freq.token())
                    .to_string(),
            });
        };
        let width = self.fit_window * days;
        let padded = cyclic_window(&self.table, width / 2);

        // Only full-width windows are fitted; those are exactly the ones
        // centered on an original calendar position.
        let tasks = padded
            .windows(width)
            .filter(|w| w.is_complete())
            .map(|w| GroupTask {
                key: w.center_position().reference_date(),
                target: w.center_observations(),
                window: Some(w.pooled_values()),
            })
            .collect();
        Ok(tasks)
    }
}

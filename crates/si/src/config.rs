//! Configuration for a standardized index run.

use spei_calendar::{AggFunc, Frequency};
use spei_dist::{Family, FitConfig};

use crate::error::SiError;

/// Configuration of one standardized index computation.
///
/// A pure value: [`prepare`](SiConfig::prepare) turns it together with an
/// input series into the derived run state.
///
/// # Example
///
/// ```
/// use spei_dist::Family;
/// use spei_si::SiConfig;
///
/// let config = SiConfig::new(Family::Gamma)
///     .with_timescale(3)
///     .with_fit_freq("ME")
///     .with_prob_zero(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SiConfig {
    dist: Family,
    timescale: usize,
    fit_freq: Option<String>,
    fit_window: usize,
    prob_zero: bool,
    normal_scores_transform: bool,
    agg_func: AggFunc,
    fit_config: FitConfig,
}

impl SiConfig {
    /// Creates a configuration fitting `dist` with all other options at
    /// their defaults.
    ///
    /// Defaults: no aggregation (`timescale = 0`), inferred frequency, no
    /// fit window, no zero inflation, parametric fit, `Sum` aggregation.
    pub fn new(dist: Family) -> Self {
        Self {
            dist,
            timescale: 0,
            fit_freq: None,
            fit_window: 0,
            prob_zero: false,
            normal_scores_transform: false,
            agg_func: AggFunc::Sum,
            fit_config: FitConfig::default(),
        }
    }

    /// Sets the distribution family.
    pub fn with_dist(mut self, dist: Family) -> Self {
        self.dist = dist;
        self
    }

    /// Sets the accumulation timescale in periods (0 disables aggregation).
    pub fn with_timescale(mut self, n: usize) -> Self {
        self.timescale = n;
        self
    }

    /// Sets the fitting frequency token (`D`, `W`, `M`, `ME`, ...).
    pub fn with_fit_freq(mut self, token: impl Into<String>) -> Self {
        self.fit_freq = Some(token.into());
        self
    }

    /// Sets the rolling fit window in periods (0 disables the window).
    pub fn with_fit_window(mut self, n: usize) -> Self {
        self.fit_window = n;
        self
    }

    /// Sets whether a point mass at zero is split off before fitting.
    pub fn with_prob_zero(mut self, b: bool) -> Self {
        self.prob_zero = b;
        self
    }

    /// Sets whether the rank-based normal-scores transform replaces the
    /// parametric fit.
    pub fn with_normal_scores_transform(mut self, b: bool) -> Self {
        self.normal_scores_transform = b;
        self
    }

    /// Sets the rolling aggregation function.
    pub fn with_agg_func(mut self, agg: AggFunc) -> Self {
        self.agg_func = agg;
        self
    }

    /// Sets the optimizer configuration used for every group fit.
    ///
    /// Its `prob_zero` flag is overridden by [`with_prob_zero`](Self::with_prob_zero).
    pub fn with_fit_config(mut self, config: FitConfig) -> Self {
        self.fit_config = config;
        self
    }

    /// Returns the distribution family.
    pub fn dist(&self) -> Family {
        self.dist
    }

    /// Returns the accumulation timescale.
    pub fn timescale(&self) -> usize {
        self.timescale
    }

    /// Returns the fitting frequency token, if one was given.
    pub fn fit_freq(&self) -> Option<&str> {
        self.fit_freq.as_deref()
    }

    /// Returns the requested fit window, before parity correction.
    pub fn fit_window(&self) -> usize {
        self.fit_window
    }

    /// Returns whether zero inflation is enabled.
    pub fn prob_zero(&self) -> bool {
        self.prob_zero
    }

    /// Returns whether the normal-scores transform is used.
    pub fn normal_scores_transform(&self) -> bool {
        self.normal_scores_transform
    }

    /// Returns the rolling aggregation function.
    pub fn agg_func(&self) -> AggFunc {
        self.agg_func
    }

    /// Returns the optimizer configuration with this run's zero-inflation
    /// flag applied.
    pub fn fit_config(&self) -> FitConfig {
        self.fit_config.clone().with_prob_zero(self.prob_zero)
    }

    /// Parses the fitting frequency token, if one was given.
    ///
    /// # Errors
    ///
    /// Returns the calendar error for an unsupported token.
    pub fn parsed_fit_freq(&self) -> Result<Option<Frequency>, SiError> {
        Ok(self.fit_freq.as_deref().map(Frequency::parse).transpose()?)
    }

    /// Validates the configuration.
    ///
    /// Window parity is not checked here; it is corrected during
    /// preparation.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported frequency token or an invalid
    /// optimizer configuration.
    pub fn validate(&self) -> Result<(), SiError> {
        self.parsed_fit_freq()?;
        self.fit_config().validate()?;
        Ok(())
    }
}

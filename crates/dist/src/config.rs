//! Configuration for distribution fitting.

use crate::error::DistError;

/// Configuration for [`FittedDist::fit`](crate::FittedDist::fit).
///
/// # Example
///
/// ```
/// use spei_dist::FitConfig;
///
/// let config = FitConfig::new().with_prob_zero(true).with_max_iters(2000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FitConfig {
    prob_zero: bool,
    max_iters: u64,
    sd_tolerance: f64,
    f_tolerance: f64,
    min_sample: usize,
}

impl FitConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `prob_zero = false`, `max_iters = 5000`,
    /// `sd_tolerance = 1e-10`, `f_tolerance = 1e-8`, `min_sample = 3`.
    pub fn new() -> Self {
        Self {
            prob_zero: false,
            max_iters: 5000,
            sd_tolerance: 1e-10,
            f_tolerance: 1e-8,
            min_sample: 3,
        }
    }

    /// Sets whether a point mass at zero is split off before fitting.
    pub fn with_prob_zero(mut self, b: bool) -> Self {
        self.prob_zero = b;
        self
    }

    /// Sets the Nelder-Mead iteration limit.
    pub fn with_max_iters(mut self, n: u64) -> Self {
        self.max_iters = n;
        self
    }

    /// Sets the Nelder-Mead convergence tolerance (standard deviation of
    /// the simplex costs).
    pub fn with_sd_tolerance(mut self, tol: f64) -> Self {
        self.sd_tolerance = tol;
        self
    }

    /// Sets the relative improvement of the best cost below which a
    /// Nelder-Mead restart counts as a plateau and ends the search.
    pub fn with_f_tolerance(mut self, tol: f64) -> Self {
        self.f_tolerance = tol;
        self
    }

    /// Sets the minimum number of values needed to fit.
    pub fn with_min_sample(mut self, n: usize) -> Self {
        self.min_sample = n;
        self
    }

    /// Returns whether zero inflation is enabled.
    pub fn prob_zero(&self) -> bool {
        self.prob_zero
    }

    /// Returns the iteration limit.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Returns the convergence tolerance.
    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    /// Returns the plateau tolerance.
    pub fn f_tolerance(&self) -> f64 {
        self.f_tolerance
    }

    /// Returns the minimum sample size.
    pub fn min_sample(&self) -> usize {
        self.min_sample
    }

    /// Validates this configuration.
    ///
    /// Checks that `max_iters` is at least 1, both tolerances are finite
    /// and positive, and `min_sample` is at least 2.
    pub fn validate(&self) -> Result<(), DistError> {
        if self.max_iters < 1 {
            return Err(DistError::InvalidConfig {
                reason: format!("max_iters must be >= 1, got {}", self.max_iters),
            });
        }
        if !self.sd_tolerance.is_finite() || self.sd_tolerance <= 0.0 {
            return Err(DistError::InvalidConfig {
                reason: format!(
                    "sd_tolerance must be finite and > 0, got {}",
                    self.sd_tolerance
                ),
            });
        }
        if !self.f_tolerance.is_finite() || self.f_tolerance <= 0.0 {
            return Err(DistError::InvalidConfig {
                reason: format!(
                    "f_tolerance must be finite and > 0, got {}",
                    self.f_tolerance
                ),
            });
        }
        if self.min_sample < 2 {
            return Err(DistError::InvalidConfig {
                reason: format!("min_sample must be >= 2, got {}", self.min_sample),
            });
        }
        Ok(())
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = FitConfig::new();
        assert!(!c.prob_zero());
        assert_eq!(c.max_iters(), 5000);
        assert_eq!(c.min_sample(), 3);
        assert_eq!(c, FitConfig::default());
    }

    #[test]
    fn builder_chain() {
        let c = FitConfig::new()
            .with_prob_zero(true)
            .with_max_iters(10)
            .with_sd_tolerance(1e-6)
            .with_f_tolerance(1e-4)
            .with_min_sample(5);
        assert!(c.prob_zero());
        assert_eq!(c.max_iters(), 10);
        assert_eq!(c.sd_tolerance(), 1e-6);
        assert_eq!(c.f_tolerance(), 1e-4);
        assert_eq!(c.min_sample(), 5);
    }

    #[test]
    fn validate_ok() {
        assert!(FitConfig::new().validate().is_ok());
    }

    #[test]
    fn validate_zero_iters() {
        assert!(FitConfig::new().with_max_iters(0).validate().is_err());
    }

    #[test]
    fn validate_bad_tolerance() {
        assert!(FitConfig::new().with_sd_tolerance(0.0).validate().is_err());
        assert!(FitConfig::new().with_sd_tolerance(f64::NAN).validate().is_err());
        assert!(FitConfig::new().with_f_tolerance(-1e-6).validate().is_err());
    }

    #[test]
    fn validate_small_min_sample() {
        assert!(FitConfig::new().with_min_sample(1).validate().is_err());
    }
}

//! A distribution fitted to one calendar group.

use tracing::debug;

use crate::config::FitConfig;
use crate::error::DistError;
use crate::family::{ContinuousFamily, Family};
use crate::params::FitParams;

/// A fitted distribution together with the samples it belongs to.
///
/// The *fit sample* is what the parameters were estimated from; the
/// *target* is what [`cdf`](Self::cdf) and [`pdf`](Self::pdf) evaluate.
/// They are identical unless a wider window was supplied at fit time.
///
/// With zero inflation, `p0` is the fraction of zeros in the fit sample
/// and the family is fitted to the non-zero values only:
///
/// ```text
/// cdf(x) = p0                          if x == 0
///        = p0 + (1 - p0) * F(x)        otherwise
/// ```
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedDist {
    family: Family,
    params: FitParams,
    p0: Option<f64>,
    fit_sample: Vec<f64>,
    target: Vec<f64>,
}

impl FittedDist {
    /// Fits `family` to `window` (or to `target` when no window is given).
    ///
    /// Non-finite values are dropped from the fit sample.
    ///
    /// # Errors
    ///
    /// - [`DistError::InvalidConfig`] if `config` does not validate.
    /// - [`DistError::InsufficientData`] if fewer than
    ///   `config.min_sample()` values (non-zero values under zero
    ///   inflation) remain.
    /// - [`DistError::ConstantSample`] if all remaining values are equal.
    /// - Any estimation error of the family.
    #[tracing::instrument(level = "debug", skip_all, fields(family = %family))]
    pub fn fit(
        family: Family,
        target: Vec<f64>,
        window: Option<Vec<f64>>,
        config: &FitConfig,
    ) -> Result<Self, DistError> {
        config.validate()?;

        let fit_sample: Vec<f64> = window
            .unwrap_or_else(|| target.clone())
            .into_iter()
            .filter(|x| x.is_finite())
            .collect();
        check_size(fit_sample.len(), config)?;

        let (p0, continuous) = if config.prob_zero() {
            let zeros = fit_sample.iter().filter(|&&x| x == 0.0).count();
            let p0 = zeros as f64 / fit_sample.len() as f64;
            (Some(p0), non_zero(&fit_sample))
        } else {
            (None, fit_sample.clone())
        };
        check_size(continuous.len(), config)?;
        let sorted = spei_stats::sorted_finite(&continuous);
        if spei_stats::n_distinct(&sorted) < 2 {
            return Err(DistError::ConstantSample { value: sorted[0] });
        }

        let params = family.fit(&continuous, config)?;
        debug!(n_fit = fit_sample.len(), n_target = target.len(), p0 = ?p0, %params, "fitted");

        Ok(Self {
            family,
            params,
            p0,
            fit_sample,
            target,
        })
    }

    /// Returns the fitted family.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Returns the estimated parameters of the continuous part.
    pub fn params(&self) -> &FitParams {
        &self.params
    }

    /// Returns the probability of zero, when zero inflation is enabled.
    pub fn p0(&self) -> Option<f64> {
        self.p0
    }

    /// Returns the values the parameters were estimated from.
    pub fn fit_sample(&self) -> &[f64] {
        &self.fit_sample
    }

    /// Returns the values the CDF and PDF are evaluated at.
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// CDF at `x`, including the zero-inflation correction. NaN stays NaN.
    pub fn cdf_at(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        match self.p0 {
            Some(p0) if x == 0.0 => p0,
            Some(p0) => p0 + (1.0 - p0) * self.family.cdf(&self.params, x),
            None => self.family.cdf(&self.params, x),
        }
    }

    /// CDF at every target value, in target order.
    pub fn cdf(&self) -> Vec<f64> {
        self.target.iter().map(|&x| self.cdf_at(x)).collect()
    }

    /// Density at every target value, in target order.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::ZeroInflatedDensity`] when zero inflation is
    /// enabled; no density correction for the point mass is defined.
    pub fn pdf(&self) -> Result<Vec<f64>, DistError> {
        if self.p0.is_some() {
            return Err(DistError::ZeroInflatedDensity);
        }
        Ok(self
            .target
            .iter()
            .map(|&x| self.family.pdf(&self.params, x))
            .collect())
    }

    /// `(value, density)` pairs of the target, sorted by value.
    ///
    /// # Errors
    ///
    /// Same as [`pdf`](Self::pdf).
    pub fn pdf_sorted(&self) -> Result<Vec<(f64, f64)>, DistError> {
        let mut pairs: Vec<(f64, f64)> = self.target.iter().copied().zip(self.pdf()?).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(pairs)
    }

    /// Quantile function, inverting the zero-inflated CDF when enabled:
    /// `q <= p0` maps to 0, otherwise to `F⁻¹((q - p0) / (1 - p0))`.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::InvalidProbability`] unless `0 <= q <= 1`.
    pub fn ppf(&self, q: f64) -> Result<f64, DistError> {
        if !(0.0..=1.0).contains(&q) {
            return Err(DistError::InvalidProbability { q });
        }
        Ok(match self.p0 {
            Some(p0) if q <= p0 => 0.0,
            Some(p0) => self.family.ppf(&self.params, (q - p0) / (1.0 - p0)),
            None => self.family.ppf(&self.params, q),
        })
    }

    /// Two-sided Kolmogorov–Smirnov p-value of the fit sample against the
    /// fitted continuous distribution (the non-zero values when zero
    /// inflation is enabled).
    pub fn ks_test(&self) -> f64 {
        let sample = if self.p0.is_some() {
            non_zero(&self.fit_sample)
        } else {
            self.fit_sample.clone()
        };
        let sorted = spei_stats::sorted_finite(&sample);
        let d = spei_stats::ks_statistic(&sorted, |x| self.family.cdf(&self.params, x));
        spei_stats::ks_pvalue(sorted.len(), d)
    }
}

fn non_zero(sample: &[f64]) -> Vec<f64> {
    sample.iter().copied().filter(|&x| x != 0.0).collect()
}

fn check_size(n: usize, config: &FitConfig) -> Result<(), DistError> {
    if n < config.min_sample() {
        return Err(DistError::InsufficientData {
            n,
            min: config.min_sample(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Vec<f64> {
        vec![0.0, 0.0, 1.2, 3.4, 2.2, 0.7, 5.1, 0.0, 1.9, 2.8]
    }

    #[test]
    fn zero_inflation_splits_point_mass() {
        let config = FitConfig::new().with_prob_zero(true);
        let fit = FittedDist::fit(Family::Gamma, sample(), None, &config).unwrap();
        assert_relative_eq!(fit.p0().unwrap(), 0.3, epsilon = 1e-12);
        let cdf = fit.cdf();
        assert_eq!(cdf[0], 0.3);
        assert_eq!(cdf[7], 0.3);
        assert!(cdf.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert!(cdf[6] > cdf[2]);
        assert!(cdf[2] > 0.3);
    }

    #[test]
    fn zeros_outside_gamma_support_without_inflation() {
        let err = FittedDist::fit(Family::Gamma, sample(), None, &FitConfig::new()).unwrap_err();
        assert!(matches!(err, DistError::OutsideSupport { .. }));
    }

    #[test]
    fn pdf_unsupported_with_zero_inflation() {
        let config = FitConfig::new().with_prob_zero(true);
        let fit = FittedDist::fit(Family::Gamma, sample(), None, &config).unwrap();
        assert_eq!(fit.pdf().unwrap_err(), DistError::ZeroInflatedDensity);
    }

    #[test]
    fn pdf_sorted_by_value() {
        let fit = FittedDist::fit(
            Family::Normal,
            vec![3.0, 1.0, 2.0, 5.0],
            None,
            &FitConfig::new(),
        )
        .unwrap();
        let pairs = fit.pdf_sorted().unwrap();
        let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 5.0]);
        assert!(pairs.iter().all(|p| p.1 > 0.0));
    }

    #[test]
    fn ppf_inverts_zero_inflated_cdf() {
        let config = FitConfig::new().with_prob_zero(true);
        let fit = FittedDist::fit(Family::Gamma, sample(), None, &config).unwrap();
        assert_eq!(fit.ppf(0.1).unwrap(), 0.0);
        assert_eq!(fit.ppf(0.3).unwrap(), 0.0);
        let x = fit.ppf(0.8).unwrap();
        assert_relative_eq!(fit.cdf_at(x), 0.8, epsilon = 1e-6);
        assert!(matches!(
            fit.ppf(1.5),
            Err(DistError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn window_is_fit_sample_target_is_evaluated() {
        let window: Vec<f64> = (1..=50).map(f64::from).collect();
        let fit = FittedDist::fit(
            Family::Normal,
            vec![25.5],
            Some(window),
            &FitConfig::new(),
        )
        .unwrap();
        assert_eq!(fit.fit_sample().len(), 50);
        assert_eq!(fit.target(), &[25.5]);
        assert_relative_eq!(fit.cdf()[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn all_zero_sample_is_insufficient() {
        let config = FitConfig::new().with_prob_zero(true);
        let err = FittedDist::fit(Family::Gamma, vec![0.0; 10], None, &config).unwrap_err();
        assert_eq!(err, DistError::InsufficientData { n: 0, min: 3 });
    }

    #[test]
    fn constant_sample_is_degenerate() {
        let err =
            FittedDist::fit(Family::Normal, vec![2.0; 5], None, &FitConfig::new()).unwrap_err();
        assert_eq!(err, DistError::ConstantSample { value: 2.0 });
    }

    #[test]
    fn nan_target_stays_nan() {
        let fit = FittedDist::fit(
            Family::Normal,
            vec![1.0, f64::NAN, 2.0, 4.0],
            None,
            &FitConfig::new(),
        )
        .unwrap();
        assert_eq!(fit.fit_sample().len(), 3);
        assert!(fit.cdf()[1].is_nan());
    }

    #[test]
    fn ks_pvalue_in_unit_interval() {
        let fit =
            FittedDist::fit(Family::Normal, sample(), None, &FitConfig::new()).unwrap();
        let p = fit.ks_test();
        assert!((0.0..=1.0).contains(&p));
    }
}

//! Three-parameter log-logistic distribution (scipy `fisk`).
//!
//! The shape is kept above 1 during estimation; below that the density is
//! unbounded at the location and the likelihood has no maximum.

use statrs::function::gamma::gamma;

use super::ContinuousFamily;
use crate::config::FitConfig;
use crate::error::DistError;
use crate::mle::maximize_likelihood;
use crate::params::FitParams;

pub(crate) struct LogLogistic;

fn from_theta(theta: &[f64]) -> Option<FitParams> {
    let c = 1.0 + theta[0].exp();
    Some(FitParams::new(Some(vec![c]), theta[1], theta[2].exp()))
}

fn to_theta(c: f64, loc: f64, scale: f64) -> Option<Vec<f64>> {
    let theta = vec![(c - 1.0).ln(), loc, scale.ln()];
    theta.iter().all(|t| t.is_finite()).then_some(theta)
}

/// Probability-weighted-moment estimate (Vicente-Serrano et al., 2010).
fn pwm_seed(sorted: &[f64]) -> Option<Vec<f64>> {
    let w0 = spei_stats::pwm_exceedance(sorted, 0);
    let w1 = spei_stats::pwm_exceedance(sorted, 1);
    let w2 = spei_stats::pwm_exceedance(sorted, 2);
    let c = (2.0 * w1 - w0) / (6.0 * w1 - w0 - 6.0 * w2);
    if !c.is_finite() || c <= 1.0 {
        return None;
    }
    let g = gamma(1.0 + 1.0 / c) * gamma(1.0 - 1.0 / c);
    let scale = (w0 - 2.0 * w1) * c / g;
    let loc = w0 - scale * g;
    if scale <= 0.0 || loc >= sorted[0] {
        return None;
    }
    to_theta(c, loc, scale)
}

/// Log-moment estimate with the location placed below the sample minimum.
fn log_moment_seed(sorted: &[f64]) -> Option<Vec<f64>> {
    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
    let loc = min - 0.1 * (max - min);
    let logs: Vec<f64> = sorted.iter().map(|x| (x - loc).ln()).collect();
    let sd = spei_stats::sd(&logs);
    let c = (std::f64::consts::PI / (3f64.sqrt() * sd)).max(1.05);
    to_theta(c, loc, spei_stats::mean(&logs).exp())
}

impl ContinuousFamily for LogLogistic {
    fn name(&self) -> &'static str {
        "fisk"
    }

    fn n_shape(&self) -> usize {
        1
    }

    fn fit(&self, sample: &[f64], config: &FitConfig) -> Result<FitParams, DistError> {
        let sorted = spei_stats::sorted_finite(sample);
        let seeds: Vec<Vec<f64>> = [pwm_seed(&sorted), log_moment_seed(&sorted)]
            .into_iter()
            .flatten()
            .collect();
        maximize_likelihood(self, sample, &seeds, from_theta, config)
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        if y <= 0.0 {
            return 0.0;
        }
        1.0 / (1.0 + y.powf(-params.shape_at(0)))
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.ln_pdf(params, x).exp()
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        if y <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let c = params.shape_at(0);
        let cly = c * y.ln();
        // ln(1 + y^c) without overflow
        let ln_1p_yc = if cly > 0.0 {
            cly + (-cly).exp().ln_1p()
        } else {
            cly.exp().ln_1p()
        };
        c.ln() + (c - 1.0) * y.ln() - params.scale().ln() - 2.0 * ln_1p_yc
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        if q <= 0.0 {
            return params.loc();
        }
        params.loc() + params.scale() * (q / (1.0 - q)).powf(1.0 / params.shape_at(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Uniform};
    use statrs::distribution::{ContinuousCDF, Normal};

    #[test]
    fn reference_values() {
        // scipy.stats.fisk(3).cdf(2) = 8/9, .pdf(1) = 0.75
        let p = FitParams::new(Some(vec![3.0]), 0.0, 1.0);
        assert_relative_eq!(LogLogistic.cdf(&p, 2.0), 8.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(LogLogistic.pdf(&p, 1.0), 0.75, epsilon = 1e-12);
        assert_relative_eq!(LogLogistic.ppf(&p, 0.5), 1.0, epsilon = 1e-12);
        assert_eq!(LogLogistic.ppf(&p, 1.0), f64::INFINITY);
    }

    #[test]
    fn density_far_in_tail_is_finite() {
        let p = FitParams::new(Some(vec![8.0]), 0.0, 1.0);
        assert!(LogLogistic.ln_pdf(&p, 1e60).is_finite());
    }

    #[test]
    fn recovers_parameters() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2010);
        let u = Uniform::new(0.001, 0.999).unwrap();
        let truth = FitParams::new(Some(vec![6.0]), -50.0, 80.0);
        let sample: Vec<f64> = (0..3000)
            .map(|_| LogLogistic.ppf(&truth, u.sample(&mut rng)))
            .collect();
        let p = LogLogistic.fit(&sample, &FitConfig::new()).unwrap();
        let median = LogLogistic.ppf(&p, 0.5);
        assert!((median - 30.0).abs() < 3.0, "median = {median}");
        assert!(LogLogistic.cdf(&p, sample.iter().cloned().fold(f64::INFINITY, f64::min)) < 0.01);
    }

    #[test]
    fn symmetric_sample_still_fits() {
        // no finite maximum: the likelihood improves as c and scale grow and
        // loc falls; the search must stop with usable parameters
        let normal = Normal::new(10.0, 30.0).unwrap();
        let n = 90;
        let sample: Vec<f64> = (1..=n)
            .map(|i| normal.inverse_cdf((f64::from(i) - 0.5) / f64::from(n)))
            .collect();
        let p = LogLogistic.fit(&sample, &FitConfig::new()).unwrap();
        assert!(p.is_valid(), "{p}");
        let cdf: Vec<f64> = sample.iter().map(|&x| LogLogistic.cdf(&p, x)).collect();
        assert!(cdf.windows(2).all(|w| w[0] <= w[1]));
        assert!(cdf.iter().all(|&q| q > 0.0 && q < 1.0));
        assert!((LogLogistic.cdf(&p, 10.0) - 0.5).abs() < 0.1);
    }

    #[test]
    fn pwm_seed_is_feasible_for_skewed_data() {
        let mut sorted: Vec<f64> = (1..=60).map(|i| (f64::from(i) / 10.0).exp()).collect();
        sorted.sort_by(f64::total_cmp);
        if let Some(seed) = pwm_seed(&sorted) {
            let p = from_theta(&seed).unwrap();
            assert!(p.loc() < sorted[0]);
            assert!(p.shape_at(0) > 1.0);
        }
        assert!(log_moment_seed(&sorted).is_some());
    }
}

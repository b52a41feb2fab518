//! Pearson type III distribution (scipy `pearson3`, shape `skew`).
//!
//! For `skew != 0` the standardized variable `t = alpha + beta * y`, with
//! `beta = 2 / skew` and `alpha = beta^2`, follows a unit-scale gamma
//! distribution; negative skew mirrors it. Near-zero skew is treated as
//! normal. Estimation keeps `|skew| < 2` (gamma shape above 1), where the
//! likelihood is bounded.

use statrs::distribution::{ContinuousCDF, Gamma as StatrsGamma, Normal as StdNormal};
use statrs::function::gamma::{gamma_lr, gamma_ur, ln_gamma};

use super::{ContinuousFamily, population_sd};
use crate::config::FitConfig;
use crate::error::DistError;
use crate::mle::maximize_likelihood;
use crate::params::FitParams;

pub(crate) struct Pearson3;

const NORMAL_SKEW: f64 = 1e-3;
const MAX_SKEW: f64 = 2.0;
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

fn from_theta(theta: &[f64]) -> Option<FitParams> {
    let skew = theta[0];
    (skew.abs() < MAX_SKEW).then(|| FitParams::new(Some(vec![skew]), theta[1], theta[2].exp()))
}

/// `(alpha, beta)` of the underlying gamma, or `None` in the normal regime.
fn gamma_form(skew: f64) -> Option<(f64, f64)> {
    if skew.abs() < NORMAL_SKEW {
        return None;
    }
    let beta = 2.0 / skew;
    Some((beta * beta, beta))
}

impl ContinuousFamily for Pearson3 {
    fn name(&self) -> &'static str {
        "pearson3"
    }

    fn n_shape(&self) -> usize {
        1
    }

    /// MLE over `(skew, loc, ln scale)`, seeded from the sample moments and
    /// from a near-symmetric start.
    fn fit(&self, sample: &[f64], config: &FitConfig) -> Result<FitParams, DistError> {
        let mean = spei_stats::mean(sample);
        let ln_sd = population_sd(sample).ln();
        let skew = spei_stats::skewness(sample);
        let near_zero = if skew < 0.0 { -0.01 } else { 0.01 };
        let seeds = [
            vec![skew.clamp(-1.9, 1.9), mean, ln_sd],
            vec![near_zero, mean, ln_sd],
        ];
        maximize_likelihood(self, sample, &seeds, from_theta, config)
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        let Some((alpha, beta)) = gamma_form(params.shape_at(0)) else {
            return StdNormal::standard().cdf(y);
        };
        let t = alpha + beta * y;
        if t <= 0.0 {
            return if beta > 0.0 { 0.0 } else { 1.0 };
        }
        if t.is_infinite() {
            return if beta > 0.0 { 1.0 } else { 0.0 };
        }
        if beta > 0.0 {
            gamma_lr(alpha, t)
        } else {
            gamma_ur(alpha, t)
        }
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.ln_pdf(params, x).exp()
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        let ln_scale = params.scale().ln();
        let Some((alpha, beta)) = gamma_form(params.shape_at(0)) else {
            return -0.5 * y * y - LN_SQRT_2PI - ln_scale;
        };
        let t = alpha + beta * y;
        if t <= 0.0 {
            return f64::NEG_INFINITY;
        }
        beta.abs().ln() + (alpha - 1.0) * t.ln() - t - ln_gamma(alpha) - ln_scale
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        let Some((alpha, beta)) = gamma_form(params.shape_at(0)) else {
            return match q {
                q if q <= 0.0 => f64::NEG_INFINITY,
                q if q >= 1.0 => f64::INFINITY,
                q => params.loc() + params.scale() * StdNormal::standard().inverse_cdf(q),
            };
        };
        // Lower tail of y is the lower tail of t for positive skew only.
        let p = if beta > 0.0 { q } else { 1.0 - q };
        let t = match p {
            p if p <= 0.0 => 0.0,
            p if p >= 1.0 => f64::INFINITY,
            p => match StatrsGamma::new(alpha, 1.0) {
                Ok(g) => g.inverse_cdf(p),
                Err(_) => return f64::NAN,
            },
        };
        params.loc() + params.scale() * (t - alpha) / beta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_distr::Distribution;

    #[test]
    fn zero_skew_is_normal() {
        let p = FitParams::new(Some(vec![0.0]), 1.0, 2.0);
        assert_relative_eq!(Pearson3.cdf(&p, 1.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(Pearson3.ppf(&p, 0.5), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn skew_two_is_shifted_exponential() {
        // skew = 2: alpha = 1, beta = 1, t = 1 + y ~ Exp(1)
        let p = FitParams::new(Some(vec![2.0]), 0.0, 1.0);
        assert_relative_eq!(Pearson3.cdf(&p, 0.0), 1.0 - (-1.0f64).exp(), epsilon = 1e-10);
        assert_eq!(Pearson3.cdf(&p, -1.5), 0.0);
        assert_relative_eq!(Pearson3.pdf(&p, 0.0), (-1.0f64).exp(), epsilon = 1e-10);
    }

    #[test]
    fn negative_skew_mirrors_positive() {
        let pos = FitParams::new(Some(vec![0.8]), 0.0, 1.0);
        let neg = FitParams::new(Some(vec![-0.8]), 0.0, 1.0);
        for x in [-1.0, 0.0, 0.7, 2.0] {
            assert_relative_eq!(Pearson3.cdf(&neg, -x), 1.0 - Pearson3.cdf(&pos, x), epsilon = 1e-10);
            assert_relative_eq!(Pearson3.pdf(&neg, -x), Pearson3.pdf(&pos, x), epsilon = 1e-10);
        }
    }

    #[test]
    fn ppf_inverts_cdf() {
        for skew in [-1.2, 0.5, 1.5] {
            let p = FitParams::new(Some(vec![skew]), 3.0, 2.0);
            for q in [0.1, 0.5, 0.9] {
                assert_relative_eq!(Pearson3.cdf(&p, Pearson3.ppf(&p, q)), q, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn recovers_skew_sign() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let g = rand_distr::Gamma::new(4.0, 1.0).unwrap();
        // Gamma(4) has skewness 1.
        let sample: Vec<f64> = (0..3000).map(|_| 10.0 - g.sample(&mut rng)).collect();
        let p = Pearson3.fit(&sample, &FitConfig::new()).unwrap();
        assert!((p.shape_at(0) + 1.0).abs() < 0.2, "skew = {}", p.shape_at(0));
    }
}

//! Two-parameter gamma distribution (location fixed at zero).

use statrs::distribution::{ContinuousCDF, Gamma as StatrsGamma};
use statrs::function::gamma::{gamma_lr, ln_gamma};

use super::{ContinuousFamily, check_support};
use crate::config::FitConfig;
use crate::error::DistError;
use crate::mle::maximize_likelihood;
use crate::params::FitParams;

pub(crate) struct Gamma;

fn from_theta(theta: &[f64]) -> Option<FitParams> {
    Some(FitParams::new(Some(vec![theta[0].exp()]), 0.0, theta[1].exp()))
}

/// Thom (1958) approximation of the shape MLE.
fn thom_shape(sample: &[f64]) -> Option<f64> {
    let mean = spei_stats::mean(sample);
    let mean_ln = sample.iter().map(|x| x.ln()).sum::<f64>() / sample.len() as f64;
    let a = mean.ln() - mean_ln;
    (a > 0.0).then(|| (1.0 + (1.0 + 4.0 * a / 3.0).sqrt()) / (4.0 * a))
}

impl ContinuousFamily for Gamma {
    fn name(&self) -> &'static str {
        "gamma"
    }

    fn n_shape(&self) -> usize {
        1
    }

    fn fit(&self, sample: &[f64], config: &FitConfig) -> Result<FitParams, DistError> {
        check_support(self.name(), "x > 0", sample, |x| x > 0.0)?;
        let mean = spei_stats::mean(sample);
        let var = spei_stats::variance(sample);

        let mut seeds = vec![vec![(mean * mean / var).ln(), (var / mean).ln()]];
        if let Some(a) = thom_shape(sample) {
            seeds.insert(0, vec![a.ln(), (mean / a).ln()]);
        }
        maximize_likelihood(self, sample, &seeds, from_theta, config)
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        if y <= 0.0 {
            return 0.0;
        }
        if y.is_infinite() {
            return 1.0;
        }
        gamma_lr(params.shape_at(0), y)
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.ln_pdf(params, x).exp()
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        if y <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let a = params.shape_at(0);
        (a - 1.0) * y.ln() - y - ln_gamma(a) - params.scale().ln()
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        if q <= 0.0 {
            return params.loc();
        }
        if q >= 1.0 {
            return f64::INFINITY;
        }
        StatrsGamma::new(params.shape_at(0), 1.0)
            .map(|g| params.loc() + params.scale() * g.inverse_cdf(q))
            .unwrap_or(f64::NAN)
    }
}

//! Logistic distribution.

use super::ContinuousFamily;
use crate::config::FitConfig;
use crate::error::DistError;
use crate::mle::maximize_likelihood;
use crate::params::FitParams;

pub(crate) struct Logistic;

fn from_theta(theta: &[f64]) -> Option<FitParams> {
    Some(FitParams::loc_scale(theta[0], theta[1].exp()))
}

impl ContinuousFamily for Logistic {
    fn name(&self) -> &'static str {
        "logistic"
    }

    fn n_shape(&self) -> usize {
        0
    }

    /// MLE over `(loc, ln scale)`, seeded from the moments
    /// (`scale = sd * sqrt(3) / pi`).
    fn fit(&self, sample: &[f64], config: &FitConfig) -> Result<FitParams, DistError> {
        let mean = spei_stats::mean(sample);
        let scale = spei_stats::sd(sample) * 3f64.sqrt() / std::f64::consts::PI;
        let median = spei_stats::quantile_type7(&spei_stats::sorted_finite(sample), 0.5);
        let seeds = [vec![mean, scale.ln()], vec![median, scale.ln()]];
        maximize_likelihood(self, sample, &seeds, from_theta, config)
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        let z = params.standardize(x);
        1.0 / (1.0 + (-z).exp())
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.ln_pdf(params, x).exp()
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        // Symmetric in z; |z| keeps exp() from overflowing.
        let z = params.standardize(x).abs();
        -z - 2.0 * (-z).exp().ln_1p() - params.scale().ln()
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        params.loc() + params.scale() * (q / (1.0 - q)).ln()
    }
}

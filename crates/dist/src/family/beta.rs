//! Beta distribution on the unit interval (location 0 and scale 1 fixed).

use statrs::distribution::{Beta as StatrsBeta, ContinuousCDF};
use statrs::function::beta::ln_beta;

use super::{ContinuousFamily, check_support};
use crate::config::FitConfig;
use crate::error::DistError;
use crate::mle::maximize_likelihood;
use crate::params::FitParams;

pub(crate) struct Beta;

fn from_theta(theta: &[f64]) -> Option<FitParams> {
    Some(FitParams::new(
        Some(vec![theta[0].exp(), theta[1].exp()]),
        0.0,
        1.0,
    ))
}

fn statrs_beta(params: &FitParams) -> Option<StatrsBeta> {
    StatrsBeta::new(params.shape_at(0), params.shape_at(1)).ok()
}

impl ContinuousFamily for Beta {
    fn name(&self) -> &'static str {
        "beta"
    }

    fn n_shape(&self) -> usize {
        2
    }

    /// MLE over `(ln a, ln b)` seeded with the method of moments.
    fn fit(&self, sample: &[f64], config: &FitConfig) -> Result<FitParams, DistError> {
        check_support(self.name(), "0 < x < 1", sample, |x| x > 0.0 && x < 1.0)?;
        let m = spei_stats::mean(sample);
        let v = spei_stats::variance(sample);
        let common = (m * (1.0 - m) / v - 1.0).max(1e-3);
        let seeds = [
            vec![(m * common).ln(), ((1.0 - m) * common).ln()],
            vec![0.0, 0.0],
        ];
        maximize_likelihood(self, sample, &seeds, from_theta, config)
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        if y <= 0.0 {
            return 0.0;
        }
        if y >= 1.0 {
            return 1.0;
        }
        statrs_beta(params).map_or(f64::NAN, |b| b.cdf(y))
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.ln_pdf(params, x).exp()
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        if y <= 0.0 || y >= 1.0 {
            return f64::NEG_INFINITY;
        }
        let (a, b) = (params.shape_at(0), params.shape_at(1));
        if a <= 0.0 || b <= 0.0 {
            return f64::NEG_INFINITY;
        }
        (a - 1.0) * y.ln() + (b - 1.0) * (-y).ln_1p() - ln_beta(a, b) - params.scale().ln()
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        let y = match q {
            q if q <= 0.0 => 0.0,
            q if q >= 1.0 => 1.0,
            q => statrs_beta(params).map_or(f64::NAN, |b| b.inverse_cdf(q)),
        };
        params.loc() + params.scale() * y
    }
}

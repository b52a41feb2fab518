//! Two-parameter log-normal distribution (location fixed at zero).

use statrs::distribution::{ContinuousCDF, Normal as StdNormal};

use super::{ContinuousFamily, check_support, population_sd};
use crate::config::FitConfig;
use crate::error::DistError;
use crate::params::FitParams;

const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

pub(crate) struct LogNormal;

impl ContinuousFamily for LogNormal {
    fn name(&self) -> &'static str {
        "lognorm"
    }

    fn n_shape(&self) -> usize {
        1
    }

    /// Closed-form MLE: `s` and `ln scale` are the population standard
    /// deviation and mean of `ln x`.
    fn fit(&self, sample: &[f64], _config: &FitConfig) -> Result<FitParams, DistError> {
        check_support(self.name(), "x > 0", sample, |x| x > 0.0)?;
        let logs: Vec<f64> = sample.iter().map(|x| x.ln()).collect();
        let s = population_sd(&logs);
        Ok(FitParams::new(
            Some(vec![s]),
            0.0,
            spei_stats::mean(&logs).exp(),
        ))
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        if y <= 0.0 {
            return 0.0;
        }
        StdNormal::standard().cdf(y.ln() / params.shape_at(0))
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.ln_pdf(params, x).exp()
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        let y = params.standardize(x);
        if y <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let s = params.shape_at(0);
        let z = y.ln() / s;
        -0.5 * z * z - (s * y).ln() - params.scale().ln() - LN_SQRT_2PI
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        if q <= 0.0 {
            return params.loc();
        }
        if q >= 1.0 {
            return f64::INFINITY;
        }
        let z = StdNormal::standard().inverse_cdf(q);
        params.loc() + params.scale() * (params.shape_at(0) * z).exp()
    }
}

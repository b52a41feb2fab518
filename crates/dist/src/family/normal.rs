//! Normal distribution with closed-form maximum likelihood.

use statrs::distribution::{ContinuousCDF, Normal as StdNormal};

use super::{ContinuousFamily, population_sd};
use crate::config::FitConfig;
use crate::error::DistError;
use crate::params::FitParams;

const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

pub(crate) struct Normal;

impl ContinuousFamily for Normal {
    fn name(&self) -> &'static str {
        "norm"
    }

    fn n_shape(&self) -> usize {
        0
    }

    fn fit(&self, sample: &[f64], _config: &FitConfig) -> Result<FitParams, DistError> {
        Ok(FitParams::loc_scale(
            spei_stats::mean(sample),
            population_sd(sample),
        ))
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        StdNormal::standard().cdf(params.standardize(x))
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.ln_pdf(params, x).exp()
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        let z = params.standardize(x);
        -0.5 * z * z - params.scale().ln() - LN_SQRT_2PI
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        match q {
            q if q <= 0.0 => f64::NEG_INFINITY,
            q if q >= 1.0 => f64::INFINITY,
            q => params.loc() + params.scale() * StdNormal::standard().inverse_cdf(q),
        }
    }
}

//! Generalized extreme value distribution (scipy `genextreme`, shape `c`).
//!
//! `c > 0` bounds the support from above, `c < 0` from below and `c = 0`
//! is the Gumbel distribution. Estimation keeps `c < 1`, where the
//! likelihood is bounded.

use statrs::function::gamma::gamma;

use super::{ContinuousFamily, population_sd};
use crate::config::FitConfig;
use crate::error::DistError;
use crate::mle::maximize_likelihood;
use crate::params::FitParams;

pub(crate) struct Gev;

const GUMBEL_EPS: f64 = 1e-9;
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

fn from_theta(theta: &[f64]) -> Option<FitParams> {
    let c = theta[0];
    (c < 1.0 && c > -5.0).then(|| FitParams::new(Some(vec![c]), theta[1], theta[2].exp()))
}

/// L-moment estimate (Hosking, Wallis & Wood, 1985).
fn hosking_seed(sorted: &[f64]) -> Option<Vec<f64>> {
    let lm = spei_stats::l_moments(sorted)?;
    let z = 2.0 / (3.0 + lm.t3) - 2f64.ln() / 3f64.ln();
    let c = (7.8590 * z + 2.9554 * z * z).clamp(-0.9, 0.9);
    let (loc, scale) = if c.abs() < 1e-6 {
        let scale = lm.l2 / 2f64.ln();
        (lm.l1 - EULER_GAMMA * scale, scale)
    } else {
        let g = gamma(1.0 + c);
        let scale = lm.l2 * c / ((1.0 - 2f64.powf(-c)) * g);
        (lm.l1 - scale * (1.0 - g) / c, scale)
    };
    (scale > 0.0 && scale.is_finite() && loc.is_finite()).then(|| vec![c, loc, scale.ln()])
}

/// Gumbel moment estimate.
fn gumbel_seed(sample: &[f64]) -> Vec<f64> {
    let scale = population_sd(sample) * 6f64.sqrt() / std::f64::consts::PI;
    vec![0.0, spei_stats::mean(sample) - EULER_GAMMA * scale, scale.ln()]
}

impl ContinuousFamily for Gev {
    fn name(&self) -> &'static str {
        "genextreme"
    }

    fn n_shape(&self) -> usize {
        1
    }

    fn fit(&self, sample: &[f64], config: &FitConfig) -> Result<FitParams, DistError> {
        let sorted = spei_stats::sorted_finite(sample);
        let mut seeds = vec![gumbel_seed(sample)];
        if let Some(seed) = hosking_seed(&sorted) {
            seeds.insert(0, seed);
        }
        maximize_likelihood(self, sample, &seeds, from_theta, config)
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        let c = params.shape_at(0);
        let y = params.standardize(x);
        if c.abs() < GUMBEL_EPS {
            return (-(-y).exp()).exp();
        }
        let u = 1.0 - c * y;
        if u <= 0.0 {
            return if c > 0.0 { 1.0 } else { 0.0 };
        }
        (-u.powf(1.0 / c)).exp()
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.ln_pdf(params, x).exp()
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        let c = params.shape_at(0);
        let y = params.standardize(x);
        let ln_scale = params.scale().ln();
        if c.abs() < GUMBEL_EPS {
            return -ln_scale - y - (-y).exp();
        }
        let u = 1.0 - c * y;
        if u <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let ln_u = u.ln();
        -ln_scale + (1.0 / c - 1.0) * ln_u - (ln_u / c).exp()
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        let c = params.shape_at(0);
        let neg_ln_q = -q.ln();
        if c.abs() < GUMBEL_EPS {
            return params.loc() - params.scale() * neg_ln_q.ln();
        }
        params.loc() + params.scale() * (1.0 - neg_ln_q.powf(c)) / c
    }
}

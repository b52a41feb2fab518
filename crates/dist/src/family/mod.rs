//! Supported continuous distribution families.
//!
//! Every family implements [`ContinuousFamily`]; [`Family`] is the closed
//! set of families a standardized index can be computed with, dispatching
//! to the per-family implementation.

mod beta;
mod gamma;
mod gev;
mod logistic;
mod loglogistic;
mod lognormal;
mod normal;
mod pearson3;

use std::fmt;
use std::str::FromStr;

use crate::config::FitConfig;
use crate::error::DistError;
use crate::params::FitParams;

/// Capability set of a continuous distribution family, in scipy's
/// `(*shape, loc, scale)` parameter convention.
pub trait ContinuousFamily {
    /// scipy-style name (`"gamma"`, `"fisk"`, ...).
    fn name(&self) -> &'static str;

    /// Number of shape parameters.
    fn n_shape(&self) -> usize;

    /// Estimates parameters from a sample of finite values with at least
    /// two distinct values.
    fn fit(&self, sample: &[f64], config: &FitConfig) -> Result<FitParams, DistError>;

    /// Cumulative distribution function.
    fn cdf(&self, params: &FitParams, x: f64) -> f64;

    /// Probability density function.
    fn pdf(&self, params: &FitParams, x: f64) -> f64;

    /// Natural log of the density; `-inf` outside the support.
    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.pdf(params, x).ln()
    }

    /// Quantile function for `q` in `[0, 1]`.
    fn ppf(&self, params: &FitParams, q: f64) -> f64;
}

/// Closed set of supported families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// Normal (`norm`).
    Normal,
    /// Logistic (`logistic`).
    Logistic,
    /// Two-parameter gamma with location fixed at zero (`gamma`).
    Gamma,
    /// Two-parameter log-normal with location fixed at zero (`lognorm`).
    LogNormal,
    /// Three-parameter log-logistic (`fisk`).
    LogLogistic,
    /// Generalized extreme value (`genextreme`).
    Gev,
    /// Pearson type III (`pearson3`).
    Pearson3,
    /// Beta on the unit interval (`beta`).
    Beta,
}

impl Family {
    /// All families, in declaration order.
    pub const ALL: [Family; 8] = [
        Family::Normal,
        Family::Logistic,
        Family::Gamma,
        Family::LogNormal,
        Family::LogLogistic,
        Family::Gev,
        Family::Pearson3,
        Family::Beta,
    ];

    fn implementation(self) -> &'static dyn ContinuousFamily {
        match self {
            Self::Normal => &normal::Normal,
            Self::Logistic => &logistic::Logistic,
            Self::Gamma => &gamma::Gamma,
            Self::LogNormal => &lognormal::LogNormal,
            Self::LogLogistic => &loglogistic::LogLogistic,
            Self::Gev => &gev::Gev,
            Self::Pearson3 => &pearson3::Pearson3,
            Self::Beta => &beta::Beta,
        }
    }

    /// Looks a family up by its scipy name or a common alias.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::UnknownFamily`] for unrecognised names.
    pub fn from_name(name: &str) -> Result<Self, DistError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "norm" | "normal" => Ok(Self::Normal),
            "logistic" => Ok(Self::Logistic),
            "gamma" => Ok(Self::Gamma),
            "lognorm" | "lognormal" => Ok(Self::LogNormal),
            "fisk" | "loglogistic" | "log-logistic" => Ok(Self::LogLogistic),
            "genextreme" | "gev" => Ok(Self::Gev),
            "pearson3" | "pearsoniii" => Ok(Self::Pearson3),
            "beta" => Ok(Self::Beta),
            _ => Err(DistError::UnknownFamily {
                name: name.to_string(),
            }),
        }
    }
}

impl ContinuousFamily for Family {
    fn name(&self) -> &'static str {
        self.implementation().name()
    }

    fn n_shape(&self) -> usize {
        self.implementation().n_shape()
    }

    fn fit(&self, sample: &[f64], config: &FitConfig) -> Result<FitParams, DistError> {
        self.implementation().fit(sample, config)
    }

    fn cdf(&self, params: &FitParams, x: f64) -> f64 {
        self.implementation().cdf(params, x)
    }

    fn pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.implementation().pdf(params, x)
    }

    fn ln_pdf(&self, params: &FitParams, x: f64) -> f64 {
        self.implementation().ln_pdf(params, x)
    }

    fn ppf(&self, params: &FitParams, q: f64) -> f64 {
        self.implementation().ppf(params, q)
    }
}

impl FromStr for Family {
    type Err = DistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fails with [`DistError::OutsideSupport`] for the first value not
/// accepted by `in_support`.
pub(crate) fn check_support(
    family: &'static str,
    support: &'static str,
    sample: &[f64],
    in_support: impl Fn(f64) -> bool,
) -> Result<(), DistError> {
    match sample.iter().find(|&&x| !in_support(x)) {
        Some(&value) => Err(DistError::OutsideSupport {
            family,
            value,
            support,
        }),
        None => Ok(()),
    }
}

/// Population (biased) standard deviation.
pub(crate) fn population_sd(sample: &[f64]) -> f64 {
    let n = sample.len() as f64;
    let m = spei_stats::mean(sample);
    (sample.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / n).sqrt()
}

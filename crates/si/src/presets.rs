//! Named standardized indices with their customary defaults.
//!
//! | Index | Quantity | Default family | Zero inflation | Aggregation |
//! |-------|----------|----------------|----------------|-------------|
//! | SPI | precipitation | gamma | yes | sum |
//! | SPEI | precipitation minus evaporation | log-logistic (`fisk`) | no | sum |
//! | SSFI | streamflow | GEV (`genextreme`) | yes | sum |
//! | SSMI | soil moisture | beta | yes | mean |
//! | SGI | groundwater level | normal-scores transform | n/a | mean |

use spei_calendar::{AggFunc, Diagnostics, SeriesInput, TimeSeries};
use spei_dist::{Family, FitConfig};

use crate::config::SiConfig;
use crate::error::SiError;
use crate::fitted::FittedSi;

/// Optional overrides of a preset's defaults.
///
/// `timescale`, `fit_freq` and `fit_window` are forwarded verbatim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexOptions {
    dist: Option<Family>,
    timescale: usize,
    fit_freq: Option<String>,
    fit_window: usize,
    prob_zero: Option<bool>,
    agg_func: Option<AggFunc>,
    fit_config: Option<FitConfig>,
}

impl IndexOptions {
    /// Options that keep every preset default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the distribution family (ignored by [`sgi`]).
    pub fn with_dist(mut self, dist: Family) -> Self {
        self.dist = Some(dist);
        self
    }

    /// Sets the accumulation timescale in periods.
    pub fn with_timescale(mut self, n: usize) -> Self {
        self.timescale = n;
        self
    }

    /// Sets the fitting frequency token.
    pub fn with_fit_freq(mut self, token: impl Into<String>) -> Self {
        self.fit_freq = Some(token.into());
        self
    }

    /// Sets the rolling fit window in periods.
    pub fn with_fit_window(mut self, n: usize) -> Self {
        self.fit_window = n;
        self
    }

    /// Overrides the zero-inflation default.
    pub fn with_prob_zero(mut self, b: bool) -> Self {
        self.prob_zero = Some(b);
        self
    }

    /// Overrides the aggregation default.
    pub fn with_agg_func(mut self, agg: AggFunc) -> Self {
        self.agg_func = Some(agg);
        self
    }

    /// Overrides the optimizer configuration.
    pub fn with_fit_config(mut self, config: FitConfig) -> Self {
        self.fit_config = Some(config);
        self
    }

    fn config(&self, dist: Family, prob_zero: bool, agg_func: AggFunc) -> SiConfig {
        let mut config = SiConfig::new(self.dist.unwrap_or(dist))
            .with_timescale(self.timescale)
            .with_fit_window(self.fit_window)
            .with_prob_zero(self.prob_zero.unwrap_or(prob_zero))
            .with_agg_func(self.agg_func.unwrap_or(agg_func));
        if let Some(token) = &self.fit_freq {
            config = config.with_fit_freq(token.clone());
        }
        if let Some(fit_config) = &self.fit_config {
            config = config.with_fit_config(fit_config.clone());
        }
        config
    }
}

/// A standardized index together with the run that produced it.
#[derive(Debug, Clone)]
pub struct IndexResult {
    index: TimeSeries,
    fitted: FittedSi,
}

impl IndexResult {
    fn compute(config: SiConfig, input: SeriesInput) -> Result<Self, SiError> {
        let fitted = config.prepare(input)?.fit_distribution()?;
        Ok(Self {
            index: fitted.si(),
            fitted,
        })
    }

    /// The standardized index, aligned to the aggregated input index.
    pub fn index(&self) -> &TimeSeries {
        &self.index
    }

    /// Consumes `self` and returns the index series.
    pub fn into_index(self) -> TimeSeries {
        self.index
    }

    /// The fitted run, for CDF, PDF, quantiles and per-group fits.
    pub fn fitted(&self) -> &FittedSi {
        &self.fitted
    }

    /// Notices recorded during the run.
    pub fn diagnostics(&self) -> &Diagnostics {
        self.fitted.diagnostics()
    }
}

/// Standardized Precipitation Index (Lloyd-Hughes & Saunders, 2002).
///
/// # Errors
///
/// Any preparation or fit error; see [`SiError::kind`].
pub fn spi(input: SeriesInput, options: &IndexOptions) -> Result<IndexResult, SiError> {
    IndexResult::compute(options.config(Family::Gamma, true, AggFunc::Sum), input)
}

/// Standardized Precipitation Evaporation Index (Vicente-Serrano et al.,
/// 2010), computed on precipitation minus potential evaporation.
///
/// # Errors
///
/// Any preparation or fit error; see [`SiError::kind`].
pub fn spei(input: SeriesInput, options: &IndexOptions) -> Result<IndexResult, SiError> {
    IndexResult::compute(
        options.config(Family::LogLogistic, false, AggFunc::Sum),
        input,
    )
}

/// Standardized Streamflow Index (Vicente-Serrano et al., 2012).
///
/// # Errors
///
/// Any preparation or fit error; see [`SiError::kind`].
pub fn ssfi(input: SeriesInput, options: &IndexOptions) -> Result<IndexResult, SiError> {
    IndexResult::compute(options.config(Family::Gev, true, AggFunc::Sum), input)
}

/// Standardized Soil Moisture Index (Carrão et al., 2016), for volumetric
/// soil moisture in `[0, 1)`.
///
/// # Errors
///
/// Any preparation or fit error; see [`SiError::kind`].
pub fn ssmi(input: SeriesInput, options: &IndexOptions) -> Result<IndexResult, SiError> {
    IndexResult::compute(options.config(Family::Beta, true, AggFunc::Mean), input)
}

/// Standardized Groundwater Index (Bloomfield & Marchant, 2013).
///
/// Always uses the normal-scores transform; a distribution override is
/// ignored.
///
/// # Errors
///
/// Any preparation error; see [`SiError::kind`].
pub fn sgi(input: SeriesInput, options: &IndexOptions) -> Result<IndexResult, SiError> {
    let config = options
        .config(Family::Normal, false, AggFunc::Mean)
        .with_dist(Family::Normal)
        .with_prob_zero(false)
        .with_normal_scores_transform(true);
    IndexResult::compute(config, input)
}

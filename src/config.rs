//! TOML run configuration.
//!
//! ```toml
//! index = "spi"
//! dist = "gamma"
//! timescale = 3
//! fit_freq = "ME"
//!
//! [fit]
//! max_iters = 2000
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use spei_calendar::{AggFunc, SeriesInput};
use spei_dist::{Family, FitConfig};
use spei_si::{IndexOptions, IndexResult, SiError};
use tracing::info;

/// Named index to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexName {
    /// Standardized Precipitation Index.
    Spi,
    /// Standardized Precipitation Evaporation Index.
    Spei,
    /// Standardized Groundwater Index.
    Sgi,
    /// Standardized Streamflow Index.
    Ssfi,
    /// Standardized Soil Moisture Index.
    Ssmi,
}

/// Rolling aggregation function as spelled in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggToml {
    Sum,
    Mean,
}

impl From<AggToml> for AggFunc {
    fn from(agg: AggToml) -> Self {
        match agg {
            AggToml::Sum => AggFunc::Sum,
            AggToml::Mean => AggFunc::Mean,
        }
    }
}

/// Top-level run configuration.
///
/// Unset options keep the defaults of the chosen index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexToml {
    /// Which index to compute.
    pub index: IndexName,

    /// Distribution by scipy-style name (`gamma`, `fisk`, `genextreme`, ...).
    #[serde(default)]
    pub dist: Option<String>,

    /// Accumulation timescale in periods (0 disables aggregation).
    #[serde(default)]
    pub timescale: usize,

    /// Fitting frequency token; inferred from the index when absent.
    #[serde(default)]
    pub fit_freq: Option<String>,

    /// Rolling fit window in periods (0 disables the window).
    #[serde(default)]
    pub fit_window: usize,

    /// Zero-inflation override.
    #[serde(default)]
    pub prob_zero: Option<bool>,

    /// Aggregation override.
    #[serde(default)]
    pub agg_func: Option<AggToml>,

    /// Optimizer settings.
    #[serde(default)]
    pub fit: FitToml,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitToml {
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
    #[serde(default = "default_f_tolerance")]
    pub f_tolerance: f64,
    #[serde(default = "default_min_sample")]
    pub min_sample: usize,
}

impl Default for FitToml {
    fn default() -> Self {
        Self {
            max_iters: default_max_iters(),
            sd_tolerance: default_sd_tolerance(),
            f_tolerance: default_f_tolerance(),
            min_sample: default_min_sample(),
        }
    }
}

fn default_max_iters() -> u64 {
    FitConfig::new().max_iters()
}
fn default_sd_tolerance() -> f64 {
    FitConfig::new().sd_tolerance()
}
fn default_f_tolerance() -> f64 {
    FitConfig::new().f_tolerance()
}
fn default_min_sample() -> usize {
    FitConfig::new().min_sample()
}

impl IndexToml {
    /// Converts the file options into preset overrides.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown distribution name.
    pub fn options(&self) -> Result<IndexOptions, SiError> {
        let fit_config = FitConfig::new()
            .with_max_iters(self.fit.max_iters)
            .with_sd_tolerance(self.fit.sd_tolerance)
            .with_f_tolerance(self.fit.f_tolerance)
            .with_min_sample(self.fit.min_sample);
        let mut options = IndexOptions::new()
            .with_timescale(self.timescale)
            .with_fit_window(self.fit_window)
            .with_fit_config(fit_config);
        if let Some(name) = &self.dist {
            options = options.with_dist(Family::from_name(name)?);
        }
        if let Some(token) = &self.fit_freq {
            options = options.with_fit_freq(token.clone());
        }
        if let Some(b) = self.prob_zero {
            options = options.with_prob_zero(b);
        }
        if let Some(agg) = self.agg_func {
            options = options.with_agg_func(agg.into());
        }
        Ok(options)
    }
}

/// Parses a run configuration from TOML text.
pub fn parse_config(text: &str) -> Result<IndexToml> {
    toml::from_str(text).context("failed to parse TOML config")
}

/// Reads and parses a run configuration file.
pub fn load_config(path: &Path) -> Result<IndexToml> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("invalid config file: {}", path.display()))
}

/// Computes the configured index for `input`.
///
/// # Errors
///
/// Any error of the selected preset.
pub fn run_index(input: SeriesInput, config: &IndexToml) -> Result<IndexResult, SiError> {
    let options = config.options()?;
    info!(index = ?config.index, "computing index");
    match config.index {
        IndexName::Spi => spei_si::spi(input, &options),
        IndexName::Spei => spei_si::spei(input, &options),
        IndexName::Sgi => spei_si::sgi(input, &options),
        IndexName::Ssfi => spei_si::ssfi(input, &options),
        IndexName::Ssmi => spei_si::ssmi(input, &options),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let c = parse_config("index = \"spi\"").unwrap();
        assert_eq!(c.index, IndexName::Spi);
        assert_eq!(c.dist, None);
        assert_eq!(c.timescale, 0);
        assert_eq!(c.fit, FitToml::default());
        assert_eq!(c.fit.max_iters, 5000);
    }

    #[test]
    fn full_config() {
        let c = parse_config(
            r#"
            index = "ssfi"
            dist = "pearson3"
            timescale = 3
            fit_freq = "W"
            fit_window = 4
            prob_zero = false
            agg_func = "mean"

            [fit]
            max_iters = 800
            f_tolerance = 1e-6
            "#,
        )
        .unwrap();
        assert_eq!(c.index, IndexName::Ssfi);
        assert_eq!(c.agg_func, Some(AggToml::Mean));
        assert_eq!(c.fit.max_iters, 800);
        assert_eq!(c.fit.f_tolerance, 1e-6);
        assert!(c.options().is_ok());
    }

    #[test]
    fn unknown_field_rejected() {
        let err = parse_config("index = \"spi\"\nwindow = 3").unwrap_err();
        assert!(format!("{err:#}").contains("window"));
    }

    #[test]
    fn unknown_index_rejected() {
        assert!(parse_config("index = \"pdsi\"").is_err());
    }

    #[test]
    fn unknown_distribution_is_config_error() {
        let c = parse_config("index = \"spi\"\ndist = \"weibull\"").unwrap();
        let err = c.options().unwrap_err();
        assert_eq!(err.kind(), spei_si::ErrorKind::Config);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("index.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "index = \"spei\"\ndist = \"fisk\"").unwrap();
        let c = load_config(&path).unwrap();
        assert_eq!(c.index, IndexName::Spei);
        assert_eq!(c.dist.as_deref(), Some("fisk"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_config(Path::new("/nonexistent/index.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/index.toml"));
    }
}

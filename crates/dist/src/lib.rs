//! # spei-dist
//!
//! Continuous distribution fitting for standardized indices.
//!
//! Fits one of a closed set of scipy-named families by maximum likelihood
//! (Nelder-Mead via `argmin`), optionally with a point mass at zero, and
//! evaluates the fitted CDF, PDF, quantile function and a
//! Kolmogorov–Smirnov goodness-of-fit p-value.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["target + window"] -->|"FittedDist::fit()"| B["FittedDist"]
//!     C["Family"] --> B
//!     D["FitConfig"] --> B
//!     B -->|".cdf()"| E["probabilities"]
//!     B -->|".ppf(q)"| F["quantile"]
//!     B -->|".ks_test()"| G["p-value"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use spei_dist::{Family, FitConfig, FittedDist};
//!
//! let config = FitConfig::new().with_prob_zero(true);
//! let fit = FittedDist::fit(Family::Gamma, precip, None, &config)?;
//! let probabilities = fit.cdf();
//! let p_value = fit.ks_test();
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `family` | Family trait and per-family estimation |
//! | `fitted` | Fitted distribution with zero inflation |
//! | `mle` | Nelder-Mead likelihood maximization (internal) |
//! | `params` | Fitted parameter vector |
//! | `config` | Fit configuration |
//! | `error` | Error types |

mod config;
mod error;
mod family;
mod fitted;
pub(crate) mod mle;
mod params;

pub use config::FitConfig;
pub use error::DistError;
pub use family::{ContinuousFamily, Family};
pub use fitted::FittedDist;
pub use params::FitParams;

//! # spei-si
//!
//! Standardized drought indices (SPI, SPEI, SSFI, SSMI, SGI) from a single
//! time series.
//!
//! A run moves through three explicit states:
//!
//! ```mermaid
//! graph LR
//!     A["SiConfig"] -->|".prepare(input)"| B["PreparedSi"]
//!     B -->|".fit_distribution()"| C["FittedSi"]
//!     C -->|".si()"| D["standardized index"]
//!     C -->|".cdf() / .pdf() / .ppf(q)"| E["raw series"]
//! ```
//!
//! Preparation validates the series, aggregates it over the timescale,
//! resolves the fitting frequency, regroups it by calendar position and
//! corrects the fit window. Fitting produces one distribution per calendar
//! group (in parallel) or, with the normal-scores transform, none at all.
//! The ready state is immutable; each accessor scatters per-group results
//! back onto the series index.
//!
//! ## Quick Start
//!
//! ```ignore
//! use spei_si::{IndexOptions, spi};
//!
//! let options = IndexOptions::new().with_timescale(3).with_fit_freq("ME");
//! let result = spi(input, &options)?;
//! for (t, v) in result.index().iter() {
//!     println!("{t}: {v:.2}");
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Run configuration |
//! | `prepare` | Validation, aggregation and regrouping |
//! | `fit` | Per-group fitting |
//! | `fitted` | CDF, PDF, quantiles and the standardized index |
//! | `presets` | Named indices with their default families |
//! | `rai` | Rainfall Anomaly Index and modified RAI |
//! | `error` | Error types |

mod config;
mod error;
mod fit;
mod fitted;
mod prepare;
mod presets;
mod rai;

pub use config::SiConfig;
pub use error::{ErrorKind, SiError};
pub use fit::GroupFit;
pub use fitted::FittedSi;
pub use prepare::{MIN_FIT_WINDOW, PreparedSi};
pub use presets::{IndexOptions, IndexResult, sgi, spei, spi, ssfi, ssmi};
pub use rai::{MRAI_SCALING_FACTOR, mrai, rai};

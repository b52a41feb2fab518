//! # spei
//!
//! Standardized drought indices from hydro-climatic time series.
//!
//! This crate is the facade of the workspace: it re-exports the public API
//! of the component crates and adds a TOML run configuration and tracing
//! set-up.
//!
//! ```mermaid
//! graph LR
//!     A["spei-calendar"] --> C["spei-dist"]
//!     B["spei-stats"] --> C
//!     C --> D["spei-si"]
//!     A --> D
//!     D --> E["spei"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use spei::{IndexOptions, SeriesInput, spi};
//!
//! spei::logging::init(1);
//! let input = SeriesInput::Series { index, values };
//! let result = spi(input, &IndexOptions::new().with_timescale(3))?;
//! println!("{} notices", result.diagnostics().len());
//! ```
//!
//! ## Crates
//!
//! | Crate | Description |
//! |-------|-------------|
//! | `spei-calendar` | Series validation, frequency, calendar regrouping |
//! | `spei-stats` | Moments, quantiles, L-moments, Kolmogorov–Smirnov |
//! | `spei-dist` | Distribution families, MLE, zero inflation |
//! | `spei-si` | Standardization run and named indices |

pub mod config;
pub mod logging;

pub use spei_calendar as calendar;
pub use spei_dist as dist;
pub use spei_si as si;
pub use spei_stats as stats;

pub use config::{IndexName, IndexToml, load_config, parse_config, run_index};
pub use spei_calendar::{
    AggFunc, Diagnostics, Frequency, IndexLabel, Notice, NoticeKind, SeriesInput, TimeSeries,
};
pub use spei_dist::{ContinuousFamily, DistError, Family, FitConfig, FitParams, FittedDist};
pub use spei_si::{
    ErrorKind, FittedSi, IndexOptions, IndexResult, PreparedSi, SiConfig, SiError, mrai, rai,
    sgi, spei, spi, ssfi, ssmi,
};

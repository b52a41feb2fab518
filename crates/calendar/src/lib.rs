//! # spei-calendar
//!
//! Time-axis validation and year-agnostic calendar regrouping.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["SeriesInput"] -->|"validate_series()"| B["TimeSeries"]
//!     B -->|"infer_frequency()"| F["Frequency"]
//!     B -->|"group_yearly()"| C["YearlyTable"]
//!     C -->|"ungroup_yearly()"| B
//!     C -->|".partition(freq)"| D["groups by key date"]
//!     C -->|"cyclic_window()"| E["CyclicTable"]
//!     E -->|".windows(width)"| G["Window"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use spei_calendar::{Diagnostics, SeriesInput, validate_series, group_yearly, cyclic_window};
//!
//! let mut diagnostics = Diagnostics::new();
//! let series = validate_series(input, &mut diagnostics)?;
//! let table = group_yearly(&series);
//! let padded = cyclic_window(&table, 15);
//! for window in padded.windows(31).filter(|w| w.is_complete()) {
//!     let sample = window.pooled_values();
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `series` | Timestamp-indexed series, rolling aggregation |
//! | `validate` | Input shape checks and index coercion |
//! | `freq` | Frequency tokens, inference and group keys |
//! | `position` | Year-agnostic calendar position |
//! | `yearly` | Calendar-grouped table and its inverse |
//! | `window` | Cyclic windows across the year boundary |
//! | `notice` | Diagnostics sink |
//! | `error` | Error types |

mod error;
mod freq;
mod notice;
mod position;
mod series;
mod validate;
mod window;
mod yearly;

pub use error::CalendarError;
pub use freq::{Frequency, infer_frequency};
pub use notice::{Diagnostics, Notice, NoticeKind};
pub use position::{CalendarPosition, REFERENCE_YEAR, is_leap_year};
pub use series::{AggFunc, TimeSeries};
pub use validate::{Column, IndexLabel, SeriesInput, parse_label, validate_index, validate_series};
pub use window::{CyclicTable, PaddedRow, Placement, Window, cyclic_window};
pub use yearly::{Observation, YearlyTable, group_yearly, ungroup_yearly};

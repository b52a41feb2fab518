//! Error types for the spei-dist crate.

/// Error type for all fallible operations in the spei-dist crate.
///
/// Fitting failures are never recovered locally: retrying with identical
/// data cannot succeed, so callers abort the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistError {
    /// Returned when the fit sample is smaller than the configured minimum.
    #[error("insufficient data: {n} values, need at least {min}")]
    InsufficientData {
        /// Number of usable values.
        n: usize,
        /// Required minimum.
        min: usize,
    },

    /// Returned when every value of the fit sample is identical.
    #[error("degenerate sample: all values equal {value}")]
    ConstantSample {
        /// The single value of the sample.
        value: f64,
    },

    /// Returned when a value lies outside the support of the family.
    #[error("value {value} is outside the support of {family} ({support})")]
    OutsideSupport {
        /// scipy-style family name.
        family: &'static str,
        /// The offending value.
        value: f64,
        /// Human-readable support description.
        support: &'static str,
    },

    /// Returned when no starting point has a finite likelihood.
    #[error("no feasible starting point for {family} maximum likelihood")]
    NoFeasibleStart {
        /// scipy-style family name.
        family: &'static str,
    },

    /// Returned when the optimizer ends without a finite, feasible optimum.
    #[error("{family} fit did not converge within {iters} iterations")]
    NonConvergence {
        /// scipy-style family name.
        family: &'static str,
        /// Iteration limit that was reached.
        iters: u64,
    },

    /// Returned when the optimizer itself fails.
    ///
    /// `reason` is a `String` because argmin errors are not `Clone`.
    #[error("{family} optimization failed: {reason}")]
    OptimizationFailed {
        /// scipy-style family name.
        family: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a density is requested for a zero-inflated fit.
    #[error("density is undefined for a zero-inflated distribution")]
    ZeroInflatedDensity,

    /// Returned when a quantile is requested for a probability outside [0, 1].
    #[error("probability must be in [0, 1], got {q}")]
    InvalidProbability {
        /// The offending probability.
        q: f64,
    },

    /// Returned when a family name is not recognised.
    #[error("unknown distribution {name:?} (expected one of norm, logistic, gamma, lognorm, fisk, genextreme, pearson3, beta)")]
    UnknownFamily {
        /// The name that was provided.
        name: String,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl DistError {
    /// Returns `true` for errors caused by configuration or by requesting an
    /// unsupported operation, as opposed to numerical failures of the fit.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ZeroInflatedDensity
                | Self::InvalidProbability { .. }
                | Self::UnknownFamily { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

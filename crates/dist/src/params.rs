//! Fitted parameter vector in scipy's `(*shape, loc, scale)` convention.

use std::fmt;

/// Parameters of a fitted continuous distribution.
///
/// `shape` is `None` for location-scale families (normal, logistic).
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    shape: Option<Vec<f64>>,
    loc: f64,
    scale: f64,
}

impl FitParams {
    /// Creates a parameter set.
    pub fn new(shape: Option<Vec<f64>>, loc: f64, scale: f64) -> Self {
        Self { shape, loc, scale }
    }

    /// Parameters of a location-scale family.
    pub fn loc_scale(loc: f64, scale: f64) -> Self {
        Self::new(None, loc, scale)
    }

    /// Shape parameters, if the family has any.
    pub fn shape(&self) -> Option<&[f64]> {
        self.shape.as_deref()
    }

    /// `i`-th shape parameter, or NaN when absent.
    pub fn shape_at(&self, i: usize) -> f64 {
        self.shape
            .as_ref()
            .and_then(|s| s.get(i).copied())
            .unwrap_or(f64::NAN)
    }

    /// Location parameter.
    pub fn loc(&self) -> f64 {
        self.loc
    }

    /// Scale parameter.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `(x - loc) / scale`.
    pub fn standardize(&self, x: f64) -> f64 {
        (x - self.loc) / self.scale
    }

    /// Returns `true` when every parameter is finite and the scale positive.
    pub fn is_valid(&self) -> bool {
        self.loc.is_finite()
            && self.scale.is_finite()
            && self.scale > 0.0
            && self
                .shape
                .as_ref()
                .is_none_or(|s| s.iter().all(|v| v.is_finite()))
    }
}

impl fmt::Display for FitParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(shape) = &self.shape {
            for s in shape {
                write!(f, "{s:.6}, ")?;
            }
        }
        write!(f, "loc={:.6}, scale={:.6}", self.loc, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let p = FitParams::new(Some(vec![2.0]), 1.0, 3.0);
        assert_eq!(p.shape(), Some(&[2.0][..]));
        assert_eq!(p.shape_at(0), 2.0);
        assert!(p.shape_at(1).is_nan());
        assert_eq!(p.standardize(7.0), 2.0);
        assert!(p.is_valid());
    }

    #[test]
    fn loc_scale_has_no_shape() {
        let p = FitParams::loc_scale(0.0, 1.0);
        assert!(p.shape().is_none());
        assert!(p.shape_at(0).is_nan());
    }

    #[test]
    fn invalid_scale() {
        assert!(!FitParams::loc_scale(0.0, 0.0).is_valid());
        assert!(!FitParams::new(Some(vec![f64::NAN]), 0.0, 1.0).is_valid());
    }

    #[test]
    fn display() {
        let p = FitParams::new(Some(vec![2.0]), 0.0, 1.5);
        assert_eq!(p.to_string(), "2.000000, loc=0.000000, scale=1.500000");
    }
}

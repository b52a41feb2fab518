//! Sample L-moments and probability-weighted moments.
//!
//! Used to seed the GEV (Hosking, 1985) and log-logistic (Vicente-Serrano
//! et al., 2010) maximum-likelihood fits.

/// First two sample L-moments and the L-skewness ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMoments {
    /// λ1, the mean.
    pub l1: f64,
    /// λ2, half the mean absolute difference.
    pub l2: f64,
    /// τ3 = λ3 / λ2.
    pub t3: f64,
}

/// Unbiased sample L-moments of a sorted sample.
///
/// Returns `None` for fewer than three values or a zero λ2.
pub fn l_moments(sorted: &[f64]) -> Option<LMoments> {
    let n = sorted.len();
    if n < 3 {
        return None;
    }
    let nf = n as f64;
    let (mut b0, mut b1, mut b2) = (0.0, 0.0, 0.0);
    for (i, &x) in sorted.iter().enumerate() {
        let fi = i as f64;
        b0 += x;
        b1 += x * fi / (nf - 1.0);
        b2 += x * fi * (fi - 1.0) / ((nf - 1.0) * (nf - 2.0));
    }
    b0 /= nf;
    b1 /= nf;
    b2 /= nf;

    let l2 = 2.0 * b1 - b0;
    if l2 == 0.0 || !l2.is_finite() {
        return None;
    }
    let l3 = 6.0 * b2 - 6.0 * b1 + b0;
    Some(LMoments {
        l1: b0,
        l2,
        t3: l3 / l2,
    })
}

/// Probability-weighted moment `w_s = 1/N Σ (1 - F_i)^s x_(i)` with
/// plotting position `F_i = (i - 0.35) / N`.
pub fn pwm_exceedance(sorted: &[f64], s: i32) -> f64 {
    let nf = sorted.len() as f64;
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = (i as f64 + 1.0 - 0.35) / nf;
            (1.0 - f).powi(s) * x
        })
        .sum::<f64>()
        / nf
}

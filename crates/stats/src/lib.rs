//! Sample statistics for standardized index fitting.
//!
//! Moments and quantiles live at the crate root; L-moments and
//! probability-weighted moments in [`lmoments`]; the Kolmogorov–Smirnov
//! statistic and its p-value in [`ks`].

pub mod ks;
pub mod lmoments;

pub use ks::{kolmogorov_cdf, ks_pvalue, ks_statistic};
pub use lmoments::{LMoments, l_moments, pwm_exceedance};

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator (matching R's `var()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator (matching R's `sd()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Biased sample skewness `m3 / m2^1.5` (population central moments).
///
/// Returns 0.0 for fewer than 3 elements or constant data.
pub fn skewness(data: &[f64]) -> f64 {
    if data.len() < 3 {
        return 0.0;
    }
    let nf = data.len() as f64;
    let m = mean(data);
    let m2 = data.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / nf;
    let m3 = data.iter().map(|&x| (x - m).powi(3)).sum::<f64>() / nf;
    if m2 <= 0.0 {
        return 0.0;
    }
    m3 / m2.powf(1.5)
}

/// R's default quantile algorithm (type=7).
///
/// **Expects pre-sorted input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Returns the finite values of `data` in ascending order.
pub fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Normal-scores plotting positions `(2i - 1) / (2n)` for `i = 1..=n`.
///
/// Strictly increasing, symmetric around 0.5 and never 0 or 1.
pub fn plotting_positions(n: usize) -> Vec<f64> {
    let denom = 2.0 * n as f64;
    (1..=n).map(|i| (2.0 * i as f64 - 1.0) / denom).collect()
}

/// Number of distinct values in a sorted slice.
pub fn n_distinct(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[0] != w[1]).count()
}

//! One-sample Kolmogorov–Smirnov statistic and p-value.
//!
//! The distribution of the statistic is evaluated exactly with the
//! Marsaglia–Tsang–Wang (2003) matrix-power algorithm for `n <= 1000`, and
//! with the asymptotic Kolmogorov series (Stephens' small-sample correction,
//! as in Numerical Recipes) beyond that.

use ndarray::Array2;

const EXACT_MAX_N: usize = 1000;
const SCALE: f64 = 1e140;
const SCALE_EXP: i32 = 140;

/// Two-sided statistic `D = sup |F_n(x) - F(x)|` for a sorted sample.
///
/// Returns 0.0 for an empty sample.
pub fn ks_statistic(sorted: &[f64], cdf: impl Fn(f64) -> f64) -> f64 {
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let d_plus = (i as f64 + 1.0) / n - f;
            let d_minus = f - i as f64 / n;
            d_plus.max(d_minus)
        })
        .fold(0.0, f64::max)
}

/// `P(D_n < d)` for the two-sided one-sample statistic.
pub fn kolmogorov_cdf(n: usize, d: f64) -> f64 {
    if n == 0 || d <= 0.0 || d.is_nan() {
        return 0.0;
    }
    if d >= 1.0 {
        return 1.0;
    }
    let cdf = if n > EXACT_MAX_N {
        let sqrt_n = (n as f64).sqrt();
        1.0 - kolmogorov_q((sqrt_n + 0.12 + 0.11 / sqrt_n) * d)
    } else {
        marsaglia_tsang_wang(n, d)
    };
    cdf.clamp(0.0, 1.0)
}

/// Two-sided p-value `P(D_n >= d)`.
pub fn ks_pvalue(n: usize, d: f64) -> f64 {
    (1.0 - kolmogorov_cdf(n, d)).clamp(0.0, 1.0)
}

/// Kolmogorov survival series `Q(λ) = 2 Σ (-1)^(j-1) exp(-2 j² λ²)`.
fn kolmogorov_q(lambda: f64) -> f64 {
    if lambda < 1.18 {
        // Alternating series converges slowly here; use the theta-function form.
        if lambda <= 0.0 {
            return 1.0;
        }
        let y = (-std::f64::consts::PI.powi(2) / (8.0 * lambda * lambda)).exp();
        let k = (2.0 * std::f64::consts::PI).sqrt() / lambda
            * (y + y.powi(9) + y.powi(25) + y.powi(49));
        return (1.0 - k).clamp(0.0, 1.0);
    }
    let a2 = -2.0 * lambda * lambda;
    let mut sum = 0.0;
    let mut sign = 1.0;
    for j in 1..=100 {
        let jf = f64::from(j);
        let term = sign * (a2 * jf * jf).exp();
        sum += term;
        if term.abs() <= 1e-12 * sum.abs() {
            break;
        }
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

fn marsaglia_tsang_wang(n: usize, d: f64) -> f64 {
    let nf = n as f64;
    let s = d * d * nf;
    if s > 7.24 || (s > 3.76 && n > 99) {
        return 1.0 - 2.0 * (-(2.000071 + 0.331 / nf.sqrt() + 1.409 / nf) * s).exp();
    }

    let k = (nf * d) as usize + 1;
    let m = 2 * k - 1;
    let h = k as f64 - nf * d;

    let mut hm = Array2::<f64>::from_shape_fn((m, m), |(i, j)| if i + 1 >= j { 1.0 } else { 0.0 });
    for i in 0..m {
        hm[[i, 0]] -= h.powi(i as i32 + 1);
        hm[[m - 1, i]] -= h.powi((m - i) as i32);
    }
    if 2.0 * h - 1.0 > 0.0 {
        hm[[m - 1, 0]] += (2.0 * h - 1.0).powi(m as i32);
    }
    for i in 0..m {
        for j in 0..m {
            if i + 1 > j {
                for g in 1..=(i + 1 - j) {
                    hm[[i, j]] /= g as f64;
                }
            }
        }
    }

    let (q, mut exponent) = matrix_power(&hm, n);
    let mut s = q[[k - 1, k - 1]];
    for i in 1..=n {
        s = s * i as f64 / nf;
        if s < 1.0 / SCALE {
            s *= SCALE;
            exponent -= SCALE_EXP;
        }
    }
    s * 10f64.powi(exponent)
}

/// `A^n` as `(mantissa matrix, decimal exponent)`, rescaling to avoid overflow.
fn matrix_power(a: &Array2<f64>, n: usize) -> (Array2<f64>, i32) {
    if n == 1 {
        return (a.clone(), 0);
    }
    let (v, ev) = matrix_power(a, n / 2);
    let b = v.dot(&v);
    let (mut v, mut ev) = if n % 2 == 0 {
        (b, 2 * ev)
    } else {
        (a.dot(&b), 2 * ev)
    };
    let mid = a.nrows() / 2;
    if v[[mid, mid]] > SCALE {
        v.mapv_inplace(|x| x / SCALE);
        ev += SCALE_EXP;
    }
    (v, ev)
}

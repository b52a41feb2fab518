//! Rainfall Anomaly Index and its modified variant.
//!
//! Neither index fits a distribution: both rescale deviations from the mean
//! by the mean of the most extreme values.

use spei_calendar::{Diagnostics, Frequency, SeriesInput, TimeSeries, group_yearly, validate_series};

use crate::error::SiError;

/// Number of extremes averaged by [`rai`].
const N_EXTREMES: usize = 10;

/// Default scaling factor of [`mrai`].
pub const MRAI_SCALING_FACTOR: f64 = 1.7;

/// Rainfall Anomaly Index (van Rooy, 1965).
///
/// With `pm` the series mean, values above `pm` map to
/// `3 (x - pm) / (E - pm)` where `E` is the mean of the ten largest values,
/// all others to `-3 (x - pm) / (e - pm)` with `e` the mean of the ten
/// smallest. Missing values stay missing.
///
/// # Errors
///
/// Any validation error of the input series.
pub fn rai(input: SeriesInput, diagnostics: &mut Diagnostics) -> Result<TimeSeries, SiError> {
    let series = validate_series(input, diagnostics)?;
    let sorted = spei_stats::sorted_finite(series.values());
    if sorted.is_empty() {
        return Ok(series.nan_like());
    }
    let pm = spei_stats::mean(&sorted);
    let n = sorted.len().min(N_EXTREMES);
    let lowest = spei_stats::mean(&sorted[..n]);
    let highest = spei_stats::mean(&sorted[sorted.len() - n..]);

    Ok(series.map_values(|x| {
        if x > pm {
            3.0 * (x - pm) / (highest - pm)
        } else {
            -3.0 * (x - pm) / (lowest - pm)
        }
    }))
}

/// Modified Rainfall Anomaly Index (Hänsel et al., 2015).
///
/// Computed per calendar month across all years: `pm` is the group mean,
/// `e_above` the mean of values above the group's 90th percentile and
/// `e_below` the mean of values below its 10th percentile. Values above
/// `pm` map to `sf (x - pm) / (e_above - pm)`, all others to
/// `-sf (x - pm) / (e_below - pm)`. Missing values stay missing, as does
/// every value of a month without finite values.
///
/// # Errors
///
/// Any validation error of the input series.
pub fn mrai(
    input: SeriesInput,
    sf: f64,
    diagnostics: &mut Diagnostics,
) -> Result<TimeSeries, SiError> {
    let series = validate_series(input, diagnostics)?;
    let mut out = series.nan_like();

    for group in group_yearly(&series).partition(Frequency::Monthly).into_values() {
        let values: Vec<f64> = group.iter().map(|o| o.value).collect();
        let sorted = spei_stats::sorted_finite(&values);
        if sorted.is_empty() {
            continue;
        }
        let pm = spei_stats::mean(&sorted);
        let q90 = spei_stats::quantile_type7(&sorted, 0.9);
        let q10 = spei_stats::quantile_type7(&sorted, 0.1);
        let e_above = mean_where(&sorted, |x| x > q90);
        let e_below = mean_where(&sorted, |x| x < q10);

        for o in &group {
            let v = if o.value > pm {
                sf * (o.value - pm) / (e_above - pm)
            } else {
                -sf * (o.value - pm) / (e_below - pm)
            };
            out.set(o.timestamp, v);
        }
    }
    Ok(out)
}

/// Mean of the values accepted by `keep`; NaN if none are.
fn mean_where(values: &[f64], keep: impl Fn(f64) -> bool) -> f64 {
    let kept: Vec<f64> = values.iter().copied().filter(|&x| keep(x)).collect();
    if kept.is_empty() {
        f64::NAN
    } else {
        spei_stats::mean(&kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use spei_calendar::IndexLabel;

    fn monthly(values: Vec<f64>) -> SeriesInput {
        let index = (0..values.len() as i32)
            .map(|k| {
                IndexLabel::from(NaiveDate::from_ymd_opt(2000 + k / 12, (k % 12) as u32 + 1, 1).unwrap())
            })
            .collect();
        SeriesInput::Series { index, values }
    }

    #[test]
    fn rai_extremes_map_to_three() {
        // 20 values 1..=20: mean 10.5, top ten mean 15.5, bottom ten mean 5.5
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        let out = rai(monthly(values), &mut Diagnostics::new()).unwrap();
        let v = out.values();
        assert_relative_eq!(v[19], 3.0 * 9.5 / 5.0, epsilon = 1e-12);
        assert_relative_eq!(v[0], -3.0 * -9.5 / -5.0, epsilon = 1e-12);
        assert!(v[10] > 0.0);
        assert!(v[9] < 0.0);
    }

    #[test]
    fn rai_keeps_missing() {
        let mut values: Vec<f64> = (1..=24).map(f64::from).collect();
        values[3] = f64::NAN;
        let out = rai(monthly(values), &mut Diagnostics::new()).unwrap();
        assert!(out.values()[3].is_nan());
        assert_eq!(out.count_valid(), 23);
    }

    #[test]
    fn mrai_groups_by_calendar_month() {
        // January always 10 + year, other months constant offset
        let values: Vec<f64> = (0..120)
            .map(|k| if k % 12 == 0 { 10.0 + f64::from(k / 12) } else { f64::from(k % 12) + f64::from(k / 12) })
            .collect();
        let out = mrai(monthly(values), MRAI_SCALING_FACTOR, &mut Diagnostics::new()).unwrap();
        let january: Vec<f64> = out.values().iter().step_by(12).copied().collect();
        // January 10..=19: mean 14.5, q90 = 18.1 → e_above = 19, q10 = 10.9 → e_below = 10
        assert_relative_eq!(january[9], 1.7, epsilon = 1e-12);
        assert_relative_eq!(january[0], -1.7, epsilon = 1e-12);
        assert!(january.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn mrai_month_without_finite_values_is_missing() {
        let mut values: Vec<f64> = (0..24).map(|k| f64::from(k % 12) + f64::from(k / 12)).collect();
        values[0] = f64::INFINITY;
        values[12] = f64::INFINITY;
        let out = mrai(monthly(values), MRAI_SCALING_FACTOR, &mut Diagnostics::new()).unwrap();
        assert!(out.values()[0].is_nan());
        assert!(out.values()[12].is_nan());
        assert!(out.values()[1..12].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn rai_without_finite_values_is_missing() {
        let out = rai(monthly(vec![f64::NAN; 12]), &mut Diagnostics::new()).unwrap();
        assert_eq!(out.count_valid(), 0);
    }

    #[test]
    fn mrai_rejects_unlabeled_input() {
        let err = mrai(SeriesInput::Values(vec![1.0]), 1.7, &mut Diagnostics::new()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Type);
    }
}

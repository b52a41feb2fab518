use chrono::{Datelike, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Distribution, Gamma, Normal, Uniform};
use spei_calendar::{Frequency, IndexLabel, NoticeKind, SeriesInput};
use spei_dist::Family;
use spei_si::{ErrorKind, IndexOptions, SiConfig, SiError, sgi, spei, spi, ssfi, ssmi};

fn daily_dates(first_year: i32, last_year: i32) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(first_year, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(last_year, 12, 31).unwrap();
    start.iter_days().take_while(|d| *d <= end).collect()
}

fn monthly_dates(first_year: i32, n_years: i32) -> Vec<NaiveDate> {
    (0..n_years * 12)
        .map(|k| NaiveDate::from_ymd_opt(first_year + k / 12, (k % 12) as u32 + 1, 1).unwrap())
        .collect()
}

fn input(dates: &[NaiveDate], values: Vec<f64>) -> SeriesInput {
    SeriesInput::Series {
        index: dates.iter().copied().map(IndexLabel::from).collect(),
        values,
    }
}

/// Seasonal daily precipitation with dry days.
fn daily_precipitation(dates: &[NaiveDate], seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let amount = Gamma::new(0.7, 8.0).unwrap();
    dates
        .iter()
        .map(|d| {
            let season = (2.0 * std::f64::consts::PI * f64::from(d.ordinal()) / 365.25).sin();
            let wet = Bernoulli::new(0.35 + 0.15 * season).unwrap();
            if wet.sample(&mut rng) {
                amount.sample(&mut rng)
            } else {
                0.0
            }
        })
        .collect()
}

/// Smooth seasonal signal with Gaussian noise.
fn daily_temperature(dates: &[NaiveDate], seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 2.0).unwrap();
    dates
        .iter()
        .map(|d| {
            let season = (2.0 * std::f64::consts::PI * f64::from(d.ordinal()) / 365.25).cos();
            10.0 - 8.0 * season + noise.sample(&mut rng)
        })
        .collect()
}

/// Precipitation minus potential evaporation: right-skewed, often negative.
fn water_balance(n: usize, scale: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let precipitation = Gamma::new(2.0, 40.0 * scale).unwrap();
    let evaporation = Normal::new(60.0 * scale, 15.0 * scale).unwrap();
    (0..n)
        .map(|_| precipitation.sample(&mut rng) - evaporation.sample(&mut rng))
        .collect()
}

#[test]
fn spei_defaults_on_monthly_water_balance() {
    let dates = monthly_dates(1990, 30);
    for seed in 0..8 {
        let values = water_balance(dates.len(), 1.0, seed);
        let result = spei(input(&dates, values), &IndexOptions::new().with_timescale(3))
            .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
        assert_eq!(result.fitted().config().dist(), Family::LogLogistic);
        assert_eq!(result.fitted().dists().len(), 12);
        let index = result.index();
        assert_eq!(index.len(), dates.len() - 2);
        assert!(index.values().iter().all(|v| v.is_finite()), "seed {seed}");
    }
}

#[test]
fn spei_symmetric_input_fits() {
    let dates = monthly_dates(1980, 30);
    let mut rng = StdRng::seed_from_u64(21);
    let noise = Normal::new(10.0, 30.0).unwrap();
    let values: Vec<f64> = (0..dates.len()).map(|_| noise.sample(&mut rng)).collect();
    let result = spei(input(&dates, values), &IndexOptions::new()).unwrap();
    assert_eq!(result.index().count_valid(), dates.len());
}

#[test]
fn weekly_window_fit() {
    let start = NaiveDate::from_ymd_opt(2001, 1, 7).unwrap();
    let dates: Vec<NaiveDate> = (0..1040)
        .map(|k| start + chrono::Duration::weeks(k))
        .collect();
    let values = water_balance(dates.len(), 0.25, 7);
    let result = spei(input(&dates, values), &IndexOptions::new().with_fit_window(3)).unwrap();

    let fitted = result.fitted();
    assert_eq!(fitted.fit_frequency(), Frequency::Weekly);
    assert_eq!(fitted.fit_window(), 3);
    // every calendar day occurs, 2004-02-29 included
    assert_eq!(fitted.dists().len(), 366);
    assert_eq!(result.index().count_valid(), 1040);
    assert!(result.index().values().iter().all(|v| v.is_finite()));
}

#[test]
fn spi_thirty_years_daily() {
    let dates = daily_dates(1990, 2019);
    let values = daily_precipitation(&dates, 2024);
    let options = IndexOptions::new()
        .with_timescale(30)
        .with_fit_freq("ME")
        .with_prob_zero(true);
    let result = spi(input(&dates, values), &options).unwrap();

    let index = result.index();
    assert_eq!(index.len(), dates.len() - 29);
    assert_eq!(result.fitted().dists().len(), 12);

    let valid: Vec<f64> = index.values().iter().copied().filter(|v| !v.is_nan()).collect();
    assert!(!valid.is_empty());
    assert!(valid.iter().all(|v| v.is_finite()));
    let within = valid.iter().filter(|v| v.abs() <= 3.5).count();
    assert!(within as f64 >= 0.95 * valid.len() as f64, "{within} of {}", valid.len());
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    assert!(mean.abs() < 0.1, "mean = {mean}");
}

#[test]
fn fit_window_parity_is_corrected() {
    let dates = daily_dates(2001, 2003);
    for (requested, effective) in [(2, 3), (4, 5)] {
        let options = IndexOptions::new()
            .with_dist(Family::Normal)
            .with_fit_freq("D")
            .with_fit_window(requested);
        let result = spei(input(&dates, daily_temperature(&dates, 3)), &options).unwrap();
        assert_eq!(result.fitted().fit_window(), effective);
        assert!(result.diagnostics().contains(NoticeKind::FitWindowAdjusted));
        assert_eq!(result.fitted().dists().len(), 365);
    }
}

#[test]
fn monthly_frequency_with_window_is_rejected() {
    let dates = daily_dates(2001, 2003);
    let options = IndexOptions::new()
        .with_dist(Family::Normal)
        .with_fit_freq("M")
        .with_fit_window(5);
    let err = spei(input(&dates, daily_temperature(&dates, 5)), &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("'M'"), "{err}");
}

#[test]
fn normal_scores_are_monotonic_within_month() {
    let dates = monthly_dates(1980, 25);
    let mut rng = StdRng::seed_from_u64(17);
    let noise = Normal::new(0.0, 0.5).unwrap();
    let values: Vec<f64> = (0..dates.len())
        .map(|i| 5.0 + (i as f64 / 40.0).sin() + noise.sample(&mut rng))
        .collect();
    let result = sgi(input(&dates, values.clone()), &IndexOptions::new()).unwrap();
    let cdf = result.fitted().cdf();
    assert!(result.fitted().dists().is_empty());

    for month in 0..12 {
        let mut pairs: Vec<(f64, f64)> = (month..values.len())
            .step_by(12)
            .map(|i| (values[i], cdf.values()[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert!(pairs.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!((pairs[0].1 - 1.0 / 50.0).abs() < 1e-12);
    }
}

#[test]
fn zero_observations_map_to_p0() {
    let dates = monthly_dates(1970, 40);
    let mut rng = StdRng::seed_from_u64(8);
    let amount = Gamma::new(2.0, 20.0).unwrap();
    let values: Vec<f64> = (0..dates.len())
        .map(|i| if i % 7 == 0 { 0.0 } else { amount.sample(&mut rng) })
        .collect();
    let result = spi(input(&dates, values.clone()), &IndexOptions::new()).unwrap();
    let fitted = result.fitted();
    let cdf = fitted.cdf();
    for (i, (t, p)) in cdf.iter().enumerate() {
        assert!((0.0..=1.0).contains(&p));
        if values[i] == 0.0 {
            assert_eq!(p, fitted.get_dist(t).unwrap().p0().unwrap());
        }
    }
}

#[test]
fn standardization_symmetry_for_normal_family() {
    let dates = monthly_dates(1960, 50);
    let mut rng = StdRng::seed_from_u64(99);
    let noise = Normal::new(100.0, 15.0).unwrap();
    let values: Vec<f64> = (0..dates.len()).map(|_| noise.sample(&mut rng)).collect();
    let fitted = SiConfig::new(Family::Normal)
        .prepare(input(&dates, values))
        .unwrap()
        .fit_distribution()
        .unwrap();
    for (t, x) in fitted.series().iter() {
        let dist = fitted.get_dist(t).unwrap();
        let back = dist.ppf(dist.cdf_at(x)).unwrap();
        assert!((back - x).abs() < 1e-6, "{x} -> {back}");
    }
}

#[test]
fn ssmi_fits_beta_to_soil_moisture() {
    let dates = monthly_dates(1990, 30);
    let mut rng = StdRng::seed_from_u64(4);
    let u = Uniform::new(0.0, 1.0).unwrap();
    let values: Vec<f64> = (0..dates.len())
        .map(|i| {
            let season = 0.1 * (i as f64 * std::f64::consts::PI / 6.0).sin();
            (0.3 + season + 0.2 * u.sample(&mut rng)).clamp(0.01, 0.99)
        })
        .collect();
    let result = ssmi(input(&dates, values), &IndexOptions::new()).unwrap();
    assert_eq!(result.fitted().dists().len(), 12);
    assert!(result.index().values().iter().all(|v| v.is_finite()));
}

#[test]
fn ssfi_fits_gev_to_streamflow() {
    let dates = monthly_dates(1985, 30);
    let mut rng = StdRng::seed_from_u64(12);
    let u = Uniform::new(0.0, 1.0).unwrap();
    let c = -0.1;
    let values: Vec<f64> = (0..dates.len())
        .map(|_| {
            let p: f64 = u.sample(&mut rng);
            50.0 + 10.0 * (1.0 - (-p.ln()).powf(c)) / c
        })
        .collect();
    let result = ssfi(input(&dates, values), &IndexOptions::new()).unwrap();
    assert_eq!(result.fitted().dists().len(), 12);
    let si = result.index();
    assert!(si.values().iter().all(|v| v.is_finite() && v.abs() < 5.0));
}

#[test]
fn unlabeled_input_is_type_error() {
    let err = spi(SeriesInput::Values(vec![1.0, 2.0]), &IndexOptions::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
}

#[test]
fn constant_group_aborts_with_numerical_error() {
    let dates = monthly_dates(2000, 10);
    let err = spei(
        input(&dates, vec![4.0; dates.len()]),
        &IndexOptions::new().with_dist(Family::Normal),
    )
    .unwrap_err();
    assert!(matches!(err, SiError::GroupFit { .. }));
    assert_eq!(err.kind(), ErrorKind::Numerical);
}

use approx::assert_relative_eq;
use capm::prelude::*;
use chrono::NaiveDate;

fn prices(symbol: &str, closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::days(i as i64);
            PricePoint::new(date, close)
        })
        .collect();
    PriceSeries::new(symbol.to_string(), points).unwrap()
}

#[test]
fn worked_example_produces_expected_aligned_returns() {
    let stock = prices("MSFT", &[100.0, 102.0, 101.0, 105.0]);
    let market = prices("SPY", &[100.0, 101.0, 100.5, 103.0]);

    let aligned = align(&daily_returns(&stock), &daily_returns(&market));

    assert_eq!(aligned.len(), 3);
    assert_relative_eq!(aligned.asset[0], 0.02, epsilon = 1e-12);
    assert_relative_eq!(aligned.asset[1], 101.0 / 102.0 - 1.0, epsilon = 1e-12);
    assert_relative_eq!(aligned.asset[2], 105.0 / 101.0 - 1.0, epsilon = 1e-12);
    assert_relative_eq!(aligned.market[0], 0.01, epsilon = 1e-12);
    assert_relative_eq!(aligned.market[1], 100.5 / 101.0 - 1.0, epsilon = 1e-12);
    assert_relative_eq!(aligned.market[2], 103.0 / 100.5 - 1.0, epsilon = 1e-12);
}

#[test]
fn worked_example_statistics_and_fit_are_consistent() {
    let stock = prices("MSFT", &[100.0, 102.0, 101.0, 105.0]);
    let market = prices("SPY", &[100.0, 101.0, 100.5, 103.0]);

    let aligned = align(&daily_returns(&stock), &daily_returns(&market));
    let stats = DescriptiveStats::from_aligned(&aligned);
    let fit = fit_capm(&aligned).unwrap();

    let expected_mean = aligned.asset.iter().sum::<f64>() / aligned.len() as f64;
    assert_relative_eq!(stats.asset.mean.unwrap(), expected_mean, epsilon = 1e-15);

    //single-regressor identities: r2 = corr^2 and beta = corr * sd_y / sd_x
    let corr = stats.correlation.unwrap();
    let sd_ratio = stats.asset.std_dev.unwrap() / stats.market.std_dev.unwrap();
    assert_relative_eq!(fit.r_squared.unwrap(), corr * corr, epsilon = 1e-12);
    assert_relative_eq!(fit.beta, corr * sd_ratio, epsilon = 1e-12);
    assert_relative_eq!(
        fit.alpha,
        stats.asset.mean.unwrap() - fit.beta * stats.market.mean.unwrap(),
        epsilon = 1e-15
    );
    assert_eq!(fit.nobs, 3);
}

#[test]
fn pipeline_is_bit_reproducible() {
    let stock = prices("MSFT", &[100.0, 102.0, 101.0, 105.0]);
    let market = prices("SPY", &[100.0, 101.0, 100.5, 103.0]);

    let run = || {
        let aligned = align(&daily_returns(&stock), &daily_returns(&market));
        let stats = DescriptiveStats::from_aligned(&aligned);
        let fit = fit_capm(&aligned).unwrap();
        (stats, fit)
    };

    let (stats_a, fit_a) = run();
    let (stats_b, fit_b) = run();

    assert_eq!(
        stats_a.asset.mean.unwrap().to_bits(),
        stats_b.asset.mean.unwrap().to_bits()
    );
    assert_eq!(
        stats_a.correlation.unwrap().to_bits(),
        stats_b.correlation.unwrap().to_bits()
    );
    assert_eq!(fit_a.alpha.to_bits(), fit_b.alpha.to_bits());
    assert_eq!(fit_a.beta.to_bits(), fit_b.beta.to_bits());
    assert_eq!(
        fit_a.r_squared.unwrap().to_bits(),
        fit_b.r_squared.unwrap().to_bits()
    );
}

#[test]
fn misaligned_calendars_intersect_before_statistics() {
    //market is missing the third trading day
    let stock = prices("MSFT", &[100.0, 102.0, 101.0, 105.0, 104.0]);
    let market_points = vec![
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 100.0),
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 101.0),
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 103.0),
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(), 102.0),
    ];
    let market = PriceSeries::new("SPY".to_string(), market_points).unwrap();

    let aligned = align(&daily_returns(&stock), &daily_returns(&market));

    //jan 3, 5 and 6 have returns on both sides
    assert_eq!(aligned.len(), 3);
    assert!(aligned.len() <= daily_returns(&stock).len().min(daily_returns(&market).len()));
}

#[test]
fn empty_intersection_reports_no_observations() {
    let stock = prices("MSFT", &[100.0, 102.0]);
    let market_points = vec![
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), 100.0),
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(), 101.0),
    ];
    let market = PriceSeries::new("SPY".to_string(), market_points).unwrap();

    let aligned = align(&daily_returns(&stock), &daily_returns(&market));
    assert!(aligned.is_empty());

    let result = fit_capm(&aligned);
    assert!(matches!(result, Err(RegressionError::TooFewObservations(0))));
}

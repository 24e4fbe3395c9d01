use crate::analysis::returns::{AlignedReturns, MIN_REGRESSION_OBS};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("Need at least 3 aligned observations for the CAPM fit, got {0}")]
    TooFewObservations(usize),
    #[error("Market returns have zero variance over the sample, beta is undefined")]
    DegenerateMarket,
}

//closed-form OLS fit of asset = alpha + beta * market + error
//r-squared is None when the response has zero variance, a p-value is
//None when its standard error vanishes (exact fit)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapmResult {
    pub alpha: f64,
    pub beta: f64,
    pub r_squared: Option<f64>,
    pub adj_r_squared: Option<f64>,
    pub nobs: usize,
    pub p_alpha: Option<f64>,
    pub p_beta: Option<f64>,
}

//fits the CAPM regression with the market column as explanatory variable
pub fn fit_capm(aligned: &AlignedReturns) -> Result<CapmResult, RegressionError> {
    let n = aligned.len();
    if n < MIN_REGRESSION_OBS {
        return Err(RegressionError::TooFewObservations(n));
    }

    let x = &aligned.market[..];
    let y = &aligned.asset[..];
    let nf = n as f64;
    let x_mean = x.mean();
    let y_mean = y.mean();

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 {
        return Err(RegressionError::DegenerateMarket);
    }

    let beta = sxy / sxx;
    let alpha = y_mean - beta * x_mean;

    //residual sum of squares, clamped against rounding below zero
    let sse = (syy - beta * sxy).max(0.0);
    let dof = nf - 2.0;

    let (r_squared, adj_r_squared) = if syy > 0.0 {
        let r2 = 1.0 - sse / syy;
        let adj = 1.0 - (1.0 - r2) * (nf - 1.0) / dof;
        (Some(r2), Some(adj))
    } else {
        (None, None)
    };

    let s2 = sse / dof;
    let se_beta = (s2 / sxx).sqrt();
    let se_alpha = (s2 * (1.0 / nf + x_mean * x_mean / sxx)).sqrt();

    Ok(CapmResult {
        alpha,
        beta,
        r_squared,
        adj_r_squared,
        nobs: n,
        p_alpha: two_sided_p_value(alpha, se_alpha, dof),
        p_beta: two_sided_p_value(beta, se_beta, dof),
    })
}

//two-sided p-value for coefficient = 0 under a t distribution with dof degrees of freedom
fn two_sided_p_value(coef: f64, se: f64, dof: f64) -> Option<f64> {
    if se == 0.0 {
        return None;
    }

    let t = coef / se;
    let dist = StudentsT::new(0.0, 1.0, dof).ok()?;
    Some(2.0 * dist.cdf(-t.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::descriptive::correlation;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn aligned(asset: Vec<f64>, market: Vec<f64>) -> AlignedReturns {
        let dates = (0..asset.len() as i64)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(d))
            .collect();
        AlignedReturns {
            asset_symbol: "A".to_string(),
            market_symbol: "M".to_string(),
            dates,
            asset,
            market,
        }
    }

    //y = 2 + 0.5x with alternating noise that averages out
    fn noisy_fixture() -> AlignedReturns {
        let market: Vec<f64> = (0..40).map(|i| i as f64 / 10.0).collect();
        let asset: Vec<f64> = market
            .iter()
            .enumerate()
            .map(|(i, x)| 2.0 + 0.5 * x + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();
        aligned(asset, market)
    }

    #[test]
    fn exact_line_is_recovered_with_unit_r_squared() {
        //binary-exact inputs so the residuals cancel exactly
        let market = vec![0.25, 0.5, 0.75, 1.0];
        let asset: Vec<f64> = market.iter().map(|x| 2.0 + 0.5 * x).collect();

        let fit = fit_capm(&aligned(asset, market)).unwrap();

        assert_relative_eq!(fit.alpha, 2.0, epsilon = 1e-15);
        assert_relative_eq!(fit.beta, 0.5, epsilon = 1e-15);
        assert_relative_eq!(fit.r_squared.unwrap(), 1.0, epsilon = 1e-15);
        //zero residual variance leaves the p-values undefined
        assert_eq!(fit.p_alpha, None);
        assert_eq!(fit.p_beta, None);
    }

    #[test]
    fn noisy_line_recovers_coefficients() {
        let fit = fit_capm(&noisy_fixture()).unwrap();

        assert_relative_eq!(fit.alpha, 2.0, epsilon = 1e-2);
        assert_relative_eq!(fit.beta, 0.5, epsilon = 1e-2);
        assert_eq!(fit.nobs, 40);

        //both coefficients are overwhelmingly significant here
        assert!(fit.p_alpha.unwrap() < 1e-6);
        assert!(fit.p_beta.unwrap() < 1e-6);
    }

    #[test]
    fn r_squared_equals_squared_correlation() {
        let data = noisy_fixture();
        let fit = fit_capm(&data).unwrap();
        let corr = correlation(&data.asset, &data.market).unwrap();

        assert_relative_eq!(fit.r_squared.unwrap(), corr * corr, epsilon = 1e-12);
    }

    #[test]
    fn adjusted_r_squared_is_penalized() {
        let fit = fit_capm(&noisy_fixture()).unwrap();
        assert!(fit.adj_r_squared.unwrap() < fit.r_squared.unwrap());
    }

    #[test]
    fn constant_market_is_a_degenerate_fit() {
        let asset = vec![0.01, 0.02, 0.03, 0.04];
        let market = vec![1.0, 1.0, 1.0, 1.0];

        let result = fit_capm(&aligned(asset, market));
        assert!(matches!(result, Err(RegressionError::DegenerateMarket)));
    }

    #[test]
    fn constant_asset_has_undefined_r_squared() {
        let asset = vec![0.01, 0.01, 0.01, 0.01];
        let market = vec![0.005, 0.012, -0.003, 0.02];

        let fit = fit_capm(&aligned(asset, market)).unwrap();

        //a flat response fits the horizontal line through its mean exactly
        assert_relative_eq!(fit.beta, 0.0, epsilon = 1e-15);
        assert_relative_eq!(fit.alpha, 0.01, epsilon = 1e-15);
        assert_eq!(fit.r_squared, None);
        assert_eq!(fit.adj_r_squared, None);
        //zero residual variance also leaves the p-values undefined
        assert_eq!(fit.p_alpha, None);
        assert_eq!(fit.p_beta, None);
    }

    #[test]
    fn too_few_observations_is_an_error() {
        let result = fit_capm(&aligned(vec![0.01, 0.02], vec![0.02, 0.03]));
        assert!(matches!(result, Err(RegressionError::TooFewObservations(2))));
    }

    #[test]
    fn p_values_lie_in_the_unit_interval() {
        let market = vec![0.011, -0.004, 0.02, -0.013, 0.007, 0.001, -0.009, 0.016];
        let asset = vec![0.009, -0.001, 0.017, -0.01, 0.004, 0.003, -0.012, 0.011];

        let fit = fit_capm(&aligned(asset, market)).unwrap();
        let p_alpha = fit.p_alpha.unwrap();
        let p_beta = fit.p_beta.unwrap();

        assert!((0.0..=1.0).contains(&p_alpha));
        assert!((0.0..=1.0).contains(&p_beta));
    }

    #[test]
    fn fit_is_bit_reproducible() {
        let data = noisy_fixture();
        let first = fit_capm(&data).unwrap();
        let second = fit_capm(&data).unwrap();

        assert_eq!(first.alpha.to_bits(), second.alpha.to_bits());
        assert_eq!(first.beta.to_bits(), second.beta.to_bits());
        assert_eq!(
            first.p_beta.unwrap().to_bits(),
            second.p_beta.unwrap().to_bits()
        );
    }
}

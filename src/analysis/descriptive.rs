use crate::analysis::returns::{AlignedReturns, MIN_VARIANCE_OBS};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary statistics for one return column
//each field is None when its minimum observation count is not met
//or a zero standard deviation makes it undefined
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColumnStats {
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl ColumnStats {
    //computes summary statistics for a column of finite values
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return ColumnStats {
                mean: None,
                std_dev: None,
                min: None,
                max: None,
                median: None,
                skewness: None,
                kurtosis: None,
            };
        }

        let mean = values.mean();
        let std_dev = (n >= MIN_VARIANCE_OBS).then(|| values.std_dev());

        ColumnStats {
            mean: Some(mean),
            std_dev,
            min: Some(values.min()),
            max: Some(values.max()),
            median: Some(median(values)),
            skewness: sample_skewness(values, mean),
            kurtosis: sample_excess_kurtosis(values, mean),
        }
    }
}

//descriptive statistics for both aligned columns plus their correlation
//correlation is symmetric so a single value covers both directions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub asset: ColumnStats,
    pub market: ColumnStats,
    pub correlation: Option<f64>,
}

impl DescriptiveStats {
    pub fn from_aligned(aligned: &AlignedReturns) -> Self {
        DescriptiveStats {
            asset: ColumnStats::from_values(&aligned.asset),
            market: ColumnStats::from_values(&aligned.market),
            correlation: correlation(&aligned.asset, &aligned.market),
        }
    }
}

//pearson correlation between two equal-length columns
//None with fewer than two observations or a constant column
pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < MIN_VARIANCE_OBS {
        return None;
    }

    let sd_x = x.std_dev();
    let sd_y = y.std_dev();
    if sd_x == 0.0 || sd_y == 0.0 {
        return None;
    }

    let r = x.covariance(y) / (sd_x * sd_y);
    Some(r.clamp(-1.0, 1.0))
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

//bias-adjusted sample skewness, the pandas convention
//g1 = n / ((n-1)(n-2)) * sum(d^3) / s^3
fn sample_skewness(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }

    let s = values.std_dev();
    if s == 0.0 {
        return None;
    }

    let nf = n as f64;
    let m3: f64 = values.iter().map(|x| (x - mean).powi(3)).sum();
    Some(nf / ((nf - 1.0) * (nf - 2.0)) * m3 / s.powi(3))
}

//bias-adjusted sample excess kurtosis, the pandas convention
//g2 = n(n+1) / ((n-1)(n-2)(n-3)) * sum(d^4) / s^4 - 3(n-1)^2 / ((n-2)(n-3))
fn sample_excess_kurtosis(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }

    let s = values.std_dev();
    if s == 0.0 {
        return None;
    }

    let nf = n as f64;
    let m4: f64 = values.iter().map(|x| (x - mean).powi(4)).sum();
    let lead = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0));
    let tail = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    Some(lead * m4 / s.powi(4) - tail)
}

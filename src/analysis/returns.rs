use crate::data::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//minimum aligned observations for variance and correlation
pub const MIN_VARIANCE_OBS: usize = 2;
//minimum aligned observations for the regression (one residual degree of freedom)
pub const MIN_REGRESSION_OBS: usize = 3;

//a single daily simple return, None when the return is undefined
//because the price at t or t-1 was zero, negative or missing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

//an ordered series of daily simple returns for one ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub symbol: String,
    pub points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

//daily simple returns from a price series
//r[t] = p[t] / p[t-1] - 1, the first date yields no return and is dropped
pub fn daily_returns(prices: &PriceSeries) -> ReturnSeries {
    let points = prices
        .points()
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (pair[0], pair[1]);
            let value = if prev.close > 0.0 && cur.close > 0.0 {
                let r = cur.close / prev.close - 1.0;
                r.is_finite().then_some(r)
            } else {
                None
            };
            ReturnPoint {
                date: cur.date,
                value,
            }
        })
        .collect();

    ReturnSeries {
        symbol: prices.symbol.clone(),
        points,
    }
}

//the date-intersected, fully defined pair of return series
//both columns have the same length and contain only finite values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedReturns {
    pub asset_symbol: String,
    pub market_symbol: String,
    pub dates: Vec<NaiveDate>,
    pub asset: Vec<f64>,
    pub market: Vec<f64>,
}

impl AlignedReturns {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

//inner join of two return series on date, discarding any row
//where either value is undefined
pub fn align(asset: &ReturnSeries, market: &ReturnSeries) -> AlignedReturns {
    let mut dates = Vec::new();
    let mut asset_values = Vec::new();
    let mut market_values = Vec::new();

    let mut a = asset.points.iter().peekable();
    let mut m = market.points.iter().peekable();

    while let (Some(&ap), Some(&mp)) = (a.peek(), m.peek()) {
        if ap.date < mp.date {
            a.next();
        } else if mp.date < ap.date {
            m.next();
        } else {
            if let (Some(av), Some(mv)) = (ap.value, mp.value) {
                dates.push(ap.date);
                asset_values.push(av);
                market_values.push(mv);
            }
            a.next();
            m.next();
        }
    }

    AlignedReturns {
        asset_symbol: asset.symbol.clone(),
        market_symbol: market.symbol.clone(),
        dates,
        asset: asset_values,
        market: market_values,
    }
}

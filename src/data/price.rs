use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Empty price series for {0}")]
    Empty(String),
    #[error("Non-finite close price {close} on {date}")]
    NonFiniteClose { date: NaiveDate, close: f64 },
}

//a single daily closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

//an ordered series of daily closing prices for one ticker
//dates are strictly increasing with duplicates removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    //builds a series from raw observations, sorting by date and
    //keeping the last observation for any duplicated date
    pub fn new(symbol: String, mut points: Vec<PricePoint>) -> Result<Self, PriceError> {
        if points.is_empty() {
            return Err(PriceError::Empty(symbol));
        }

        if let Some(bad) = points.iter().find(|p| !p.close.is_finite()) {
            return Err(PriceError::NonFiniteClose {
                date: bad.date,
                close: bad.close,
            });
        }

        points.sort_by(|a, b| a.date.cmp(&b.date));
        points.dedup_by(|next, prev| {
            if next.date == prev.date {
                prev.close = next.close;
                true
            } else {
                false
            }
        });

        Ok(PriceSeries { symbol, points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    //first and last trading dates in the series
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}

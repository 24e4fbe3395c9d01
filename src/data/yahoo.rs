use crate::data::price::{PriceError, PricePoint, PriceSeries};
use chrono::{DateTime, NaiveDate, NaiveTime};
use thiserror::Error;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to initialize Yahoo Finance client")]
    Connector(#[source] yahoo::YahooError),
    #[error("Invalid ticker symbol: {0:?}")]
    InvalidSymbol(String),
    #[error("Invalid date range: start {start} is not before end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Yahoo Finance request failed for {symbol}")]
    Fetch {
        symbol: String,
        #[source]
        source: yahoo::YahooError,
    },
    #[error("No price data for {symbol} between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Timestamp conversion failed: {0}")]
    TimeConversion(String),
    #[error(transparent)]
    Price(#[from] PriceError),
}

//fetches daily close prices from yahoo finance
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        let connector = yahoo::YahooConnector::new().map_err(DataError::Connector)?;
        Ok(YahooProvider { connector })
    }

    //fetches the daily close series for one ticker
    //start is inclusive, end is exclusive at midnight utc
    pub async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        if symbol.trim().is_empty() {
            return Err(DataError::InvalidSymbol(symbol.to_string()));
        }

        if start >= end {
            return Err(DataError::InvalidDateRange { start, end });
        }

        let start_time = to_offset(start)?;
        let end_time = to_offset(end)?;

        let response = self
            .connector
            .get_quote_history(symbol, start_time, end_time)
            .await
            .map_err(|source| DataError::Fetch {
                symbol: symbol.to_string(),
                source,
            })?;

        let quotes = response.quotes().map_err(|source| DataError::Fetch {
            symbol: symbol.to_string(),
            source,
        })?;

        let mut points = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let date = DateTime::from_timestamp(quote.timestamp, 0)
                .ok_or_else(|| {
                    DataError::TimeConversion(format!("quote timestamp {}", quote.timestamp))
                })?
                .date_naive();

            //quotes with a missing close come back as non-finite, skip them
            //so the date is simply absent and dropped at alignment
            if quote.close.is_finite() {
                points.push(PricePoint::new(date, quote.close));
            }
        }

        if points.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        Ok(PriceSeries::new(symbol.to_string(), points)?)
    }
}

fn to_offset(date: NaiveDate) -> Result<OffsetDateTime, DataError> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}

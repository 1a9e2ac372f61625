//! `/candles` endpoint
//!
//! OHLCV candles for one market on one exchange.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{de, require_id, validate_range, ApiResponse, Interval};
use crate::dispatch::RequestDispatcher;
use crate::error::CoinCapError;

/// Cache lifetime for candle data, in seconds
const CANDLES_TTL_SECS: u64 = 60;

/// One OHLCV bucket
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CandleData {
    /// Price at the start of the bucket
    #[serde(deserialize_with = "de::number")]
    pub open: f64,
    /// Highest price in the bucket
    #[serde(deserialize_with = "de::number")]
    pub high: f64,
    /// Lowest price in the bucket
    #[serde(deserialize_with = "de::number")]
    pub low: f64,
    /// Price at the end of the bucket
    #[serde(deserialize_with = "de::number")]
    pub close: f64,
    /// Base units traded in the bucket
    #[serde(deserialize_with = "de::number")]
    pub volume: f64,
    /// Start of the bucket, UNIX milliseconds
    #[serde(deserialize_with = "de::number")]
    pub period: i64,
}

/// Parameters for a candle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandlesQuery {
    /// Exchange to read candles from
    pub exchange_id: String,
    /// Bucket width
    pub interval: Interval,
    /// Asset id of the base
    pub base_id: String,
    /// Asset id of the quote
    pub quote_id: String,
    /// Omit both `start` and `end` for the most recent candles
    pub start: Option<DateTime<Utc>>,
    /// End of the range, after `start`
    pub end: Option<DateTime<Utc>>,
}

impl CandlesQuery {
    /// Creates a query for the most recent candles of a market
    pub fn new(
        exchange_id: impl Into<String>,
        interval: Interval,
        base_id: impl Into<String>,
        quote_id: impl Into<String>,
    ) -> Self {
        Self {
            exchange_id: exchange_id.into(),
            interval,
            base_id: base_id.into(),
            quote_id: quote_id.into(),
            start: None,
            end: None,
        }
    }

    /// Restricts the query to a time range
    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }
}

/// Access to the `/candles` endpoint
#[derive(Debug, Clone, Copy)]
pub struct CandlesClient<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> CandlesClient<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Gets candles for a market
    ///
    /// # Returns
    /// * `Err(CoinCapError::InvalidArgument)` for blank ids or a malformed time range,
    ///   before any cache or network activity
    pub async fn get(&self, query: &CandlesQuery) -> Result<ApiResponse<Vec<CandleData>>, CoinCapError> {
        let exchange_id = require_id("exchange_id", &query.exchange_id, "exchange")?;
        let base_id = require_id("base_id", &query.base_id, "asset")?;
        let quote_id = require_id("quote_id", &query.quote_id, "asset")?;
        validate_range(query.start, query.end)?;

        let url = self
            .dispatcher
            .url(&["candles"])
            .query("exchangeId", exchange_id)
            .query("interval", query.interval)
            .query("baseId", base_id)
            .query("quoteId", quote_id)
            .query_opt("start", query.start.map(|t| t.timestamp_millis()))
            .query_opt("end", query.end.map(|t| t.timestamp_millis()));

        self.dispatcher.fetch_json(&url, CANDLES_TTL_SECS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_candle_data_parses() {
        let json = r#"{"open":"0.0741940000000000","high":"0.0745800000000000","low":"0.0741350000000000","close":"0.0745200000000000","volume":"1071.4295980000000000","period":1533513600000}"#;
        let candle: CandleData = serde_json::from_str(json).unwrap();
        assert!((candle.open - 0.074194).abs() < 1e-9);
        assert!(candle.high >= candle.low);
        assert_eq!(candle.period, 1_533_513_600_000);
    }

    #[test]
    fn test_candles_query_between() {
        let end = Utc::now();
        let start = end - Duration::hours(6);
        let query = CandlesQuery::new("poloniex", Interval::H1, "ethereum", "bitcoin").between(start, end);

        assert_eq!(query.start, Some(start));
        assert_eq!(query.end, Some(end));
        assert_eq!(query.interval, Interval::H1);
    }
}

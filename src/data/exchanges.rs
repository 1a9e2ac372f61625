//! `/exchanges` endpoints

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use super::{de, require_id, ApiResponse};
use crate::dispatch::RequestDispatcher;
use crate::error::CoinCapError;

/// Cache lifetime for the full exchange listing, in seconds
const EXCHANGES_TTL_SECS: u64 = 120;

/// Cache lifetime for a single exchange, in seconds
const EXCHANGE_TTL_SECS: u64 = 60;

/// An exchange and its aggregate volume
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeData {
    /// Unique identifier, e.g. `binance`
    pub exchange_id: String,
    /// Proper name
    pub name: String,
    /// Rank by total volume, 1 is the largest
    #[serde(default, deserialize_with = "de::opt_number")]
    pub rank: Option<u32>,
    /// Share of total daily volume across all exchanges
    #[serde(default, deserialize_with = "de::opt_number")]
    pub percent_total_volume: Option<f64>,
    /// Daily volume, in USD
    #[serde(default, deserialize_with = "de::opt_number")]
    pub volume_usd: Option<f64>,
    /// Number of trading pairs offered
    #[serde(default, deserialize_with = "de::opt_number")]
    pub trading_pairs: Option<u32>,
    /// Whether trades are available over the websocket feed
    #[serde(default)]
    pub socket: Option<bool>,
    /// Website
    #[serde(default)]
    pub exchange_url: Option<String>,
    /// UNIX milliseconds of the last update received from the exchange
    #[serde(default, deserialize_with = "de::opt_number")]
    pub updated: Option<i64>,
}

impl ExchangeData {
    /// Time of the last update received from the exchange
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Access to the `/exchanges` endpoints
#[derive(Debug, Clone, Copy)]
pub struct ExchangesClient<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> ExchangesClient<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Lists all exchanges
    pub async fn list(&self) -> Result<ApiResponse<Vec<ExchangeData>>, CoinCapError> {
        let url = self.dispatcher.url(&["exchanges"]);
        self.dispatcher.fetch_json(&url, EXCHANGES_TTL_SECS).await
    }

    /// Gets a single exchange by id
    pub async fn get(&self, id: &str) -> Result<ApiResponse<ExchangeData>, CoinCapError> {
        let id = require_id("id", id, "exchange")?;
        let url = self.dispatcher.url(&["exchanges", id]);
        self.dispatcher.fetch_json(&url, EXCHANGE_TTL_SECS).await
    }
}

//! `/assets` endpoints
//!
//! Listings, single assets, price history and per-asset markets. All of them
//! are cached for 60 seconds.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{de, non_blank, require_id, validate_range, ApiResponse, Interval, DEFAULT_LIMIT, MAX_LIMIT};
use crate::dispatch::RequestDispatcher;
use crate::error::CoinCapError;

/// Cache lifetime for asset lookups, in seconds
const ASSETS_TTL_SECS: u64 = 60;

/// A ranked crypto asset
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetData {
    /// Unique identifier, e.g. `bitcoin`
    pub id: String,
    /// Rank by market cap, 1 is the largest
    #[serde(default, deserialize_with = "de::opt_number")]
    pub rank: Option<u32>,
    /// Most common ticker symbol
    pub symbol: String,
    /// Proper name
    pub name: String,
    /// Available supply for trading
    #[serde(default, deserialize_with = "de::opt_number")]
    pub supply: Option<f64>,
    /// Total quantity issued
    #[serde(default, deserialize_with = "de::opt_number")]
    pub max_supply: Option<f64>,
    /// Supply x price, in USD
    #[serde(default, deserialize_with = "de::opt_number")]
    pub market_cap_usd: Option<f64>,
    /// Trading volume over the last 24 hours, in USD
    #[serde(default, rename = "volumeUsd24Hr", deserialize_with = "de::opt_number")]
    pub volume_usd_24h: Option<f64>,
    /// Volume-weighted price, in USD
    #[serde(default, deserialize_with = "de::opt_number")]
    pub price_usd: Option<f64>,
    /// Change over the last 24 hours, in percent
    #[serde(default, rename = "changePercent24Hr", deserialize_with = "de::opt_number")]
    pub change_percent_24h: Option<f64>,
    /// Volume-weighted average price over the last 24 hours
    #[serde(default, rename = "vwap24Hr", deserialize_with = "de::opt_number")]
    pub vwap_24h: Option<f64>,
    /// Blockchain explorer address
    #[serde(default)]
    pub explorer: Option<String>,
}

/// One point of an asset's price history
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHistoryData {
    /// Volume-weighted price over the interval, in USD
    #[serde(default, deserialize_with = "de::opt_number")]
    pub price_usd: Option<f64>,
    /// UNIX milliseconds
    #[serde(default, deserialize_with = "de::opt_number")]
    pub time: Option<i64>,
    /// Circulating supply at `time`
    #[serde(default, deserialize_with = "de::opt_number")]
    pub circulating_supply: Option<f64>,
    /// `time` as a timestamp
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// A market trading a given asset
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMarketData {
    /// Exchange the market trades on
    pub exchange_id: String,
    /// Asset id of the base
    pub base_id: String,
    /// Asset id of the quote
    pub quote_id: String,
    /// Ticker of the base
    pub base_symbol: String,
    /// Ticker of the quote
    pub quote_symbol: String,
    /// Trading volume over the last 24 hours, in USD
    #[serde(default, rename = "volumeUsd24Hr", deserialize_with = "de::opt_number")]
    pub volume_usd_24h: Option<f64>,
    /// Last traded price, in USD
    #[serde(default, deserialize_with = "de::opt_number")]
    pub price_usd: Option<f64>,
    /// Share of the exchange's volume, in percent
    #[serde(default, deserialize_with = "de::opt_number")]
    pub volume_percent: Option<f64>,
}

/// Filters for the asset listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetsQuery {
    /// Search by asset id (`bitcoin`) or symbol (`BTC`)
    pub search: Option<String>,
    /// Restrict to these asset ids
    pub ids: Vec<String>,
    /// Page size, capped at 2000
    pub limit: u32,
    /// Number of items to skip
    pub offset: u32,
}

impl Default for AssetsQuery {
    fn default() -> Self {
        Self {
            search: None,
            ids: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl AssetsQuery {
    /// Filters by asset id or symbol
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restricts the listing to the given ids
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the page size
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets how many items to skip
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// Access to the `/assets` endpoints
#[derive(Debug, Clone, Copy)]
pub struct AssetsClient<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> AssetsClient<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Lists assets
    pub async fn list(&self, query: &AssetsQuery) -> Result<ApiResponse<Vec<AssetData>>, CoinCapError> {
        let ids = (!query.ids.is_empty()).then(|| query.ids.join(","));
        let url = self
            .dispatcher
            .url(&["assets"])
            .query_opt("search", non_blank(query.search.as_deref()))
            .query_opt("ids", ids)
            .query("limit", query.limit.min(MAX_LIMIT))
            .query_opt("offset", (query.offset != 0).then_some(query.offset));

        self.dispatcher.fetch_json(&url, ASSETS_TTL_SECS).await
    }

    /// Gets a single asset by id
    pub async fn get(&self, id: &str) -> Result<ApiResponse<AssetData>, CoinCapError> {
        let id = require_id("id", id, "asset")?;
        let url = self.dispatcher.url(&["assets", id]);

        self.dispatcher.fetch_json(&url, ASSETS_TTL_SECS).await
    }

    /// Gets the price history of an asset
    ///
    /// # Arguments
    /// * `id` - Asset id
    /// * `interval` - Bucket size
    /// * `start`, `end` - Optional time range; both or neither, `end` after `start`
    pub async fn history(
        &self,
        id: &str,
        interval: Interval,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<ApiResponse<Vec<AssetHistoryData>>, CoinCapError> {
        let id = require_id("id", id, "asset")?;
        validate_range(start, end)?;

        let url = self
            .dispatcher
            .url(&["assets", id, "history"])
            .query("interval", interval)
            .query_opt("start", start.map(|t| t.timestamp_millis()))
            .query_opt("end", end.map(|t| t.timestamp_millis()));

        self.dispatcher.fetch_json(&url, ASSETS_TTL_SECS).await
    }

    /// Lists the markets an asset trades on
    pub async fn markets(
        &self,
        id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ApiResponse<Vec<AssetMarketData>>, CoinCapError> {
        let id = require_id("id", id, "asset")?;
        let url = self
            .dispatcher
            .url(&["assets", id, "markets"])
            .query("limit", limit.min(MAX_LIMIT))
            .query_opt("offset", (offset != 0).then_some(offset));

        self.dispatcher.fetch_json(&url, ASSETS_TTL_SECS).await
    }
}

//! `/markets` endpoint

use serde::Deserialize;

use super::{de, non_blank, ApiResponse, DEFAULT_LIMIT, MAX_LIMIT};
use crate::dispatch::RequestDispatcher;
use crate::error::CoinCapError;

/// Cache lifetime for market listings, in seconds
const MARKETS_TTL_SECS: u64 = 60;

/// A trading pair on one exchange
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    /// Exchange the market trades on
    pub exchange_id: String,
    /// Rank by volume within the exchange
    #[serde(default, deserialize_with = "de::opt_number")]
    pub rank: Option<u32>,
    /// Ticker of the base
    pub base_symbol: String,
    /// Asset id of the base
    pub base_id: String,
    /// Ticker of the quote
    pub quote_symbol: String,
    /// Asset id of the quote
    pub quote_id: String,
    /// Quote units paid for one base unit
    #[serde(default, deserialize_with = "de::opt_number")]
    pub price_quote: Option<f64>,
    /// Last traded price, in USD
    #[serde(default, deserialize_with = "de::opt_number")]
    pub price_usd: Option<f64>,
    /// Trading volume over the last 24 hours, in USD
    #[serde(default, rename = "volumeUsd24Hr", deserialize_with = "de::opt_number")]
    pub volume_usd_24h: Option<f64>,
    /// Share of the exchange's volume, in percent
    #[serde(default, deserialize_with = "de::opt_number")]
    pub percent_exchange_volume: Option<f64>,
    /// Trades over the last 24 hours
    #[serde(default, rename = "tradesCount24Hr", deserialize_with = "de::opt_number")]
    pub trades_count_24h: Option<u64>,
    /// Last update, UNIX milliseconds
    #[serde(default, deserialize_with = "de::opt_number")]
    pub updated: Option<i64>,
}

/// Filters for the market listing
///
/// Blank filters are left out of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsQuery {
    /// Only markets on this exchange
    pub exchange_id: Option<String>,
    /// Only markets with this base ticker
    pub base_symbol: Option<String>,
    /// Only markets with this quote ticker
    pub quote_symbol: Option<String>,
    /// Only markets with this base asset id
    pub base_id: Option<String>,
    /// Only markets with this quote asset id
    pub quote_id: Option<String>,
    /// Markets with this symbol as either base or quote
    pub asset_symbol: Option<String>,
    /// Markets with this id as either base or quote
    pub asset_id: Option<String>,
    /// Page size, capped at 2000
    pub limit: u32,
    /// Number of items to skip
    pub offset: u32,
}

impl Default for MarketsQuery {
    fn default() -> Self {
        Self {
            exchange_id: None,
            base_symbol: None,
            quote_symbol: None,
            base_id: None,
            quote_id: None,
            asset_symbol: None,
            asset_id: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl MarketsQuery {
    /// Filters by exchange id
    pub fn exchange_id(mut self, value: impl Into<String>) -> Self {
        self.exchange_id = Some(value.into());
        self
    }

    /// Filters by base ticker
    pub fn base_symbol(mut self, value: impl Into<String>) -> Self {
        self.base_symbol = Some(value.into());
        self
    }

    /// Filters by quote ticker
    pub fn quote_symbol(mut self, value: impl Into<String>) -> Self {
        self.quote_symbol = Some(value.into());
        self
    }

    /// Filters by base asset id
    pub fn base_id(mut self, value: impl Into<String>) -> Self {
        self.base_id = Some(value.into());
        self
    }

    /// Filters by quote asset id
    pub fn quote_id(mut self, value: impl Into<String>) -> Self {
        self.quote_id = Some(value.into());
        self
    }

    /// Filters by a ticker on either side
    pub fn asset_symbol(mut self, value: impl Into<String>) -> Self {
        self.asset_symbol = Some(value.into());
        self
    }

    /// Filters by an asset id on either side
    pub fn asset_id(mut self, value: impl Into<String>) -> Self {
        self.asset_id = Some(value.into());
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

/// Access to the `/markets` endpoint
#[derive(Debug, Clone, Copy)]
pub struct MarketsClient<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> MarketsClient<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Lists markets matching the query
    pub async fn list(&self, query: &MarketsQuery) -> Result<ApiResponse<Vec<MarketData>>, CoinCapError> {
        let url = self
            .dispatcher
            .url(&["markets"])
            .query_opt("exchangeId", non_blank(query.exchange_id.as_deref()))
            .query_opt("baseSymbol", non_blank(query.base_symbol.as_deref()))
            .query_opt("quoteSymbol", non_blank(query.quote_symbol.as_deref()))
            .query_opt("baseId", non_blank(query.base_id.as_deref()))
            .query_opt("quoteId", non_blank(query.quote_id.as_deref()))
            .query_opt("assetSymbol", non_blank(query.asset_symbol.as_deref()))
            .query_opt("assetId", non_blank(query.asset_id.as_deref()))
            .query("limit", query.limit.min(MAX_LIMIT))
            .query("offset", query.offset);

        self.dispatcher.fetch_json(&url, MARKETS_TTL_SECS).await
    }
}

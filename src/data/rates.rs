//! `/rates` endpoints
//!
//! Conversion rates to USD for fiat and crypto currencies. Rates move fast, so
//! they use the shortest cache lifetime.

use serde::Deserialize;

use super::{de, require_id, ApiResponse};
use crate::dispatch::RequestDispatcher;
use crate::error::CoinCapError;

/// Cache lifetime for rate data, in seconds
const RATES_TTL_SECS: u64 = 15;

/// USD conversion rate of an asset or fiat currency
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateData {
    /// Unique identifier, e.g. `bitcoin` or `euro`
    pub id: String,
    /// Most common symbol
    pub symbol: String,
    /// Currency sign, when one exists
    #[serde(default)]
    pub currency_symbol: Option<String>,
    /// `fiat` or `crypto`
    #[serde(rename = "type")]
    pub kind: String,
    /// Rate conversion to USD
    #[serde(default, deserialize_with = "de::opt_number")]
    pub rate_usd: Option<f64>,
}

impl RateData {
    /// Returns true for fiat currencies
    pub fn is_fiat(&self) -> bool {
        self.kind.eq_ignore_ascii_case("fiat")
    }
}

/// Access to the `/rates` endpoints
#[derive(Debug, Clone, Copy)]
pub struct RatesClient<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> RatesClient<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Lists all rates
    pub async fn list(&self) -> Result<ApiResponse<Vec<RateData>>, CoinCapError> {
        let url = self.dispatcher.url(&["rates"]);
        self.dispatcher.fetch_json(&url, RATES_TTL_SECS).await
    }

    /// Gets the rate of one asset or currency
    pub async fn get(&self, id: &str) -> Result<ApiResponse<RateData>, CoinCapError> {
        let id = require_id("id", id, "asset")?;
        let url = self.dispatcher.url(&["rates", id]);
        self.dispatcher.fetch_json(&url, RATES_TTL_SECS).await
    }
}

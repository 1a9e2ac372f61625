//! Endpoint groups and response models
//!
//! Each submodule covers one family of REST endpoints: it validates arguments,
//! builds the resolved URL, fetches through the dispatcher with the family's
//! cache lifetime, and decodes the JSON envelope.

pub mod assets;
pub mod candles;
pub(crate) mod de;
pub mod exchanges;
pub mod markets;
pub mod rates;

pub use assets::{AssetData, AssetHistoryData, AssetMarketData, AssetsClient, AssetsQuery};
pub use candles::{CandleData, CandlesClient, CandlesQuery};
pub use exchanges::{ExchangeData, ExchangesClient};
pub use markets::{MarketData, MarketsClient, MarketsQuery};
pub use rates::{RateData, RatesClient};

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::CoinCapError;

/// Largest page size the service accepts
pub const MAX_LIMIT: u32 = 2000;

/// Default page size
pub const DEFAULT_LIMIT: u32 = 100;

/// Envelope around every response: the payload plus the server timestamp
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// The payload
    pub data: T,
    /// Server time of the response in UNIX milliseconds
    #[serde(default)]
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    /// Server time of the response
    pub fn server_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// Bucket size for historical and candle data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    /// 1 minute
    M1,
    /// 5 minutes
    M5,
    /// 15 minutes
    M15,
    /// 30 minutes
    M30,
    /// 1 hour
    H1,
    /// 2 hours
    H2,
    /// 6 hours
    H6,
    /// 12 hours
    H12,
    /// 1 day
    D1,
}

impl Interval {
    /// Query-string form of the interval
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::M1 => "m1",
            Interval::M5 => "m5",
            Interval::M15 => "m15",
            Interval::M30 => "m30",
            Interval::H1 => "h1",
            Interval::H2 => "h2",
            Interval::H6 => "h6",
            Interval::H12 => "h12",
            Interval::D1 => "d1",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejects empty or whitespace-only identifiers
pub(crate) fn require_id<'a>(
    name: &'static str,
    value: &'a str,
    what: &str,
) -> Result<&'a str, CoinCapError> {
    if value.trim().is_empty() {
        return Err(CoinCapError::invalid(
            name,
            format!("null or invalid value, must be a valid {what} id"),
        ));
    }
    Ok(value)
}

/// Returns a filter value only when it is set and not blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Checks an optional time range
///
/// Both bounds must be given together, `end` must come after `start`, and
/// `start` must lie in the past.
pub(crate) fn validate_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), CoinCapError> {
    match (start, end) {
        (None, None) => Ok(()),
        (Some(_), None) | (None, Some(_)) => Err(CoinCapError::invalid(
            "start",
            "start and end must both be valid timestamps",
        )),
        (Some(start), Some(end)) => {
            if end <= start {
                return Err(CoinCapError::invalid(
                    "end",
                    "end must be a valid timestamp greater than start",
                ));
            }
            if start > Utc::now() {
                return Err(CoinCapError::invalid("start", "start must be in the past"));
            }
            Ok(())
        }
    }
}

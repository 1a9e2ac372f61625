//! CoinCap API client
//!
//! Typed access to the CoinCap market-data REST API. Every call passes through a
//! single dispatcher that fronts the network with a TTL response cache shared
//! by all clones of a client.
//!
//! ```no_run
//! use coincap::{ClientConfig, CoinCapClient};
//!
//! # async fn run() -> Result<(), coincap::CoinCapError> {
//! let client = CoinCapClient::new(ClientConfig::default())?;
//! let bitcoin = client.assets().get("bitcoin").await?;
//! println!("{} = {:?} USD", bitcoin.data.symbol, bitcoin.data.price_usd);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

pub mod cache;
pub mod client;
pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod transport;

pub use cache::{MemoryCache, ResponseStore};
pub use client::CoinCapClient;
pub use config::ClientConfig;
pub use data::{ApiResponse, Interval};
pub use dispatch::RequestDispatcher;
pub use error::{CacheError, CoinCapError};
pub use request::RequestUrl;
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

/// Default base URL of the service
pub const API_BASE_URL: &str = "https://api.coincap.io";

/// Version segment of every REST path
pub const API_VERSION: u32 = 2;

/// Shortest lifetime any cached response gets
///
/// Endpoints may ask for longer, never shorter. Polling the same URL faster
/// than this belongs on the streaming feeds.
pub const MIN_CACHE_TTL: Duration = Duration::from_millis(15_000);

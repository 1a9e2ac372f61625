//! Response cache shared by every endpoint call of one client
//!
//! Entries are keyed by the fully-resolved request URL and hold the raw response
//! body until their expiry instant. Expired entries are treated as absent on
//! read. The `ResponseStore` trait is the seam the dispatcher talks to, so a
//! different store (or a deliberately broken one in tests) can be plugged in.

mod memory;

use std::time::Duration;

pub use memory::MemoryCache;

use crate::error::CacheError;

/// Key-addressed, TTL-bounded storage for response bodies
///
/// Implementations must be safe to call from many concurrent fetches. Errors
/// signal a malfunction of the store itself; a plain miss is `Ok(None)`.
pub trait ResponseStore: Send + Sync {
    /// Whether reads and writes are currently served
    fn is_enabled(&self) -> bool;

    /// Turns the store on or off without touching stored entries
    fn set_enabled(&self, enabled: bool);

    /// Looks up a live entry
    ///
    /// Returns `Ok(None)` when the key is absent, expired, or the store is disabled.
    fn try_get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores or overwrites an entry
    ///
    /// The effective lifetime is never shorter than [`crate::MIN_CACHE_TTL`].
    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Removes every entry
    fn clear(&self);
}

//! In-memory response store with lazy expiry and an optional sweeper
//!
//! Provides `MemoryCache`, a process-lifetime map from resolved request URL to
//! response body. Expiry is checked on every read; a background sweeper can be
//! started to bound memory when many distinct URLs are fetched once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::ResponseStore;
use crate::error::CacheError;
use crate::MIN_CACHE_TTL;

/// A cached response body and the instant it goes stale
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Raw response body, stored verbatim
    value: String,
    /// After this instant the entry is logically absent
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Handle to a running sweeper task
#[derive(Debug)]
struct Sweeper {
    shutdown_tx: oneshot::Sender<()>,
}

/// Thread-safe in-memory response cache
///
/// Created enabled. All methods take `&self`; share it behind an `Arc`.
/// Clearing happens under the write lock, so a concurrent read sees either the
/// full old map or the empty one.
#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    enabled: AtomicBool,
    disposed: AtomicBool,
    sweeper: Mutex<Option<Sweeper>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Creates an empty, enabled cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            enabled: AtomicBool::new(true),
            disposed: AtomicBool::new(false),
            sweeper: Mutex::new(None),
        }
    }

    /// Number of physically stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether `dispose` has run
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Removes every expired entry
    ///
    /// # Returns
    /// The number of entries evicted
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Starts a background task that calls `sweep_expired` every `interval`
    ///
    /// The task holds only a weak reference to the cache and stops on `dispose`,
    /// or once the cache is dropped. Starting a second sweeper replaces the first.
    ///
    /// # Returns
    /// * `true` if a sweeper was started
    /// * `false` if the interval is zero, the cache is disposed, or no tokio runtime is running
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> bool {
        if interval.is_zero() {
            warn!("refusing to start cache sweeper with a zero interval");
            return false;
        }
        if self.is_disposed() {
            return false;
        }
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("no tokio runtime available, cache sweeper not started");
                return false;
            }
        };

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let cache: Weak<Self> = Arc::downgrade(self);

        handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Skip the first tick (immediate)
            ticker.tick().await;
            debug!(?interval, "cache sweeper started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(store) = cache.upgrade() else {
                            break;
                        };
                        let evicted = store.sweep_expired();
                        if evicted > 0 {
                            debug!(evicted, "swept expired cache entries");
                        }
                    }
                    _ = &mut shutdown_rx => {
                        break;
                    }
                }
            }

            debug!("cache sweeper stopped");
        });

        if let Some(previous) = self.sweeper.lock().replace(Sweeper { shutdown_tx }) {
            let _ = previous.shutdown_tx.send(());
        }
        true
    }

    /// Releases the sweeper and drops all entries
    ///
    /// Idempotent. Operations still in flight afterwards get `CacheError::Disposed`,
    /// which the dispatcher treats as a miss.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(sweeper) = self.sweeper.lock().take() {
            let _ = sweeper.shutdown_tx.send(());
        }
        self.entries.write().clear();
    }
}

impl ResponseStore for MemoryCache {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.is_disposed() {
            return Err(CacheError::Disposed);
        }
        if !self.is_enabled() {
            return Ok(None);
        }

        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: evict unless a concurrent put already refreshed it
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl.max(MIN_CACHE_TTL),
        };

        let mut entries = self.entries.write();
        // Checked under the lock so nothing lands after dispose has cleared
        if self.is_disposed() {
            return Err(CacheError::Disposed);
        }
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Drop for MemoryCache {
    fn drop(&mut self) {
        self.dispose();
    }
}

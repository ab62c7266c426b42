//! Per-session memoization of provider calls.
//!
//! Each provider operation gets its own [`FetchCache`], keyed by the call's
//! parameters, so the cache as a whole is keyed by (operation, parameters).
//! Entries live as long as the session. Failed fetches are not stored.

use std::{collections::HashMap, future::Future, hash::Hash, sync::Arc};

use sift_traits::{FinancialRecord, ForeignQuote, Instrument, ListingQuery, RegionalListing, ReportingPeriod};

/// A memo table for one provider operation.
#[derive(Debug)]
pub struct FetchCache<K, V> {
    entries: HashMap<K, Arc<V>>,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash, V> FetchCache<K, V> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.get(key).cloned()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its
    /// success.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetch` returns on failure; nothing is cached then.
    pub async fn get_or_fetch<F, Fut, E>(&mut self, key: K, fetch: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(Arc::clone(value));
        }

        self.misses += 1;
        let value = Arc::new(fetch().await?);
        self.entries.insert(key, Arc::clone(&value));
        Ok(value)
    }

    /// Drop every entry. Hit/miss counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl<K: Eq + Hash, V> Default for FetchCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Stored entries.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that went to the provider.
    pub misses: u64,
}

impl std::ops::Add for CacheStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            entries: self.entries + rhs.entries,
            hits: self.hits + rhs.hits,
            misses: self.misses + rhs.misses,
        }
    }
}

/// All memo tables a session owns, one per provider operation.
#[derive(Debug, Default)]
pub struct SessionCache {
    /// "list instruments", keyed by listing query.
    pub instruments: FetchCache<ListingQuery, Vec<Instrument>>,
    /// "list financial indicators", keyed by reporting period.
    pub financials: FetchCache<ReportingPeriod, Vec<FinancialRecord>>,
    /// "list regional instruments" (no parameters).
    pub regional: FetchCache<(), Vec<RegionalListing>>,
    /// "get quote info", keyed by ticker.
    pub quotes: FetchCache<String, ForeignQuote>,
}

impl SessionCache {
    /// Create an empty session cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything fetched so far.
    pub fn clear(&mut self) {
        self.instruments.clear();
        self.financials.clear();
        self.regional.clear();
        self.quotes.clear();
    }

    /// Combined statistics across operations.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.instruments.stats()
            + self.financials.stats()
            + self.regional.stats()
            + self.quotes.stats()
    }
}

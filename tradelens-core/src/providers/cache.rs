//! In-process TTL memoization for collaborator calls.
//!
//! Caches are advisory: concurrent readers share a read lock, racing writers
//! both store and the last one wins. Expired entries are never returned; a
//! lookup evicts its own stale entry and every insert sweeps all stale entries.
//! Errors are not cached.

use super::{ExchangeTickerProvider, MarketDataProvider, SymbolInfo, TickerMap};
use crate::domain::{Interval, OhlcvFrame, Period};
use crate::error::UpstreamError;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                Some((stored, value)) if stored.elapsed() < self.ttl => return Some(value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries
            .get(key)
            .is_some_and(|(stored, _)| stored.elapsed() >= self.ttl)
        {
            entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let ttl = self.ttl;
        entries.retain(|_, (stored, _)| stored.elapsed() < ttl);
        entries.insert(key, (Instant::now(), value));
    }

    /// Return the cached value or compute, store and return a fresh one.
    /// The lock is not held while `fetch` runs.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let value = fetch()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Memoizing decorator over a market data provider.
pub struct CachedMarketData<P> {
    inner: P,
    history: TtlCache<(String, Period, Interval), OhlcvFrame>,
    info: TtlCache<String, SymbolInfo>,
}

impl<P: MarketDataProvider> CachedMarketData<P> {
    pub fn new(inner: P, history_ttl: Duration, info_ttl: Duration) -> Self {
        Self {
            inner,
            history: TtlCache::new(history_ttl),
            info: TtlCache::new(info_ttl),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: MarketDataProvider> MarketDataProvider for CachedMarketData<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<OhlcvFrame, UpstreamError> {
        let key = (symbol.to_string(), period, interval);
        if let Some(frame) = self.history.get(&key) {
            debug!(symbol, %period, "market data cache hit");
            return Ok(frame);
        }
        debug!(symbol, %period, "market data cache miss");
        let frame = self.inner.history(symbol, period, interval)?;
        self.history.insert(key, frame.clone());
        Ok(frame)
    }

    fn info(&self, symbol: &str) -> Result<SymbolInfo, UpstreamError> {
        self.info
            .get_or_try_insert_with(symbol.to_string(), || self.inner.info(symbol))
    }
}

/// Memoizing decorator over an exchange ticker.
pub struct CachedTicker<T> {
    inner: T,
    cache: TtlCache<(), TickerMap>,
}

impl<T: ExchangeTickerProvider> CachedTicker<T> {
    pub fn new(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }
}

impl<T: ExchangeTickerProvider> ExchangeTickerProvider for CachedTicker<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn ticker(&self) -> Result<TickerMap, UpstreamError> {
        self.cache.get_or_try_insert_with((), || self.inner.ticker())
    }
}

//! Positive-result match cache.
//!
//! Maps a query address to the time it last matched a registered network.
//! Misses are never stored and entries have no expiry.

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct MatchCache {
    hits: Mutex<HashMap<Ipv4Addr, DateTime<Local>>>,
}

impl MatchCache {
    pub fn new() -> Self {
        MatchCache::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Ipv4Addr, DateTime<Local>>> {
        self.hits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.lock().contains_key(&addr)
    }

    pub fn get(&self, addr: Ipv4Addr) -> Option<DateTime<Local>> {
        self.lock().get(&addr).copied()
    }

    /// Record a hit for `addr` unless `allow` rejects it under the cache lock.
    /// An existing timestamp is kept. Returns `true` if a new key was stored.
    pub fn record_if(&self, addr: Ipv4Addr, allow: impl FnOnce() -> bool) -> bool {
        let mut hits = self.lock();
        if hits.contains_key(&addr) || !allow() {
            return false;
        }
        hits.insert(addr, Local::now());
        true
    }

    #[cfg(test)]
    pub fn record(&self, addr: Ipv4Addr) -> bool {
        self.record_if(addr, || true)
    }

    pub fn remove(&self, addr: Ipv4Addr) -> bool {
        self.lock().remove(&addr).is_some()
    }

    /// Drop every cached hit, returning how many there were.
    pub fn clear(&self) -> usize {
        let mut hits = self.lock();
        let count = hits.len();
        hits.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Cached hits sorted by address.
    pub fn snapshot(&self) -> Vec<(Ipv4Addr, DateTime<Local>)> {
        let mut hits: Vec<_> = self.lock().iter().map(|(a, t)| (*a, *t)).collect();
        hits.sort_by_key(|(a, _)| *a);
        hits
    }
}

//! Network registry.
//!
//! Owns the registered entries behind a single exclusive lock. Entries keep
//! insertion order; removal retains the order of the survivors.

use crate::models::NetworkEntry;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What the registry holds for a query address, taken under one lock.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    /// A /32 entry equals the query address.
    HostRoute,
    /// No host route; the non-host entries to scan, in registry order.
    Networks(Vec<NetworkEntry>),
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<Vec<NetworkEntry>>,
    /// Bumped on every removal that changes the entry list.
    generation: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    // Entries are immutable values, a poisoned lock still guards a consistent list.
    fn lock(&self) -> MutexGuard<'_, Vec<NetworkEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `entry` unless an identical one exists. Returns `true` if added.
    pub fn insert(&self, entry: NetworkEntry) -> bool {
        let mut entries = self.lock();
        if entries.contains(&entry) {
            return false;
        }
        entries.push(entry);
        true
    }

    pub fn contains(&self, entry: &NetworkEntry) -> bool {
        self.lock().contains(entry)
    }

    /// Remove every entry whose address is `addr`, whatever its netmask.
    /// Returns the number of entries removed.
    pub fn remove_address(&self, addr: Ipv4Addr) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.address() != addr);
        let removed = before - entries.len();
        if removed > 0 {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        removed
    }

    /// Check for a host route to `addr`, otherwise copy out the networks to scan.
    pub fn lookup(&self, addr: Ipv4Addr) -> (Lookup, u64) {
        let entries = self.lock();
        let generation = self.generation.load(Ordering::SeqCst);
        if entries.iter().any(|e| e.is_host() && e.address() == addr) {
            return (Lookup::HostRoute, generation);
        }
        let networks = entries.iter().filter(|e| !e.is_host()).copied().collect();
        (Lookup::Networks(networks), generation)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<NetworkEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

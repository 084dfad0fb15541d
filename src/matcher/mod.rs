//! IPv4 membership matcher.
//!
//! - [`registry`] - Registered (address, netmask) entries
//! - [`cache`] - Positive match results
//!
//! The registry and cache sit behind separate locks that are never held at
//! the same time.

mod cache;
mod registry;

pub use cache::MatchCache;
pub use registry::{Lookup, Registry};

use crate::config::{CacheInvalidation, MatcherConfig};
use crate::error::MatcherError;
use crate::models::{parse_ipv4, EntryMatch, NetworkEntry};
use chrono::{DateTime, Local};
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Receives one formatted line per matcher event.
pub type Logger = Arc<dyn Fn(&str) + Send + Sync>;

/// Logger target used by [`default_logger`].
pub const EVENT_TARGET: &str = "ipv4_matcher::events";

/// Forwards event lines to `log::debug!`.
pub fn default_logger() -> Logger {
    Arc::new(|line: &str| log::debug!(target: EVENT_TARGET, "{line}"))
}

/// Answers whether an address falls inside any registered network.
///
/// `Matcher` is `Send + Sync`; share it between threads with an `Arc`.
///
/// # Examples
/// ```
/// use ipv4_matcher::Matcher;
///
/// let matcher = Matcher::new();
/// matcher.add("192.168.1.55", "255.255.255.0").unwrap();
/// assert!(matcher.match_exists("192.168.1.200").unwrap());
/// assert!(!matcher.match_exists("192.168.2.1").unwrap());
/// assert_eq!(matcher.all(), vec!["192.168.1.0/255.255.255.0"]);
/// ```
pub struct Matcher {
    registry: Registry,
    cache: MatchCache,
    invalidation: CacheInvalidation,
    logger: Logger,
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher::new()
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .field("invalidation", &self.invalidation)
            .finish_non_exhaustive()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Matcher {
            registry: Registry::new(),
            cache: MatchCache::new(),
            invalidation: CacheInvalidation::default(),
            logger: default_logger(),
        }
    }

    /// Build a matcher with the configured policy and seed networks.
    pub fn from_config(config: &MatcherConfig) -> Result<Self, MatcherError> {
        let matcher = Matcher::new().with_invalidation(config.cache_invalidation);
        for network in &config.networks {
            let entry: NetworkEntry = network.parse()?;
            matcher.insert(entry);
        }
        log::info!(
            "Matcher ready with {} network(s), cache invalidation {:?}",
            matcher.len(),
            matcher.invalidation
        );
        Ok(matcher)
    }

    /// Replace the event callback.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_invalidation(mut self, invalidation: CacheInvalidation) -> Self {
        self.invalidation = invalidation;
        self
    }

    pub fn invalidation(&self) -> CacheInvalidation {
        self.invalidation
    }

    fn log(&self, line: &str) {
        (self.logger)(line);
    }

    /// Register a network. The address is normalized against the netmask, so
    /// `192.168.1.55/255.255.255.0` is stored as `192.168.1.0/255.255.255.0`.
    /// Adding an existing entry is a no-op.
    pub fn add(&self, address: &str, netmask: &str) -> Result<(), MatcherError> {
        let entry = NetworkEntry::parse(address, netmask)?;
        self.insert(entry);
        Ok(())
    }

    fn insert(&self, entry: NetworkEntry) {
        if entry.prefix_len().is_none() {
            self.log(&format!(
                "{entry} has a non-contiguous netmask and will never match"
            ));
        }
        if self.registry.insert(entry) {
            self.log(&format!("{} {} added", entry.address(), entry.netmask()));
        } else {
            self.log(&format!(
                "{} {} already exists, not added",
                entry.address(),
                entry.netmask()
            ));
        }
    }

    /// `true` if the normalized address is a cached hit, or the exact
    /// (address, netmask) pair is registered.
    pub fn exists(&self, address: &str, netmask: &str) -> Result<bool, MatcherError> {
        let entry = NetworkEntry::parse(address, netmask)?;
        if self.cache.contains(entry.address()) {
            self.log(&format!("{} {} exists in cache", entry.address(), entry.netmask()));
            return Ok(true);
        }
        let found = self.registry.contains(&entry);
        if found {
            self.log(&format!("{} {} exists in address list", entry.address(), entry.netmask()));
        } else {
            self.log(&format!(
                "{} {} does not exist in address list",
                entry.address(),
                entry.netmask()
            ));
        }
        Ok(found)
    }

    /// Remove every entry registered with `address`, whatever its netmask, and
    /// the cached hit for `address`. Removing an unknown address is a no-op.
    ///
    /// With [`CacheInvalidation::Full`] the whole cache is cleared when any
    /// entry was removed.
    pub fn remove(&self, address: &str) -> Result<(), MatcherError> {
        let addr = parse_ipv4(address)?;

        let removed = self.registry.remove_address(addr);
        self.log(&format!("{addr} removed from address list ({removed} entries)"));

        match self.invalidation {
            CacheInvalidation::Full if removed > 0 => {
                let cleared = self.cache.clear();
                self.log(&format!("cache cleared ({cleared} entries)"));
            }
            _ => {
                if self.cache.remove(addr) {
                    self.log(&format!("{addr} removed from cache"));
                }
            }
        }
        Ok(())
    }

    /// Test whether `address` falls inside any registered network.
    ///
    /// A cached hit returns immediately. A /32 entry equal to the address
    /// matches without caching. Otherwise every other entry's netmask is
    /// applied to the address in registry order; the first match is cached.
    /// Entries with a non-contiguous netmask are skipped. Misses are not
    /// cached.
    pub fn match_exists(&self, address: &str) -> Result<bool, MatcherError> {
        let addr = parse_ipv4(address)?;

        if self.cache.contains(addr) {
            self.log(&format!("{addr} found in cache"));
            return Ok(true);
        }

        let (networks, generation) = match self.registry.lookup(addr) {
            (Lookup::HostRoute, _) => {
                self.log(&format!("{addr} found in address list"));
                return Ok(true);
            }
            (Lookup::Networks(networks), generation) => (networks, generation),
        };

        let mut skipped = 0;
        let matched = networks.iter().find(|entry| match entry.test(addr) {
            EntryMatch::Matched => true,
            EntryMatch::NoMatch => false,
            EntryMatch::InvalidMask => {
                skipped += 1;
                false
            }
        });
        if skipped > 0 {
            log::trace!("{addr}: skipped {skipped} entries with non-contiguous netmask");
        }

        let Some(entry) = matched else {
            self.log(&format!("{addr} does not match"));
            return Ok(false);
        };
        self.log(&format!("{addr} matched {entry} from address list"));

        // A removal since the lookup may have dropped `entry`, don't cache a stale hit.
        let added = self
            .cache
            .record_if(addr, || self.registry.generation() == generation);
        if added {
            self.log(&format!("{addr} added to cache"));
        }
        Ok(true)
    }

    /// Every registered entry as `"address/netmask"`, in insertion order.
    pub fn all(&self) -> Vec<String> {
        self.entries().iter().map(|e| e.to_string()).collect()
    }

    /// Snapshot of the registered entries, in insertion order.
    pub fn entries(&self) -> Vec<NetworkEntry> {
        self.registry.snapshot()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// When `address` was cached as a hit, if it is.
    pub fn cached_at(&self, address: &str) -> Result<Option<DateTime<Local>>, MatcherError> {
        let addr = parse_ipv4(address)?;
        Ok(self.cache.get(addr))
    }

    /// Cached hits sorted by address.
    pub fn cached(&self) -> Vec<(Ipv4Addr, DateTime<Local>)> {
        self.cache.snapshot()
    }

    pub fn clear_cache(&self) {
        let cleared = self.cache.clear();
        self.log(&format!("cache cleared ({cleared} entries)"));
    }
}

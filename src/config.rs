//! Matcher configuration.
//!
//! Read from a JSON file named by `IPV4_MATCHER_CONFIG` (a `.env` file in the
//! working directory is honoured), with `IPV4_MATCHER_CACHE_INVALIDATION`
//! overriding the cache policy.
//!
//! ```json
//! {
//!   "cache_invalidation": "full",
//!   "networks": ["10.0.0.0/255.0.0.0", "192.168.1.0/24"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use std::str::FromStr;

pub const CONFIG_ENV: &str = "IPV4_MATCHER_CONFIG";
pub const CACHE_INVALIDATION_ENV: &str = "IPV4_MATCHER_CACHE_INVALIDATION";

/// Which cached hits a `remove` drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheInvalidation {
    /// Clear the whole cache whenever a removal changes the registry.
    #[default]
    Full,
    /// Only drop the cache key equal to the removed address. Hosts that
    /// matched through the removed network stay cached.
    AddressOnly,
}

impl FromStr for CacheInvalidation {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(CacheInvalidation::Full),
            "address_only" | "address-only" => Ok(CacheInvalidation::AddressOnly),
            other => Err(format!("Unknown cache invalidation policy: {other}").into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub cache_invalidation: CacheInvalidation,
    /// Seed entries as `"address/netmask"` or `"address/prefix"`.
    pub networks: Vec<String>,
}

impl MatcherConfig {
    /// Load a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading config file {}: {e}", path.display()))?;
        let config: MatcherConfig = serde_json::from_str(&json)
            .map_err(|e| format!("Error parsing config file {}: {e}", path.display()))?;
        log::info!(
            "Loaded config from {}: {} seed network(s)",
            path.display(),
            config.networks.len()
        );
        Ok(config)
    }

    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        dotenv::dotenv().ok();
        Self::from_vars(
            std::env::var(CONFIG_ENV).ok(),
            std::env::var(CACHE_INVALIDATION_ENV).ok(),
        )
    }

    /// Resolve the configuration from an optional file path and policy override.
    pub fn from_vars(
        config_file: Option<String>,
        cache_invalidation: Option<String>,
    ) -> Result<Self, Box<dyn Error>> {
        let mut config = match config_file {
            Some(file) => MatcherConfig::from_file(file)?,
            None => {
                log::debug!("{CONFIG_ENV} not set, using default config");
                MatcherConfig::default()
            }
        };
        if let Some(policy) = cache_invalidation {
            config.cache_invalidation = policy.parse()?;
            log::debug!("Cache invalidation set to {:?}", config.cache_invalidation);
        }
        Ok(config)
    }
}

//! In-memory IPv4 network membership matcher.
//!
//! Register (address, netmask) pairs with [`Matcher::add`] and test addresses
//! with [`Matcher::match_exists`]. Positive network matches are cached.

pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;

pub use config::{CacheInvalidation, MatcherConfig};
pub use error::MatcherError;
pub use matcher::{default_logger, Logger, Matcher};
pub use models::NetworkEntry;

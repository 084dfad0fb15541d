//! Registered network entry.

use super::ipv4::{apply_subnet_mask, mask_to_prefix, parse_ipv4, prefix_to_mask, HOST_MASK};
use crate::error::MatcherError;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An (address, netmask) pair held by the registry.
///
/// The address is normalized to its network base when the netmask is
/// contiguous. Entries with a non-contiguous netmask keep the address as
/// given and never match a query.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NetworkEntry {
    address: Ipv4Addr,
    netmask: Ipv4Addr,
}

/// Outcome of testing one entry against a query address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryMatch {
    Matched,
    NoMatch,
    /// Netmask is non-contiguous; the entry can never match.
    InvalidMask,
}

impl NetworkEntry {
    /// Build an entry, zeroing host bits of `address` against `netmask`.
    pub fn new(address: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        let address = apply_subnet_mask(address, netmask).unwrap_or(address);
        NetworkEntry { address, netmask }
    }

    /// Parse and normalize an entry from separate address and netmask strings.
    pub fn parse(address: &str, netmask: &str) -> Result<Self, MatcherError> {
        let address = parse_ipv4(address)?;
        let netmask = parse_ipv4(netmask)?;
        Ok(NetworkEntry::new(address, netmask))
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn netmask(&self) -> Ipv4Addr {
        self.netmask
    }

    /// `true` for a /32 route.
    pub fn is_host(&self) -> bool {
        self.netmask == HOST_MASK
    }

    /// Prefix length, or `None` when the netmask is non-contiguous.
    pub fn prefix_len(&self) -> Option<u8> {
        mask_to_prefix(self.netmask).ok()
    }

    /// Test `addr` against this entry by masking it with the entry's netmask.
    pub fn test(&self, addr: Ipv4Addr) -> EntryMatch {
        match apply_subnet_mask(addr, self.netmask) {
            Ok(masked) if masked == self.address => EntryMatch::Matched,
            Ok(_) => EntryMatch::NoMatch,
            Err(_) => EntryMatch::InvalidMask,
        }
    }

    /// `true` if `addr` falls inside this network.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.test(addr) == EntryMatch::Matched
    }
}

impl std::fmt::Display for NetworkEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.netmask)
    }
}

/// Parses `"address/netmask"` or `"address/prefix"`, e.g. `"10.0.0.0/255.0.0.0"`
/// or `"10.0.0.0/8"`.
impl FromStr for NetworkEntry {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, mask) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| MatcherError::invalid_address(s))?;
        let address = parse_ipv4(address)?;
        let netmask = if mask.contains('.') {
            parse_ipv4(mask)?
        } else {
            let len: u8 = mask
                .trim()
                .parse()
                .map_err(|_| MatcherError::invalid_address(s))?;
            prefix_to_mask(len).map_err(|_| MatcherError::invalid_address(s))?
        };
        Ok(NetworkEntry::new(address, netmask))
    }
}

impl Serialize for NetworkEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NetworkEntry {
    fn deserialize<D>(deserializer: D) -> Result<NetworkEntry, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NetworkEntry::from_str(&s).map_err(de::Error::custom)
    }
}

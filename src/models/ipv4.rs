//! IPv4 address and netmask utilities.
//!
//! Parses dotted-quad input into canonical [`Ipv4Addr`] values and provides
//! the byte-wise mask checks used by the matcher.

use crate::error::MatcherError;
use std::error::Error;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Netmask of an exact-host route.
pub const HOST_MASK: Ipv4Addr = Ipv4Addr::BROADCAST;

/// Byte values with 1..=8 leading one bits followed by zeros.
const CONTIGUOUS_PATTERNS: [u8; 8] = [0x80, 0xC0, 0xE0, 0xF0, 0xF8, 0xFC, 0xFE, 0xFF];

/// The mask could not be applied because its one bits are not contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("non-contiguous netmask {0}")]
pub struct NonContiguousMask(pub Ipv4Addr);

/// Parse a dotted-quad string into an [`Ipv4Addr`].
///
/// Surrounding whitespace is ignored. Octets with leading zeros, out of range
/// values and empty input are rejected, so the `Display` form of the result is
/// the canonical string for the address.
///
/// # Examples
/// ```
/// use ipv4_matcher::models::parse_ipv4;
/// assert_eq!(parse_ipv4(" 10.1.2.3 ").unwrap().to_string(), "10.1.2.3");
/// assert!(parse_ipv4("10.1.2").is_err());
/// ```
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr, MatcherError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MatcherError::invalid_address(input));
    }
    trimmed
        .parse::<Ipv4Addr>()
        .map_err(|_| MatcherError::invalid_address(input))
}

/// Check that a mask is some run of leading one bits followed only by zeros.
///
/// Bytes are scanned left to right. `0xFF` continues the scan; `0x00` or a
/// partial pattern such as `0xF0` ends the ones region, after which every
/// remaining byte must be `0x00`. Any other byte value fails immediately.
pub fn verify_contiguous_mask(mask: [u8; 4]) -> bool {
    let mut bytes = mask.iter();
    for byte in bytes.by_ref() {
        match *byte {
            0xFF => continue,
            0x00 => break,
            b if CONTIGUOUS_PATTERNS.contains(&b) => break,
            _ => return false,
        }
    }
    bytes.all(|b| *b == 0x00)
}

/// Bitwise AND of `addr` and `mask`, byte by byte.
///
/// Returns [`NonContiguousMask`] instead of a masked value when the mask fails
/// [`verify_contiguous_mask`], so "not applicable" stays distinct from an
/// address that masks to `0.0.0.0`.
pub fn apply_subnet_mask(addr: Ipv4Addr, mask: Ipv4Addr) -> Result<Ipv4Addr, NonContiguousMask> {
    let mask_bytes = mask.octets();
    if !verify_contiguous_mask(mask_bytes) {
        return Err(NonContiguousMask(mask));
    }
    let mut masked = addr.octets();
    for (byte, m) in masked.iter_mut().zip(mask_bytes.iter()) {
        *byte &= m;
    }
    Ok(Ipv4Addr::from(masked))
}

/// Prefix length of a contiguous mask, e.g. `255.255.254.0` -> 23.
pub fn mask_to_prefix(mask: Ipv4Addr) -> Result<u8, NonContiguousMask> {
    if !verify_contiguous_mask(mask.octets()) {
        return Err(NonContiguousMask(mask));
    }
    Ok(u32::from(mask).leading_ones() as u8)
}

/// Convert a CIDR prefix length to a netmask.
///
/// # Examples
/// ```
/// use ipv4_matcher::models::prefix_to_mask;
/// use std::net::Ipv4Addr;
/// assert_eq!(prefix_to_mask(24).unwrap(), Ipv4Addr::new(255, 255, 255, 0));
/// ```
pub fn prefix_to_mask(len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(Ipv4Addr::from(mask as u32))
    }
}

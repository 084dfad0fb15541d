//! Domain models for the matcher.
//!
//! - [`parse_ipv4`] and the netmask helpers - canonical parsing and byte-wise masking
//! - [`NetworkEntry`] - a registered (address, netmask) pair

mod ipv4;
mod network;

// Re-export public types
pub use ipv4::{
    apply_subnet_mask, mask_to_prefix, parse_ipv4, prefix_to_mask, verify_contiguous_mask,
    NonContiguousMask, HOST_MASK, MAX_LENGTH,
};
pub use network::{EntryMatch, NetworkEntry};

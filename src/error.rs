//! Error types returned by the matcher.

use thiserror::Error;

/// Failure raised by the public matcher operations.
///
/// Invalid (non-contiguous) netmasks are not an error at this boundary: an
/// entry carrying one is accepted and simply never matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatcherError {
    /// Input is empty or not a well-formed IPv4 dotted-quad.
    #[error("invalid IPv4 address: '{input}'")]
    InvalidAddress { input: String },
}

impl MatcherError {
    pub fn invalid_address(input: &str) -> Self {
        MatcherError::InvalidAddress {
            input: input.to_string(),
        }
    }
}

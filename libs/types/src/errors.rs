//! Error types for value parsing

use thiserror::Error;

/// Failure to parse an [`Address`](crate::address::Address) from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: expected 40 hex digits, got {len}")]
    InvalidLength { len: usize },

    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_error_display() {
        let err = AddressError::InvalidLength { len: 12 };
        assert_eq!(
            err.to_string(),
            "Invalid address length: expected 40 hex digits, got 12"
        );
    }
}

//! Address validation and EIP-55 checksum normalization.
//!
//! All-lowercase and all-uppercase hex is accepted as unchecksummed input.
//! Mixed-case input must match its EIP-55 checksum exactly.

use alloy::primitives::Address;

use crate::error::{TransferError, TransferResult};

/// Parse and validate a user-supplied address string.
pub fn parse_address(input: &str) -> TransferResult<Address> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex_part.len() != 40 {
        return Err(TransferError::InvalidAddress(format!(
            "'{trimmed}' must be 20 bytes (40 hex characters), got {} characters",
            hex_part.len()
        )));
    }
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TransferError::InvalidAddress(format!(
            "'{trimmed}' contains non-hex characters"
        )));
    }

    let address: Address = hex_part
        .parse()
        .map_err(|e| TransferError::InvalidAddress(format!("'{trimmed}': {e}")))?;

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = address.to_checksum(None);
        if checksummed[2..] != *hex_part {
            return Err(TransferError::InvalidAddress(format!(
                "'{trimmed}' has an invalid checksum (expected {checksummed})"
            )));
        }
    }

    Ok(address)
}

/// Canonical checksummed rendering.
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}

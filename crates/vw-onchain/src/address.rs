use ethers::{types::Address, utils::to_checksum};

use crate::error::ChainError;

/// Parse a 20-byte hex address, with or without the `0x` prefix.
///
/// All-lowercase and all-uppercase inputs are accepted as is; mixed-case
/// input must already carry a valid EIP-55 checksum.
pub fn parse_address(address: &str) -> Result<Address, ChainError> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidAddress(address.to_string()));
    }

    let parsed: Address = digits
        .parse()
        .map_err(|_| ChainError::InvalidAddress(address.to_string()))?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&parsed, None)[2..] != *digits {
        return Err(ChainError::InvalidAddress(address.to_string()));
    }

    Ok(parsed)
}

/// Validate an EVM address and return its EIP-55 checksummed form.
pub fn normalize_address(address: &str) -> Result<String, ChainError> {
    parse_address(address).map(|parsed| to_checksum(&parsed, None))
}

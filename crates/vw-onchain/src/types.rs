use ethers::types::U256;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use crate::{error::ChainError, units::format_units};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TokenMetadata {
    /// Checksummed token address
    pub address: String,
    pub decimals: u8,
    pub symbol: Option<String>,
    pub name: Option<String>,
}

/// An on-chain amount with its human readable forms.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TokenAmount {
    #[serde(serialize_with = "serialize_decimal_string")]
    #[schema(value_type = String, example = "1500000")]
    pub raw: U256,
    pub decimals: u8,
    pub formatted: String,
    pub value: f64,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Result<Self, ChainError> {
        let formatted = format_units(raw, decimals)?;
        let value = formatted
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);

        Ok(Self {
            raw,
            decimals,
            formatted,
            value,
        })
    }
}

// `U256` serializes as a hex quantity by default
fn serialize_decimal_string<S: Serializer>(raw: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(raw)
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TokenBalance {
    pub token: TokenMetadata,
    pub wallet: String,
    pub amount: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VaultShare {
    pub token: TokenMetadata,
    pub amount: TokenAmount,
}

/// A wallet's holding in an ERC-4626 vault, in shares and in underlying assets.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VaultPosition {
    pub vault_address: String,
    pub wallet: String,
    pub share: VaultShare,
    pub underlying: TokenBalance,
}

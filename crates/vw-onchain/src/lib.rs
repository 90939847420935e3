pub mod address;
pub mod client;
mod contracts;
pub mod error;
pub mod reader;
pub mod types;
pub mod units;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use address::{normalize_address, parse_address};
pub use client::{EthersVaultClient, RpcEndpoint, RpcEndpoints, VaultContractClient};
pub use error::ChainError;
pub use reader::PositionReader;
pub use types::{TokenAmount, TokenBalance, TokenMetadata, VaultPosition, VaultShare};
pub use units::{format_units, to_usd_value};

use std::str::FromStr;

use vaultwatch_onchain::{PositionReader, normalize_address, to_usd_value};
use vaultwatch_types::{BASE_NETWORK_NAME, VaultKey, VaultSummary};

use crate::{dto::WalletVault, errors::ApiError};

pub fn parse_network(network: &str) -> Result<&'static str, ApiError> {
    if network.eq_ignore_ascii_case(BASE_NETWORK_NAME) {
        Ok(BASE_NETWORK_NAME)
    } else {
        Err(ApiError::BadRequest("Unsupported network".to_string()))
    }
}

/// Validate an address and return its checksummed form.
pub fn parse_address(address: &str) -> Result<String, ApiError> {
    normalize_address(address.trim()).map_err(|_| ApiError::BadRequest("Invalid address".to_string()))
}

pub fn parse_vault_key(platform_key: &str) -> Result<VaultKey, ApiError> {
    VaultKey::from_str(platform_key.trim())
        .map_err(|_| ApiError::BadRequest("Invalid platformKey".to_string()))
}

/// The requested wallet, or the configured default one.
pub fn resolve_wallet(requested: Option<&str>, default: Option<&str>) -> Result<String, ApiError> {
    let wallet = requested
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .or_else(|| default.map(str::trim).filter(|w| !w.is_empty()))
        .ok_or_else(|| {
            ApiError::BadRequest(
                "Wallet address required (set DEFAULT_WALLET or use ?wallet=...)".to_string(),
            )
        })?;
    parse_address(wallet)
}

/// Read the wallet's position in every given vault.
///
/// A vault whose position cannot be read is reported with a zero balance and no position.
pub async fn read_wallet_positions(
    positions: &PositionReader,
    wallet: &str,
    summaries: &[VaultSummary],
) -> Vec<WalletVault> {
    futures::future::join_all(summaries.iter().map(|summary| async move {
        let (balance_usd, position) = match positions.vault_position(wallet, &summary.address).await
        {
            Ok(position) => (
                to_usd_value(&position.underlying.amount, summary.asset.price_usd),
                Some(position),
            ),
            Err(e) => {
                tracing::warn!(
                    vault = %summary.key,
                    wallet,
                    error = %e,
                    "Failed to read vault position"
                );
                (0.0, None)
            }
        };

        WalletVault {
            key: summary.key,
            name: summary.name.clone(),
            address: summary.address.clone(),
            balance_usd,
            position,
        }
    }))
    .await
}

use std::sync::Arc;

use ethers::{
    types::{Address, U256},
    utils::to_checksum,
};
use moka::future::Cache;

use crate::{
    address::parse_address,
    client::VaultContractClient,
    error::ChainError,
    types::{TokenAmount, TokenBalance, TokenMetadata, VaultPosition, VaultShare},
};

const DEFAULT_DECIMALS: u8 = 18;

/// Reads wallet positions, caching token metadata and vault assets for the process lifetime.
pub struct PositionReader {
    client: Arc<dyn VaultContractClient>,
    metadata: Cache<Address, TokenMetadata>,
    assets: Cache<Address, Address>,
}

impl PositionReader {
    pub fn new(client: Arc<dyn VaultContractClient>) -> Self {
        Self {
            client,
            metadata: Cache::builder().build(),
            assets: Cache::builder().build(),
        }
    }

    /// Decimals fall back to 18, symbol and name to `None`, when the token does not answer.
    pub async fn token_metadata(&self, token: &str) -> Result<TokenMetadata, ChainError> {
        let token = parse_address(token)?;
        Ok(self.metadata_for(token).await)
    }

    async fn metadata_for(&self, token: Address) -> TokenMetadata {
        self.metadata
            .get_with(token, async {
                let (decimals, symbol, name) = futures::join!(
                    self.client.decimals(token),
                    self.client.symbol(token),
                    self.client.name(token),
                );

                let address = to_checksum(&token, None);
                if let Err(e) = &decimals {
                    tracing::debug!(token = %address, error = %e, "decimals() failed, assuming 18");
                }

                TokenMetadata {
                    address,
                    decimals: decimals.unwrap_or(DEFAULT_DECIMALS),
                    symbol: symbol.ok(),
                    name: name.ok(),
                }
            })
            .await
    }

    /// Underlying asset of an ERC-4626 vault, checksummed. Failed lookups are not cached.
    pub async fn vault_asset(&self, vault: &str) -> Result<String, ChainError> {
        let vault = parse_address(vault)?;
        let asset = self.asset_for(vault).await?;
        Ok(to_checksum(&asset, None))
    }

    async fn asset_for(&self, vault: Address) -> Result<Address, ChainError> {
        self.assets
            .try_get_with(vault, self.client.asset(vault))
            .await
            .map_err(ChainError::from_shared)
    }

    pub async fn vault_position(
        &self,
        wallet: &str,
        vault: &str,
    ) -> Result<VaultPosition, ChainError> {
        let wallet = parse_address(wallet)?;
        let vault = parse_address(vault)?;

        let (share_metadata, raw_shares, asset) = futures::try_join!(
            async { Ok::<_, ChainError>(self.metadata_for(vault).await) },
            self.client.balance_of(vault, wallet),
            self.asset_for(vault),
        )?;

        let (asset_metadata, raw_assets) = futures::try_join!(
            async { Ok::<_, ChainError>(self.metadata_for(asset).await) },
            async {
                if raw_shares.is_zero() {
                    Ok(U256::zero())
                } else {
                    self.client.convert_to_assets(vault, raw_shares).await
                }
            },
        )?;

        let wallet = to_checksum(&wallet, None);

        Ok(VaultPosition {
            vault_address: to_checksum(&vault, None),
            share: VaultShare {
                amount: TokenAmount::new(raw_shares, share_metadata.decimals)?,
                token: share_metadata,
            },
            underlying: TokenBalance {
                amount: TokenAmount::new(raw_assets, asset_metadata.decimals)?,
                token: asset_metadata,
                wallet: wallet.clone(),
            },
            wallet,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testing::MockVaultContracts;

    const WALLET: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
    const VAULT: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";
    const USDC: &str = "0xdbf03b407c01e7cd3cbea99509d93f8dddc8c6fb";

    fn contracts() -> Arc<MockVaultContracts> {
        let contracts = MockVaultContracts::default();
        contracts.add_token(USDC, 6, "USDC");
        contracts.add_vault(VAULT, USDC, 18, "gtUSDa");
        Arc::new(contracts)
    }

    #[tokio::test]
    async fn test_position_converts_shares_to_assets() {
        let contracts = contracts();
        contracts.set_balance(VAULT, WALLET, 2_000_000_000_000_000_000);
        contracts.set_share_price(VAULT, 1_050_000, 1_000_000_000_000_000_000);
        let reader = PositionReader::new(contracts.clone());

        let position = reader.vault_position(WALLET, VAULT).await.unwrap();

        assert_eq!(position.wallet, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(position.vault_address, "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
        assert_eq!(position.share.amount.formatted, "2.0");
        assert_eq!(position.underlying.token.symbol.as_deref(), Some("USDC"));
        assert_eq!(position.underlying.amount.raw, U256::from(2_100_000u64));
        assert!((position.underlying.amount.value - 2.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_zero_shares_skip_conversion() {
        let contracts = contracts();
        let reader = PositionReader::new(contracts.clone());

        let position = reader.vault_position(WALLET, VAULT).await.unwrap();

        assert_eq!(position.underlying.amount.value, 0.0);
        assert_eq!(contracts.convert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_metadata_defaults_and_caching() {
        let contracts = Arc::new(MockVaultContracts::default());
        let reader = PositionReader::new(contracts.clone());

        let metadata = reader.token_metadata(USDC).await.unwrap();
        assert_eq!(metadata.decimals, 18);
        assert_eq!(metadata.symbol, None);

        reader.token_metadata(&USDC.to_uppercase().replace("0X", "0x")).await.unwrap();
        assert_eq!(contracts.metadata_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_vault_asset_is_checksummed_and_cached() {
        let contracts = contracts();
        let reader = PositionReader::new(contracts.clone());

        let asset = reader.vault_asset(VAULT).await.unwrap();
        assert_eq!(asset, "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB");

        reader.vault_asset(VAULT).await.unwrap();
        assert_eq!(contracts.asset_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_vault_asset_is_not_cached() {
        let contracts = Arc::new(MockVaultContracts::default());
        let reader = PositionReader::new(contracts.clone());

        assert!(matches!(
            reader.vault_asset(VAULT).await,
            Err(ChainError::Reverted)
        ));
        assert!(reader.vault_asset(VAULT).await.is_err());
        assert_eq!(contracts.asset_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_balance_failure_propagates() {
        let contracts = contracts();
        contracts.fail_balance_reads(VAULT);
        let reader = PositionReader::new(contracts);

        assert!(reader.vault_position(WALLET, VAULT).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_wallet_is_rejected() {
        let reader = PositionReader::new(contracts());
        assert!(matches!(
            reader.vault_position("0x1234", VAULT).await,
            Err(ChainError::InvalidAddress(_))
        ));
    }
}

//! In-memory vault data provider for tests.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use vaultwatch_types::HistoryQuery;

use crate::{
    clients::vaultsfyi::types::{
        DetailedVault, HistoricalPoint, NetworkInfo, ProtocolInfo, ProviderApy,
        ProviderApyBreakdown, ProviderAsset, TvlInfo, VaultHistoryResponse, VaultListResponse,
    },
    error::MasterApiError,
    traits::VaultDataProvider,
};

#[derive(Default)]
pub struct StaticVaultProvider {
    vaults: Mutex<Vec<DetailedVault>>,
    history: Mutex<Vec<HistoricalPoint>>,
    failing: AtomicBool,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
}

impl StaticVaultProvider {
    pub fn new(vaults: Vec<DetailedVault>) -> Self {
        Self {
            vaults: Mutex::new(vaults),
            ..Default::default()
        }
    }

    pub fn with_history(self, points: Vec<HistoricalPoint>) -> Self {
        *self.history.lock().unwrap() = points;
        self
    }

    pub fn set_vaults(&self, vaults: Vec<DetailedVault>) {
        *self.vaults.lock().unwrap() = vaults;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_failing(&self) -> Result<(), MasterApiError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MasterApiError::UpstreamStatus {
                status: 503,
                url: "static://provider".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl VaultDataProvider for StaticVaultProvider {
    async fn list_vaults(
        &self,
        network: &str,
        _per_page: u32,
    ) -> Result<VaultListResponse, MasterApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let data = self
            .vaults
            .lock()
            .unwrap()
            .iter()
            .filter(|vault| vault.network.name == network)
            .cloned()
            .collect();
        Ok(VaultListResponse {
            data,
            next_page: None,
        })
    }

    async fn vault_detail(
        &self,
        network: &str,
        address: &str,
    ) -> Result<DetailedVault, MasterApiError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        self.vaults
            .lock()
            .unwrap()
            .iter()
            .find(|vault| {
                vault.network.name == network && vault.address.eq_ignore_ascii_case(address)
            })
            .cloned()
            .ok_or_else(|| MasterApiError::NotFound(format!("{network}/{address}")))
    }

    async fn vault_history(
        &self,
        _network: &str,
        _address: &str,
        _query: &HistoryQuery,
    ) -> Result<VaultHistoryResponse, MasterApiError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        Ok(VaultHistoryResponse {
            data: self.history.lock().unwrap().clone(),
            next_page: None,
        })
    }
}

/// A base-network vault holding USDC priced at one dollar.
pub fn sample_vault(name: &str, address: &str, apy_1d_total: f64, tvl_usd: f64) -> DetailedVault {
    let apy = ProviderApyBreakdown {
        base: apy_1d_total,
        reward: 0.0,
        total: apy_1d_total,
    };

    DetailedVault {
        address: address.to_string(),
        network: NetworkInfo {
            name: "base".to_string(),
            chain_id: Some(8453),
        },
        name: name.to_string(),
        protocol: ProtocolInfo {
            name: "morpho".to_string(),
        },
        asset: ProviderAsset {
            address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            decimals: 6,
            asset_price_in_usd: Some(1.0),
            asset_logo: None,
        },
        tvl: TvlInfo {
            usd: tvl_usd,
            native: tvl_usd,
        },
        apy: ProviderApy {
            one_day: apy,
            seven_days: apy,
            thirty_days: apy,
        },
        rewards: None,
        holders_data: None,
        lp_token: None,
    }
}

pub fn sample_history_point(timestamp: i64, apy_total: f64) -> HistoricalPoint {
    HistoricalPoint {
        timestamp,
        block_number: "1".to_string(),
        apy: ProviderApyBreakdown {
            base: apy_total,
            reward: 0.0,
            total: apy_total,
        },
        tvl: TvlInfo {
            usd: 1_000.0,
            native: 1_000.0,
        },
        share_price: 1.0,
    }
}

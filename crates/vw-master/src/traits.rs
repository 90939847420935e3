use vaultwatch_types::HistoryQuery;

use crate::{
    clients::vaultsfyi::types::{DetailedVault, VaultHistoryResponse, VaultListResponse},
    error::MasterApiError,
};

/// Read access to the third-party vault data API.
#[async_trait::async_trait]
pub trait VaultDataProvider: Send + Sync {
    async fn list_vaults(
        &self,
        network: &str,
        per_page: u32,
    ) -> Result<VaultListResponse, MasterApiError>;

    async fn vault_detail(
        &self,
        network: &str,
        address: &str,
    ) -> Result<DetailedVault, MasterApiError>;

    async fn vault_history(
        &self,
        network: &str,
        address: &str,
        query: &HistoryQuery,
    ) -> Result<VaultHistoryResponse, MasterApiError>;
}

use serde::Serialize;
use utoipa::ToSchema;
use vaultwatch_master::DetailedVault;
use vaultwatch_types::{VaultHistory, VaultKey, VaultSummary};

/// A tracked vault, optionally with its historical series.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VaultOverview {
    #[serde(flatten)]
    pub summary: VaultSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<VaultHistory>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VaultDetailResponse {
    /// Full record from the vault data provider
    pub vault: DetailedVault,
    /// Set when the vault is one of the tracked vaults
    pub tracked_key: Option<VaultKey>,
    /// Tracked vault summary, null for untracked vaults or when not requested
    pub summary: Option<VaultSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<VaultHistory>,
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use vaultwatch_kpi::EarningsProjections;
use vaultwatch_onchain::VaultPosition;
use vaultwatch_types::{VaultKey, VaultSummary};

/// A wallet's holding in one tracked vault.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WalletVault {
    pub key: VaultKey,
    pub name: String,
    pub address: String,
    /// Zero when the position could not be read
    pub balance_usd: f64,
    pub position: Option<VaultPosition>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct WalletTotals {
    pub balance_usd: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WalletPositions {
    pub wallet: String,
    pub vaults: Vec<WalletVault>,
    pub totals: WalletTotals,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PortfolioVault {
    #[serde(flatten)]
    pub summary: VaultSummary,
    pub balance_usd: f64,
    /// Share of the wallet's total balance, between 0 and 1
    pub weight: f64,
    pub projections: EarningsProjections,
    pub position: Option<VaultPosition>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PortfolioTotals {
    pub balance_usd: f64,
    /// Balance weighted 1d APY, in percent
    pub blended_apy: f64,
    pub projections: EarningsProjections,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PortfolioSummary {
    pub wallet: String,
    pub compound_weekly: bool,
    pub generated_at: DateTime<Utc>,
    pub totals: PortfolioTotals,
    pub vaults: Vec<PortfolioVault>,
    pub snapshots_persisted: usize,
}

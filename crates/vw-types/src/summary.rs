use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::vaults::VaultKey;

/// APY split in percent points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApyBreakdown {
    pub base: f64,
    pub reward: f64,
    pub total: f64,
}

/// APY computed over the trailing 1, 7 and 30 days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApyIntervals {
    #[serde(rename = "1d")]
    pub one_day: ApyBreakdown,
    #[serde(rename = "7d")]
    pub seven_days: ApyBreakdown,
    #[serde(rename = "30d")]
    pub thirty_days: ApyBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetSummary {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub price_usd: Option<f64>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RewardSummary {
    pub asset: AssetSummary,
    pub apy: ApyIntervals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopHolder {
    pub address: String,
    pub lp_token_balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HoldersSummary {
    pub total_count: Option<u64>,
    pub total_balance: Option<f64>,
    pub top_holders: Option<Vec<TopHolder>>,
}

/// Point-in-time view of a tracked vault as reported by the vault data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VaultSummary {
    pub key: VaultKey,
    pub address: String,
    pub network: String,
    pub name: String,
    pub protocol: String,
    pub asset: AssetSummary,
    pub apy: ApyIntervals,
    pub tvl_usd: f64,
    pub tvl_native: f64,
    pub rewards: Vec<RewardSummary>,
    pub holders: Option<HoldersSummary>,
    pub lp_token: Option<AssetSummary>,
    pub fetched_at: DateTime<Utc>,
}

impl VaultSummary {
    /// Total APY over the last day, the figure every portfolio metric is based on.
    pub const fn current_apy(&self) -> f64 {
        self.apy.one_day.total
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::de;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProtocolInfo {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAsset {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(
        default,
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub asset_price_in_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LpToken {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TvlInfo {
    #[serde(deserialize_with = "de::number")]
    pub usd: f64,
    #[serde(deserialize_with = "de::number")]
    pub native: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderApyBreakdown {
    #[serde(default, deserialize_with = "de::number")]
    pub base: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub reward: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderApy {
    #[serde(rename = "1day")]
    pub one_day: ProviderApyBreakdown,
    #[serde(rename = "7day")]
    pub seven_days: ProviderApyBreakdown,
    #[serde(rename = "30day")]
    pub thirty_days: ProviderApyBreakdown,
}

/// Reward APYs are reported as a single figure per interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RewardApy {
    #[serde(rename = "1day", default, deserialize_with = "de::number")]
    pub one_day: f64,
    #[serde(rename = "7day", default, deserialize_with = "de::number")]
    pub seven_days: f64,
    #[serde(rename = "30day", default, deserialize_with = "de::number")]
    pub thirty_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderReward {
    pub asset: ProviderAsset,
    pub apy: RewardApy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTopHolder {
    pub address: String,
    #[serde(deserialize_with = "de::number")]
    pub lp_token_balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HoldersData {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default, deserialize_with = "de::optional_number")]
    pub total_balance: Option<f64>,
    #[serde(default)]
    pub top_holders: Option<Vec<ProviderTopHolder>>,
}

/// Vault record returned by the provider's list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedVault {
    pub address: String,
    pub network: NetworkInfo,
    pub name: String,
    pub protocol: ProtocolInfo,
    pub asset: ProviderAsset,
    pub tvl: TvlInfo,
    pub apy: ProviderApy,
    #[serde(default)]
    pub rewards: Option<Vec<ProviderReward>>,
    #[serde(default)]
    pub holders_data: Option<HoldersData>,
    #[serde(default)]
    pub lp_token: Option<LpToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaultListResponse {
    pub data: Vec<DetailedVault>,
    #[serde(default)]
    pub next_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    /// Seconds since epoch
    pub timestamp: i64,
    #[serde(deserialize_with = "de::string")]
    pub block_number: String,
    pub apy: ProviderApyBreakdown,
    pub tvl: TvlInfo,
    #[serde(default, deserialize_with = "de::number")]
    pub share_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaultHistoryResponse {
    pub data: Vec<HistoricalPoint>,
    #[serde(default)]
    pub next_page: Option<u32>,
}

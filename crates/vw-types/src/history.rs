use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::vaults::VaultKey;

const DEFAULT_HISTORY_PAGE: u32 = 0;
const DEFAULT_HISTORY_PER_PAGE: u32 = 200;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
)]
pub enum ApyInterval {
    #[default]
    #[serde(rename = "1day")]
    #[strum(serialize = "1day")]
    OneDay,
    #[serde(rename = "7day")]
    #[strum(serialize = "7day")]
    SevenDays,
    #[serde(rename = "30day")]
    #[strum(serialize = "30day")]
    ThirtyDays,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
)]
pub enum Granularity {
    #[serde(rename = "1hour")]
    #[strum(serialize = "1hour")]
    OneHour,
    #[default]
    #[serde(rename = "1day")]
    #[strum(serialize = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    #[strum(serialize = "1week")]
    OneWeek,
}

/// Options forwarded to the provider's historical endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub apy_interval: Option<ApyInterval>,
    pub granularity: Option<Granularity>,
    pub from_timestamp: Option<i64>,
    pub to_timestamp: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub refresh: bool,
}

impl HistoryQuery {
    /// Cache key for a vault's history under these options.
    ///
    /// Range timestamps are not part of the key.
    pub fn cache_key(&self, network: &str, address: &str) -> String {
        format!(
            "vaults:history:{network}:{address}:{}:{}:{}:{}",
            self.apy_interval.unwrap_or_default(),
            self.granularity.unwrap_or_default(),
            self.page.unwrap_or(DEFAULT_HISTORY_PAGE),
            self.per_page.unwrap_or(DEFAULT_HISTORY_PER_PAGE),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VaultHistoricalPoint {
    /// Milliseconds since epoch
    pub timestamp: i64,
    pub block_number: String,
    pub apy: crate::ApyBreakdown,
    pub tvl_usd: f64,
    pub tvl_native: f64,
    pub share_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VaultHistory {
    pub key: VaultKey,
    pub address: String,
    pub network: String,
    pub points: Vec<VaultHistoricalPoint>,
    pub next_page: Option<u32>,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_cache_key_uses_defaults() {
        let query = HistoryQuery::default();
        assert_eq!(
            query.cache_key("base", "0xabc"),
            "vaults:history:base:0xabc:1day:1day:0:200"
        );

        let query = HistoryQuery {
            apy_interval: Some(ApyInterval::ThirtyDays),
            granularity: Some(Granularity::OneHour),
            page: Some(2),
            per_page: Some(50),
            ..Default::default()
        };
        assert_eq!(
            query.cache_key("base", "0xabc"),
            "vaults:history:base:0xabc:30day:1hour:2:50"
        );
    }

    #[test]
    fn test_interval_wire_names() {
        assert_eq!(
            serde_json::to_string(&ApyInterval::SevenDays).unwrap(),
            "\"7day\""
        );
        assert_eq!(
            serde_json::from_str::<Granularity>("\"1week\"").unwrap(),
            Granularity::OneWeek
        );
    }
}

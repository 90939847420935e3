use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use vaultwatch_db::SnapshotOverrides;

/// Body of a manual snapshot write. Omitted values are taken from the live vault summary.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotRequest {
    /// Tracked vault key, e.g. `gauntlet-usd-alpha`
    pub platform_key: String,
    pub taken_at: Option<DateTime<Utc>>,
    pub apy1d: Option<f64>,
    pub apy7d: Option<f64>,
    pub apy30d: Option<f64>,
    pub tvl_usd: Option<f64>,
    pub balance_usd: Option<f64>,
    pub earnings_to_date: Option<f64>,
}

impl CreateSnapshotRequest {
    pub const fn overrides(&self) -> SnapshotOverrides {
        SnapshotOverrides {
            taken_at: self.taken_at,
            apy_1d: self.apy1d,
            apy_7d: self.apy7d,
            apy_30d: self.apy30d,
            tvl_usd: self.tvl_usd,
            balance_usd: self.balance_usd,
            earnings_to_date: self.earnings_to_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case_fields() {
        let request: CreateSnapshotRequest = serde_json::from_str(
            r#"{
                "platformKey": "gauntlet-usd-alpha",
                "takenAt": "2025-03-01T12:00:00Z",
                "apy1d": 7.5,
                "tvlUsd": 1000000,
                "earningsToDate": 12.5
            }"#,
        )
        .unwrap();

        let overrides = request.overrides();
        assert_eq!(request.platform_key, "gauntlet-usd-alpha");
        assert_eq!(overrides.apy_1d, Some(7.5));
        assert_eq!(overrides.apy_7d, None);
        assert_eq!(overrides.tvl_usd, Some(1_000_000.0));
        assert_eq!(overrides.earnings_to_date, Some(12.5));
        assert_eq!(
            overrides.taken_at.map(|t| t.to_rfc3339()),
            Some("2025-03-01T12:00:00+00:00".to_string())
        );
    }
}

use chrono::{DateTime, Utc};
use vaultwatch_types::VaultSummary;

use crate::{
    errors::DatabaseError,
    models::{NewPlatform, NewSnapshot, SnapshotWithPlatform},
    store::SnapshotStore,
};

/// Values replacing what the summary would otherwise provide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotOverrides {
    pub taken_at: Option<DateTime<Utc>>,
    pub apy_1d: Option<f64>,
    pub apy_7d: Option<f64>,
    pub apy_30d: Option<f64>,
    pub tvl_usd: Option<f64>,
    pub balance_usd: Option<f64>,
    pub earnings_to_date: Option<f64>,
}

/// Upsert the vault's platform and append a snapshot row for it.
///
/// APY and TVL come from the summary unless overridden; balance and earnings
/// stay empty unless given.
pub async fn record_snapshot_for_summary(
    store: &dyn SnapshotStore,
    summary: &VaultSummary,
    overrides: SnapshotOverrides,
) -> Result<SnapshotWithPlatform, DatabaseError> {
    let platform = store
        .upsert_platform(NewPlatform {
            key: summary.key.to_string(),
            name: summary.name.clone(),
            network: summary.network.clone(),
            vault_addr: Some(summary.address.clone()),
        })
        .await?;

    let snapshot = store
        .insert_snapshot(NewSnapshot {
            platform_id: platform.id,
            taken_at: overrides.taken_at.unwrap_or_else(Utc::now),
            apy_1d: Some(overrides.apy_1d.unwrap_or(summary.apy.one_day.total)),
            apy_7d: Some(overrides.apy_7d.unwrap_or(summary.apy.seven_days.total)),
            apy_30d: Some(overrides.apy_30d.unwrap_or(summary.apy.thirty_days.total)),
            tvl_usd: Some(overrides.tvl_usd.unwrap_or(summary.tvl_usd)),
            balance_usd: overrides.balance_usd,
            earnings_to_date: overrides.earnings_to_date,
        })
        .await?;

    tracing::debug!(
        vault = %summary.key,
        snapshot_id = snapshot.id,
        taken_at = %snapshot.taken_at,
        "Snapshot recorded"
    );

    Ok(SnapshotWithPlatform { snapshot, platform })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use vaultwatch_types::{ApyBreakdown, ApyIntervals, AssetSummary, VaultKey};

    use super::*;
    use crate::testing::MemorySnapshotStore;

    fn summary(key: VaultKey, name: &str, address: &str) -> VaultSummary {
        let apy = |total| ApyBreakdown {
            base: total,
            reward: 0.0,
            total,
        };
        VaultSummary {
            key,
            address: address.to_string(),
            network: "base".to_string(),
            name: name.to_string(),
            protocol: "morpho".to_string(),
            asset: AssetSummary {
                address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
                symbol: "USDC".to_string(),
                name: "USD Coin".to_string(),
                decimals: 6,
                price_usd: Some(1.0),
                logo_url: None,
            },
            apy: ApyIntervals {
                one_day: apy(6.5),
                seven_days: apy(6.1),
                thirty_days: apy(5.8),
            },
            tvl_usd: 12_000_000.0,
            tvl_native: 12_000_000.0,
            rewards: Vec::new(),
            holders: None,
            lp_token: None,
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_snapshot_defaults_to_summary_values() {
        let store = MemorySnapshotStore::default();
        let summary = summary(VaultKey::GauntletUsdAlpha, "Gauntlet USD Alpha", "0xabc");

        let recorded = record_snapshot_for_summary(&store, &summary, SnapshotOverrides::default())
            .await
            .unwrap();

        assert_eq!(recorded.platform.key, "gauntlet-usd-alpha");
        assert_eq!(recorded.platform.vault_addr.as_deref(), Some("0xabc"));
        assert_eq!(recorded.snapshot.apy_1d, Some(6.5));
        assert_eq!(recorded.snapshot.apy_7d, Some(6.1));
        assert_eq!(recorded.snapshot.apy_30d, Some(5.8));
        assert_eq!(recorded.snapshot.tvl_usd, Some(12_000_000.0));
        assert_eq!(recorded.snapshot.balance_usd, None);
        assert_eq!(recorded.snapshot.earnings_to_date, None);
    }

    #[tokio::test]
    async fn test_overrides_win_over_summary() {
        let store = MemorySnapshotStore::default();
        let summary = summary(VaultKey::GauntletUsdAlpha, "Gauntlet USD Alpha", "0xabc");
        let taken_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        let recorded = record_snapshot_for_summary(
            &store,
            &summary,
            SnapshotOverrides {
                taken_at: Some(taken_at),
                apy_1d: Some(7.0),
                balance_usd: Some(1_250.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(recorded.snapshot.taken_at, taken_at);
        assert_eq!(recorded.snapshot.apy_1d, Some(7.0));
        assert_eq!(recorded.snapshot.apy_7d, Some(6.1));
        assert_eq!(recorded.snapshot.balance_usd, Some(1_250.0));
    }

    #[tokio::test]
    async fn test_repeated_recording_reuses_platform() {
        let store = MemorySnapshotStore::default();
        let first = summary(VaultKey::GauntletUsdAlpha, "Gauntlet USD Alpha", "0xabc");
        let renamed = summary(VaultKey::GauntletUsdAlpha, "Gauntlet USD Alpha v2", "0xabc");

        let a = record_snapshot_for_summary(&store, &first, SnapshotOverrides::default())
            .await
            .unwrap();
        let b = record_snapshot_for_summary(&store, &renamed, SnapshotOverrides::default())
            .await
            .unwrap();

        assert_eq!(a.platform.id, b.platform.id);
        assert_eq!(b.platform.name, "Gauntlet USD Alpha v2");
        assert_eq!(store.platforms().len(), 1);
        assert_eq!(store.list_snapshots(None, 50).await.unwrap().len(), 2);
    }
}

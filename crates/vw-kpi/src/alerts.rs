use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Thresholds above which a change between the stored snapshot and the live data is reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlertThresholds {
    /// Absolute APY change, in percent points
    pub apy_delta: f64,
    /// Relative TVL drop, in percent
    pub tvl_drop: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            apy_delta: 0.5,
            tvl_drop: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ApyDelta,
    TvlDrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Medium,
    High,
}

impl AlertLevel {
    /// `High` once the observed change reaches twice the threshold.
    fn for_change(change: f64, threshold: f64) -> Self {
        if change >= threshold * 2.0 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlertMetrics {
    pub previous: f64,
    pub current: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Alert {
    pub kind: AlertKind,
    pub platform_key: String,
    pub level: AlertLevel,
    pub message: String,
    pub metrics: AlertMetrics,
    pub snapshot_taken_at: DateTime<Utc>,
}

/// The stored values an alert compares the live data against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotReading {
    pub apy_1d: Option<f64>,
    pub tvl_usd: Option<f64>,
    pub taken_at: DateTime<Utc>,
}

/// Compare a vault's live 1d APY and TVL against its most recent snapshot.
pub fn evaluate_vault_alerts(
    platform_key: &str,
    current_apy_1d: f64,
    current_tvl_usd: f64,
    latest: &SnapshotReading,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(previous_apy) = latest.apy_1d {
        let delta = (current_apy_1d - previous_apy).abs();
        if delta >= thresholds.apy_delta {
            alerts.push(Alert {
                kind: AlertKind::ApyDelta,
                platform_key: platform_key.to_string(),
                level: AlertLevel::for_change(delta, thresholds.apy_delta),
                message: format!(
                    "APY changed by {delta:.2}% (threshold {}%)",
                    thresholds.apy_delta
                ),
                metrics: AlertMetrics {
                    previous: previous_apy,
                    current: current_apy_1d,
                    change: delta,
                },
                snapshot_taken_at: latest.taken_at,
            });
        }
    }

    if let Some(previous_tvl) = latest.tvl_usd.filter(|tvl| *tvl > 0.0) {
        let drop_pct = (previous_tvl - current_tvl_usd) / previous_tvl * 100.0;
        if drop_pct >= thresholds.tvl_drop {
            alerts.push(Alert {
                kind: AlertKind::TvlDrop,
                platform_key: platform_key.to_string(),
                level: AlertLevel::for_change(drop_pct, thresholds.tvl_drop),
                message: format!(
                    "TVL dropped by {drop_pct:.2}% (threshold {}%)",
                    thresholds.tvl_drop
                ),
                metrics: AlertMetrics {
                    previous: previous_tvl,
                    current: current_tvl_usd,
                    change: drop_pct,
                },
                snapshot_taken_at: latest.taken_at,
            });
        }
    }

    alerts
}

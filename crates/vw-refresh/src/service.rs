use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;

use vaultwatch_db::{SnapshotOverrides, SnapshotStore, record_snapshot_for_summary};
use vaultwatch_master::VaultCatalog;
use vaultwatch_metrics::{CycleOutcome, RefreshMetrics};
use vaultwatch_onchain::{PositionReader, to_usd_value};
use vaultwatch_types::VaultSummary;

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub taken_at: DateTime<Utc>,
    pub recorded: usize,
    pub failed: usize,
    pub position_failures: usize,
}

struct VaultOutcome {
    recorded: bool,
    position_failed: bool,
}

/// Refreshes tracked vault data and records one snapshot per vault on a timer.
pub struct RefreshService {
    catalog: Arc<VaultCatalog>,
    positions: Arc<PositionReader>,
    store: Arc<dyn SnapshotStore>,
    wallet: Option<String>,
    interval: Duration,
    metrics: Option<Arc<RefreshMetrics>>,
}

impl RefreshService {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

    pub fn new(
        catalog: Arc<VaultCatalog>,
        positions: Arc<PositionReader>,
        store: Arc<dyn SnapshotStore>,
        wallet: Option<String>,
    ) -> Self {
        Self {
            catalog,
            positions,
            store,
            wallet: wallet.filter(|w| !w.trim().is_empty()),
            interval: Self::DEFAULT_INTERVAL,
            metrics: None,
        }
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<RefreshMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Runs a cycle right away, then once per interval. Cycle failures never stop the loop.
    pub async fn run_forever(&self) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.run_refresh_cycle().await {
                Ok(report) => {
                    self.record_cycle(CycleOutcome::Completed);
                    tracing::info!(
                        recorded = report.recorded,
                        failed = report.failed,
                        position_failures = report.position_failures,
                        "[RefreshService] ✅ Refresh cycle done"
                    );
                }
                Err(e) => {
                    self.record_cycle(CycleOutcome::Failed);
                    tracing::error!("[RefreshService] 🔴 Refresh cycle failed: {e:#}");
                }
            }
        }
    }

    pub async fn run_refresh_cycle(&self) -> Result<RefreshReport> {
        tracing::info!("[RefreshService] 🔄 Starting refresh cycle...");

        let summaries = self.catalog.refresh_tracked().await?;
        let taken_at = Utc::now();

        let outcomes = futures::future::join_all(
            summaries
                .iter()
                .map(|summary| self.refresh_vault(summary, taken_at)),
        )
        .await;

        let recorded = outcomes.iter().filter(|o| o.recorded).count();
        Ok(RefreshReport {
            taken_at,
            recorded,
            failed: outcomes.len() - recorded,
            position_failures: outcomes.iter().filter(|o| o.position_failed).count(),
        })
    }

    async fn refresh_vault(&self, summary: &VaultSummary, taken_at: DateTime<Utc>) -> VaultOutcome {
        let mut position_failed = false;

        let balance_usd = match &self.wallet {
            None => None,
            Some(wallet) => match self.positions.vault_position(wallet, &summary.address).await {
                Ok(position) => Some(to_usd_value(
                    &position.underlying.amount,
                    summary.asset.price_usd,
                )),
                Err(e) => {
                    position_failed = true;
                    if let Some(metrics) = &self.metrics {
                        metrics.record_position_read_failure(summary.key.as_ref());
                    }
                    tracing::warn!(
                        vault = %summary.key,
                        error = %e,
                        "[RefreshService] Position read failed, recording snapshot without balance"
                    );
                    None
                }
            },
        };

        let overrides = SnapshotOverrides {
            taken_at: Some(taken_at),
            balance_usd,
            ..Default::default()
        };

        match record_snapshot_for_summary(self.store.as_ref(), summary, overrides).await {
            Ok(_) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_snapshot(summary.key.as_ref());
                }
                VaultOutcome {
                    recorded: true,
                    position_failed,
                }
            }
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_snapshot_failure(summary.key.as_ref());
                }
                tracing::warn!(
                    vault = %summary.key,
                    error = %e,
                    "[RefreshService] 🔴 Failed to record snapshot"
                );
                VaultOutcome {
                    recorded: false,
                    position_failed,
                }
            }
        }
    }

    fn record_cycle(&self, outcome: CycleOutcome) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cycle(outcome);
        }
    }
}

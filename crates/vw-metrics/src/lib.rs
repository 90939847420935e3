use std::sync::Arc;

use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Debug)]
pub struct MetricsRegistry {
    pub refresh: Arc<RefreshMetrics>,
    pub provider: Arc<ProviderMetrics>,
}

impl MetricsRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            refresh: RefreshMetrics::new(),
            provider: ProviderMetrics::new(),
        })
    }
}

#[derive(Debug)]
pub struct RefreshMetrics {
    cycles: Counter<u64>,
    snapshots_recorded: Counter<u64>,
    snapshot_failures: Counter<u64>,
    position_read_failures: Counter<u64>,
}

impl RefreshMetrics {
    fn new() -> Arc<Self> {
        let meter = global::meter("vaultwatch");
        let cycles = meter
            .u64_counter("refresh_cycles_total")
            .with_description("Number of refresh cycles run, labelled by outcome")
            .with_unit("count")
            .init();

        let snapshots_recorded = meter
            .u64_counter("snapshots_recorded_total")
            .with_description("Number of snapshot rows inserted")
            .with_unit("count")
            .init();

        let snapshot_failures = meter
            .u64_counter("snapshot_failures_total")
            .with_description("Number of snapshot inserts that failed")
            .with_unit("count")
            .init();

        let position_read_failures = meter
            .u64_counter("position_read_failures_total")
            .with_description("Number of on-chain wallet position reads that failed")
            .with_unit("count")
            .init();

        Arc::new(Self {
            cycles,
            snapshots_recorded,
            snapshot_failures,
            position_read_failures,
        })
    }

    pub fn record_cycle(&self, outcome: CycleOutcome) {
        self.cycles
            .add(1, &[KeyValue::new("outcome", outcome.as_str())]);
    }

    pub fn record_snapshot(&self, vault_key: &str) {
        self.snapshots_recorded
            .add(1, &[KeyValue::new("vault_key", vault_key.to_string())]);
    }

    pub fn record_snapshot_failure(&self, vault_key: &str) {
        self.snapshot_failures
            .add(1, &[KeyValue::new("vault_key", vault_key.to_string())]);
    }

    pub fn record_position_read_failure(&self, vault_key: &str) {
        self.position_read_failures
            .add(1, &[KeyValue::new("vault_key", vault_key.to_string())]);
    }
}

#[derive(Debug)]
pub struct ProviderMetrics {
    fetches: Counter<u64>,
}

impl ProviderMetrics {
    fn new() -> Arc<Self> {
        let meter = global::meter("vaultwatch");
        let fetches = meter
            .u64_counter("provider_fetches_total")
            .with_description("Number of calls issued to the vault data provider")
            .with_unit("count")
            .init();

        Arc::new(Self { fetches })
    }

    pub fn record_fetch(&self, endpoint: &'static str, forced: bool) {
        self.fetches.add(
            1,
            &[
                KeyValue::new("endpoint", endpoint),
                KeyValue::new("forced", forced.to_string()),
            ],
        );
    }
}

#[derive(Clone, Copy, Debug)]
pub enum CycleOutcome {
    Completed,
    Failed,
}

impl CycleOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

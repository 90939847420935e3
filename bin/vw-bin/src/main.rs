mod cli;

use std::{sync::Arc, time::Duration};

use crate::cli::VaultwatchCli;
use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use pragma_common::{
    services::{Service, ServiceGroup},
    telemetry::init_telemetry,
};

use vaultwatch_api::{ApiService, AppState};
use vaultwatch_db::{PgSnapshotStore, SnapshotStore, init_pool, run_migrations};
use vaultwatch_kpi::AlertThresholds;
use vaultwatch_master::{VaultCatalog, VaultsFyiClient};
use vaultwatch_metrics::MetricsRegistry;
use vaultwatch_onchain::{EthersVaultClient, PositionReader, RpcEndpoints, normalize_address};
use vaultwatch_refresh::{RefreshService, RefreshTask};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let VaultwatchCli {
        database_url,
        otel_collector_endpoint,
        api_port,
        vaultsfyi_api_key,
        default_wallet,
        base_rpc_url,
        alchemy_api_key,
        threshold_apy_delta,
        threshold_tvl_drop,
        refresh_interval_secs,
    } = VaultwatchCli::parse();

    let app_name = "vaultwatch";
    init_telemetry(app_name, otel_collector_endpoint)
        .map_err(|e| anyhow::anyhow!("Could not init telemetry: {e}"))?;

    let metrics = MetricsRegistry::new();

    let provider = VaultsFyiClient::new(&vaultsfyi_api_key)
        .context("Could not init the vault data provider client")?;
    let catalog =
        Arc::new(VaultCatalog::new(Arc::new(provider)).with_metrics(metrics.provider.clone()));

    let endpoints = RpcEndpoints::base(alchemy_api_key.as_deref(), base_rpc_url.as_deref());
    tracing::info!(endpoints = endpoints.endpoints().len(), "Base RPC endpoints configured");
    let rpc_client =
        EthersVaultClient::new(endpoints).context("Could not init the Base RPC client")?;
    let positions = Arc::new(PositionReader::new(Arc::new(rpc_client)));

    let pool = init_pool(app_name, &database_url)?;
    run_migrations(&pool).await?;
    let store: Arc<dyn SnapshotStore> = Arc::new(PgSnapshotStore::new(pool.clone()));

    let default_wallet = default_wallet
        .filter(|wallet| !wallet.trim().is_empty())
        .map(|wallet| normalize_address(wallet.trim()))
        .transpose()
        .context("DEFAULT_WALLET is not a valid address")?;
    if default_wallet.is_none() {
        tracing::warn!("DEFAULT_WALLET not set, snapshots will be recorded without balances");
    }

    let app_state = AppState {
        catalog: catalog.clone(),
        positions: positions.clone(),
        store: store.clone(),
        default_wallet: default_wallet.clone(),
        thresholds: AlertThresholds {
            apy_delta: threshold_apy_delta,
            tvl_drop: threshold_tvl_drop,
        },
    };

    let api_service = ApiService::new(app_state, "0.0.0.0", api_port);

    let refresh_service = RefreshService::new(catalog, positions, store, default_wallet)
        .with_interval(Duration::from_secs(refresh_interval_secs.max(1)))
        .with_metrics(metrics.refresh.clone());
    let refresh_task = RefreshTask::new(Arc::new(refresh_service));

    ServiceGroup::default()
        .with_critical(api_service)
        .with_critical(refresh_task)
        .start_and_drive_to_end()
        .await?;

    pool.close();
    tracing::info!("👋 vaultwatch stopped");

    Ok(())
}

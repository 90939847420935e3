use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use futures::future::try_join_all;
use vaultwatch_db::NewPlatform;
use vaultwatch_kpi::{Alert, SnapshotReading, evaluate_vault_alerts};
use vaultwatch_types::VaultSummary;

use crate::{
    AppState,
    dto::{AlertsResponse, ApiResponse, RefreshQuery},
    errors::ApiError,
};

async fn alerts_for_vault(state: &AppState, summary: &VaultSummary) -> Result<Vec<Alert>, ApiError> {
    let platform_key = summary.key.to_string();

    state
        .store
        .upsert_platform(NewPlatform {
            key: platform_key.clone(),
            name: summary.name.clone(),
            network: summary.network.clone(),
            vault_addr: Some(summary.address.clone()),
        })
        .await?;

    let Some(latest) = state.store.latest_snapshot(&platform_key).await? else {
        return Ok(Vec::new());
    };

    Ok(evaluate_vault_alerts(
        &platform_key,
        summary.current_apy(),
        summary.tvl_usd,
        &SnapshotReading {
            apy_1d: latest.apy_1d,
            tvl_usd: latest.tvl_usd,
            taken_at: latest.taken_at,
        },
        &state.thresholds,
    ))
}

#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Alerts",
    params(RefreshQuery),
    responses(
        (status = 200, description = "Changes since the latest snapshot of each vault", body = ApiResponse<AlertsResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<RefreshQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.catalog.tracked_summaries(params.refresh).await?;

    let alerts: Vec<Alert> = try_join_all(
        summaries
            .iter()
            .map(|summary| alerts_for_vault(&state, summary)),
    )
    .await?
    .into_iter()
    .flatten()
    .collect();

    if !alerts.is_empty() {
        tracing::info!(count = alerts.len(), "Vault alerts raised");
    }

    Ok(Json(ApiResponse::ok(AlertsResponse {
        count: alerts.len(),
        alerts,
        thresholds: state.thresholds,
    })))
}

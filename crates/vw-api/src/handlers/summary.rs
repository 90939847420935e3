use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use vaultwatch_db::{SnapshotOverrides, record_snapshot_for_summary};
use vaultwatch_kpi::{
    BlendedApyInput, EarningsProjections, build_earnings_projections, calculate_blended_apy,
};

use crate::{
    AppState,
    dto::{ApiResponse, PortfolioSummary, PortfolioTotals, PortfolioVault, SummaryQuery},
    errors::ApiError,
    helpers::{read_wallet_positions, resolve_wallet},
};

/// Portfolio view of a wallet across the tracked vaults.
///
/// When `persist` is set, one snapshot per vault is recorded with the wallet balance. Failed
/// writes are logged and only reduce `snapshots_persisted`.
pub async fn build_portfolio_summary(
    state: &AppState,
    params: &SummaryQuery,
) -> Result<PortfolioSummary, ApiError> {
    let wallet = resolve_wallet(params.wallet.as_deref(), state.default_wallet.as_deref())?;
    let compound_weekly = params.compound_weekly();

    let summaries = state.catalog.tracked_summaries(params.refresh).await?;
    let holdings = read_wallet_positions(&state.positions, &wallet, &summaries).await;

    let total_balance: f64 = holdings.iter().map(|h| h.balance_usd).sum();
    let blended_apy = calculate_blended_apy(
        &summaries
            .iter()
            .zip(&holdings)
            .map(|(summary, holding)| BlendedApyInput {
                balance_usd: holding.balance_usd,
                apy_percent: summary.current_apy(),
            })
            .collect::<Vec<_>>(),
    );

    let vaults: Vec<PortfolioVault> = summaries
        .into_iter()
        .zip(holdings)
        .map(|(summary, holding)| {
            let weight = if total_balance > 0.0 {
                holding.balance_usd / total_balance
            } else {
                0.0
            };
            PortfolioVault {
                projections: build_earnings_projections(
                    holding.balance_usd,
                    summary.current_apy(),
                    compound_weekly,
                ),
                summary,
                balance_usd: holding.balance_usd,
                weight,
                position: holding.position,
            }
        })
        .collect();

    let projections: EarningsProjections = vaults.iter().map(|v| v.projections).sum();
    let generated_at = Utc::now();

    let snapshots_persisted = if params.persist {
        persist_snapshots(state, &vaults, generated_at).await
    } else {
        0
    };

    Ok(PortfolioSummary {
        wallet,
        compound_weekly,
        generated_at,
        totals: PortfolioTotals {
            balance_usd: total_balance,
            blended_apy,
            projections,
        },
        vaults,
        snapshots_persisted,
    })
}

async fn persist_snapshots(
    state: &AppState,
    vaults: &[PortfolioVault],
    taken_at: chrono::DateTime<Utc>,
) -> usize {
    let results = futures::future::join_all(vaults.iter().map(|vault| {
        let overrides = SnapshotOverrides {
            taken_at: Some(taken_at),
            balance_usd: Some(vault.balance_usd),
            ..Default::default()
        };
        record_snapshot_for_summary(state.store.as_ref(), &vault.summary, overrides)
    }))
    .await;

    results
        .iter()
        .zip(vaults)
        .filter(|(result, vault)| match result {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(vault = %vault.summary.key, error = %e, "Failed to persist summary snapshot");
                false
            }
        })
        .count()
}

#[utoipa::path(
    get,
    path = "/api/summary",
    tag = "Portfolio",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Wallet portfolio summary", body = ApiResponse<PortfolioSummary>),
        (status = 400, description = "Missing or invalid wallet"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_portfolio_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = build_portfolio_summary(&state, &params).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

#[cfg(test)]
mod tests {
    use vaultwatch_kpi::ProjectionHorizon;

    use vaultwatch_master::testing::sample_vault;

    use super::*;
    use crate::fixtures::{Fixture, GAUNTLET, into_json};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[tokio::test]
    async fn test_summary_blends_apy_by_balance() {
        let fixture = Fixture::new();

        let summary = build_portfolio_summary(&fixture.state, &SummaryQuery::default())
            .await
            .unwrap();

        assert_eq!(summary.wallet, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(close(summary.totals.balance_usd, 5_000.0));
        assert!(close(summary.totals.blended_apy, 6.0));
        assert!(close(summary.vaults[0].weight, 0.2));
        assert!(close(summary.vaults[1].weight, 0.8));

        // 1000 at 10% and 4000 at 5% earn the same over a year
        let year = summary.totals.projections.get(ProjectionHorizon::OneYear);
        assert!(close(year, 300.0), "{year}");
        for horizon in ProjectionHorizon::ALL {
            let per_vault: f64 = summary.vaults.iter().map(|v| v.projections.get(horizon)).sum();
            assert!(close(summary.totals.projections.get(horizon), per_vault));
        }
    }

    #[tokio::test]
    async fn test_summary_persists_snapshots_with_balances() {
        let fixture = Fixture::new();

        let summary = build_portfolio_summary(&fixture.state, &SummaryQuery::default())
            .await
            .unwrap();

        assert_eq!(summary.snapshots_persisted, 2);
        let mut balances: Vec<f64> = fixture
            .store
            .snapshots()
            .iter()
            .filter_map(|s| s.balance_usd)
            .collect();
        balances.sort_by(f64::total_cmp);
        assert_eq!(balances, vec![1_000.0, 4_000.0]);

        let no_persist = SummaryQuery {
            persist: false,
            ..Default::default()
        };
        let summary = build_portfolio_summary(&fixture.state, &no_persist)
            .await
            .unwrap();
        assert_eq!(summary.snapshots_persisted, 0);
        assert_eq!(fixture.store.snapshots().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_persistence_is_counted_not_fatal() {
        let fixture = Fixture::new();
        fixture.store.fail_inserts_for("gauntlet-usd-alpha");

        let summary = build_portfolio_summary(&fixture.state, &SummaryQuery::default())
            .await
            .unwrap();

        assert_eq!(summary.snapshots_persisted, 1);
    }

    #[tokio::test]
    async fn test_unreadable_position_counts_as_empty() {
        let fixture = Fixture::new();
        fixture.contracts.fail_balance_reads(GAUNTLET);

        let summary = build_portfolio_summary(&fixture.state, &SummaryQuery::default())
            .await
            .unwrap();

        assert!(summary.vaults[0].position.is_none());
        assert!(close(summary.vaults[0].balance_usd, 0.0));
        assert!(close(summary.vaults[1].weight, 1.0));
        assert!(close(summary.totals.blended_apy, 5.0));
    }

    #[tokio::test]
    async fn test_weekly_compounding_increases_projections() {
        let fixture = Fixture::new();
        let linear = build_portfolio_summary(
            &fixture.state,
            &SummaryQuery {
                persist: false,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let compounded = build_portfolio_summary(
            &fixture.state,
            &SummaryQuery {
                compound: Some("weekly".to_string()),
                persist: false,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(compounded.compound_weekly);
        assert!(
            compounded.totals.projections.get(ProjectionHorizon::OneYear)
                > linear.totals.projections.get(ProjectionHorizon::OneYear)
        );
    }

    #[tokio::test]
    async fn test_wallet_is_required() {
        let mut fixture = Fixture::new();
        fixture.state.default_wallet = None;

        let (status, body) = into_json(
            get_portfolio_summary(State(fixture.state.clone()), Query(SummaryQuery::default()))
                .await,
        )
        .await;

        assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(
            body["msg"],
            "Wallet address required (set DEFAULT_WALLET or use ?wallet=...)"
        );
        assert_eq!(
            fixture
                .provider
                .list_calls
                .load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn test_tracked_vault_missing_upstream_is_an_internal_error() {
        let fixture = Fixture::new();
        fixture.provider.set_vaults(vec![sample_vault(
            "Gauntlet USD Alpha",
            GAUNTLET,
            10.0,
            15_000_000.0,
        )]);

        let (status, body) = into_json(
            get_portfolio_summary(State(fixture.state.clone()), Query(SummaryQuery::default()))
                .await,
        )
        .await;

        assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["msg"], "Internal server error");
    }
}

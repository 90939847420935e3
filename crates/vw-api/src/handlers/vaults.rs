use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use futures::future::try_join_all;

use crate::{
    AppState,
    dto::{ApiResponse, VaultDetailQuery, VaultDetailResponse, VaultOverview, VaultsQuery},
    errors::ApiError,
    helpers::{parse_address, parse_network},
};

#[utoipa::path(
    get,
    path = "/api/vaults",
    tag = "Vaults",
    params(VaultsQuery),
    responses(
        (status = 200, description = "Tracked vault summaries", body = ApiResponse<Vec<VaultOverview>>),
        (status = 400, description = "Invalid parameters"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_vaults(
    State(state): State<AppState>,
    Query(params): Query<VaultsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.catalog.tracked_summaries(params.refresh).await?;

    let vaults = if params.history {
        let query = params.history_query();
        try_join_all(summaries.into_iter().map(|summary| {
            let query = &query;
            let catalog = &state.catalog;
            async move {
                let history = catalog.vault_history(summary.key, query).await?;
                Ok::<_, ApiError>(VaultOverview {
                    summary,
                    history: Some(history),
                })
            }
        }))
        .await?
    } else {
        summaries
            .into_iter()
            .map(|summary| VaultOverview {
                summary,
                history: None,
            })
            .collect()
    };

    Ok(Json(ApiResponse::ok(vaults)))
}

#[utoipa::path(
    get,
    path = "/api/vault/{network}/{address}",
    tag = "Vaults",
    params(
        ("network" = String, Path, description = "Network name, only `base` is supported"),
        ("address" = String, Path, description = "Vault contract address"),
        VaultDetailQuery
    ),
    responses(
        (status = 200, description = "Vault detail", body = ApiResponse<VaultDetailResponse>),
        (status = 400, description = "Unsupported network or invalid address"),
        (status = 404, description = "Vault not found, or history requested for an untracked vault"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_vault_detail(
    State(state): State<AppState>,
    Path((network, address)): Path<(String, String)>,
    Query(params): Query<VaultDetailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let network = parse_network(&network)?;
    let address = parse_address(&address)?;

    let vault = state
        .catalog
        .vault_detail(network, &address, params.refresh)
        .await?;

    let tracked_key = if params.summary || params.history {
        state
            .catalog
            .tracked_key_for_address(network, &address, params.refresh)
            .await?
    } else {
        None
    };

    let summary = match tracked_key {
        Some(key) if params.summary => Some(state.catalog.summary_by_key(key, false).await?),
        _ => None,
    };

    let history = if params.history {
        let key = tracked_key.ok_or_else(|| {
            ApiError::NotFound("History available only for tracked vaults".to_string())
        })?;
        Some(
            state
                .catalog
                .vault_history(key, &params.history_query())
                .await?,
        )
    } else {
        None
    };

    Ok(Json(ApiResponse::ok(VaultDetailResponse {
        vault: vault.as_ref().clone(),
        tracked_key,
        summary,
        history,
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use axum::http::StatusCode;

    use super::*;
    use crate::fixtures::{Fixture, GAUNTLET, UNTRACKED, into_json};

    fn detail_path(network: &str, address: &str) -> Path<(String, String)> {
        Path((network.to_string(), address.to_string()))
    }

    #[tokio::test]
    async fn test_list_returns_tracked_vaults_only() {
        let fixture = Fixture::new();

        let (status, body) = into_json(
            list_vaults(State(fixture.state.clone()), Query(VaultsQuery::default())).await,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let vaults = body["data"].as_array().unwrap();
        assert_eq!(vaults.len(), 2);
        assert_eq!(vaults[0]["key"], "gauntlet-usd-alpha");
        assert_eq!(vaults[1]["key"], "superlend-usdc-superfund");
        assert!(vaults[0].get("history").is_none());
    }

    #[tokio::test]
    async fn test_list_with_history() {
        let fixture = Fixture::new();
        let params = VaultsQuery {
            history: true,
            ..Default::default()
        };

        let (status, body) =
            into_json(list_vaults(State(fixture.state.clone()), Query(params)).await).await;

        assert_eq!(status, StatusCode::OK);
        let points = body["data"][0]["history"]["points"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(fixture.provider.history_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_detail_rejects_bad_input_before_calling_the_provider() {
        let fixture = Fixture::new();

        let (status, body) = into_json(
            get_vault_detail(
                State(fixture.state.clone()),
                detail_path("ethereum", GAUNTLET),
                Query(VaultDetailQuery::default()),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Unsupported network");

        let (status, body) = into_json(
            get_vault_detail(
                State(fixture.state.clone()),
                detail_path("base", "0xnothex"),
                Query(VaultDetailQuery::default()),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Invalid address");

        assert_eq!(fixture.provider.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_detail_of_tracked_vault_includes_summary() {
        let fixture = Fixture::new();

        let (status, body) = into_json(
            get_vault_detail(
                State(fixture.state.clone()),
                detail_path("Base", GAUNTLET),
                Query(VaultDetailQuery::default()),
            )
            .await,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tracked_key"], "gauntlet-usd-alpha");
        assert_eq!(body["data"]["summary"]["name"], "Gauntlet USD Alpha");
        assert_eq!(body["data"]["vault"]["name"], "Gauntlet USD Alpha");
    }

    #[tokio::test]
    async fn test_detail_of_untracked_vault() {
        let fixture = Fixture::new();

        let (status, body) = into_json(
            get_vault_detail(
                State(fixture.state.clone()),
                detail_path("base", UNTRACKED),
                Query(VaultDetailQuery::default()),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["summary"].is_null());

        let params = VaultDetailQuery {
            history: true,
            ..Default::default()
        };
        let (status, body) = into_json(
            get_vault_detail(
                State(fixture.state.clone()),
                detail_path("base", UNTRACKED),
                Query(params),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "History available only for tracked vaults");
    }

    #[tokio::test]
    async fn test_detail_of_unknown_vault_is_not_found() {
        let fixture = Fixture::new();

        let (status, body) = into_json(
            get_vault_detail(
                State(fixture.state.clone()),
                detail_path("base", "0xde709f2102306220921060314715629080e2fb77"),
                Query(VaultDetailQuery::default()),
            )
            .await,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "Vault not found");
    }
}

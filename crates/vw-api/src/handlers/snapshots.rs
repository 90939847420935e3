use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use vaultwatch_db::{SnapshotWithPlatform, record_snapshot_for_summary};

use crate::{
    AppState,
    dto::{ApiResponse, CreateSnapshotRequest, RefreshQuery, SnapshotsQuery},
    errors::ApiError,
    helpers::parse_vault_key,
};

#[utoipa::path(
    get,
    path = "/api/snapshots",
    tag = "Snapshots",
    params(SnapshotsQuery),
    responses(
        (status = 200, description = "Most recent snapshots first", body = ApiResponse<Vec<SnapshotWithPlatform>>),
        (status = 400, description = "Invalid platformKey"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_snapshots(
    State(state): State<AppState>,
    Query(params): Query<SnapshotsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let platform_key = params
        .platform_key
        .as_deref()
        .map(parse_vault_key)
        .transpose()?;

    let snapshots = state
        .store
        .list_snapshots(platform_key.as_ref().map(AsRef::as_ref), params.limit())
        .await?;

    Ok(Json(ApiResponse::ok(snapshots)))
}

#[utoipa::path(
    post,
    path = "/api/snapshots",
    tag = "Snapshots",
    params(RefreshQuery),
    request_body = CreateSnapshotRequest,
    responses(
        (status = 201, description = "Snapshot recorded", body = ApiResponse<SnapshotWithPlatform>),
        (status = 400, description = "Malformed body or invalid platformKey"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_snapshot(
    State(state): State<AppState>,
    Query(params): Query<RefreshQuery>,
    payload: Result<Json<CreateSnapshotRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let key = parse_vault_key(&request.platform_key)?;

    let summary = state.catalog.summary_by_key(key, params.refresh).await?;
    let created =
        record_snapshot_for_summary(state.store.as_ref(), &summary, request.overrides()).await?;

    tracing::info!(vault = %key, snapshot_id = created.snapshot.id, "Snapshot recorded on request");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Fixture, into_json};

    fn request(json: serde_json::Value) -> Result<Json<CreateSnapshotRequest>, JsonRejection> {
        Ok(Json(serde_json::from_value(json).unwrap()))
    }

    #[tokio::test]
    async fn test_create_snapshot_uses_live_values_and_overrides() {
        let fixture = Fixture::new();

        let (status, body) = into_json(
            create_snapshot(
                State(fixture.state.clone()),
                Query(RefreshQuery::default()),
                request(serde_json::json!({
                    "platformKey": "superlend-usdc-superfund",
                    "apy7d": 4.2,
                    "balanceUsd": 250.0
                })),
            )
            .await,
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let data = &body["data"];
        assert_eq!(data["apy_1d"], 5.0);
        assert_eq!(data["apy_7d"], 4.2);
        assert_eq!(data["tvl_usd"], 4_000_000.0);
        assert_eq!(data["balance_usd"], 250.0);
        assert!(data["earnings_to_date"].is_null());
        assert_eq!(data["platform"]["key"], "superlend-usdc-superfund");
        assert_eq!(fixture.store.snapshots().len(), 1);
    }

    #[tokio::test]
    async fn test_create_snapshot_rejects_unknown_platform() {
        let fixture = Fixture::new();

        let (status, body) = into_json(
            create_snapshot(
                State(fixture.state.clone()),
                Query(RefreshQuery::default()),
                request(serde_json::json!({ "platformKey": "aave-usdc" })),
            )
            .await,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Invalid platformKey");
        assert!(fixture.store.snapshots().is_empty());
    }

    #[tokio::test]
    async fn test_list_snapshots_filters_and_limits() {
        let fixture = Fixture::new();
        for _ in 0..3 {
            for key in ["gauntlet-usd-alpha", "superlend-usdc-superfund"] {
                let response = create_snapshot(
                    State(fixture.state.clone()),
                    Query(RefreshQuery::default()),
                    request(serde_json::json!({ "platformKey": key })),
                )
                .await;
                assert!(response.is_ok());
            }
        }

        let (status, body) = into_json(
            list_snapshots(
                State(fixture.state.clone()),
                Query(SnapshotsQuery {
                    platform_key: Some("gauntlet-usd-alpha".to_string()),
                    limit: None,
                }),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let snapshots = body["data"].as_array().unwrap();
        assert_eq!(snapshots.len(), 3);
        assert!(
            snapshots
                .iter()
                .all(|s| s["platform"]["key"] == "gauntlet-usd-alpha")
        );

        let (_, body) = into_json(
            list_snapshots(
                State(fixture.state.clone()),
                Query(SnapshotsQuery {
                    platform_key: None,
                    limit: Some("0".to_string()),
                }),
            )
            .await,
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(fixture.store.platforms().len(), 2);
    }

    #[tokio::test]
    async fn test_list_snapshots_rejects_unknown_platform() {
        let fixture = Fixture::new();

        let (status, body) = into_json(
            list_snapshots(
                State(fixture.state.clone()),
                Query(SnapshotsQuery {
                    platform_key: Some("unknown".to_string()),
                    limit: Some("10".to_string()),
                }),
            )
            .await,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Invalid platformKey");
    }
}

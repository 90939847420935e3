use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    dto::{ApiResponse, RefreshQuery, WalletPositions, WalletTotals},
    errors::ApiError,
    helpers::{parse_address, read_wallet_positions},
};

#[utoipa::path(
    get,
    path = "/api/wallet/{address}",
    tag = "Portfolio",
    params(
        ("address" = String, Path, description = "Wallet address"),
        RefreshQuery
    ),
    responses(
        (status = 200, description = "Wallet positions in the tracked vaults", body = ApiResponse<WalletPositions>),
        (status = 400, description = "Invalid address"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_wallet_positions(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(params): Query<RefreshQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let wallet = parse_address(&address)?;

    let summaries = state.catalog.tracked_summaries(params.refresh).await?;
    let vaults = read_wallet_positions(&state.positions, &wallet, &summaries).await;
    let balance_usd = vaults.iter().map(|v| v.balance_usd).sum();

    Ok(Json(ApiResponse::ok(WalletPositions {
        wallet,
        vaults,
        totals: WalletTotals { balance_usd },
    })))
}

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;

use utoipa::OpenApi as OpenApiT;
use utoipa_swagger_ui::SwaggerUi;

use crate::{AppState, dto::ApiResponse, handlers};

pub fn api_router<T: OpenApiT>(_state: AppState) -> Router<AppState> {
    let open_api = T::openapi();

    let api = Router::new()
        .route("/vaults", get(handlers::list_vaults))
        .route("/vault/{network}/{address}", get(handlers::get_vault_detail))
        .route("/summary", get(handlers::get_portfolio_summary))
        .route("/wallet/{address}", get(handlers::get_wallet_positions))
        .route(
            "/snapshots",
            get(handlers::list_snapshots).post(handlers::create_snapshot),
        )
        .route("/alerts", get(handlers::list_alerts));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", open_api))
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        axum::Json(ApiResponse::<()>::error(
            "The requested resource was not found".to_string(),
        )),
    )
}

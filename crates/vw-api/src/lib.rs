pub mod docs;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod helpers;
pub mod router;

#[cfg(test)]
mod fixtures;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};
use std::{env, time::Duration};
use tokio::net::TcpListener;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use pragma_common::services::{Service, ServiceRunner};
use vaultwatch_db::SnapshotStore;
use vaultwatch_kpi::AlertThresholds;
use vaultwatch_master::VaultCatalog;
use vaultwatch_onchain::PositionReader;

use docs::ApiDoc;
use router::api_router;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<VaultCatalog>,
    pub positions: Arc<PositionReader>,
    pub store: Arc<dyn SnapshotStore>,
    /// Wallet used by the portfolio summary when the request does not name one
    pub default_wallet: Option<String>,
    pub thresholds: AlertThresholds,
}

pub struct ApiService {
    state: AppState,
    host: String,
    port: u16,
}

impl ApiService {
    pub fn new(state: AppState, host: &str, port: u16) -> Self {
        Self {
            state,
            host: host.to_owned(),
            port,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn cors_layer_from_env() -> CorsLayer {
    let Ok(origins) = env::var("CORS_ALLOWED_ORIGINS") else {
        tracing::info!("CORS_ALLOWED_ORIGINS not set; using permissive CORS configuration");
        return CorsLayer::permissive();
    };

    let allowed_origins: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    origin,
                    error = %err,
                    "Invalid origin in CORS_ALLOWED_ORIGINS, skipping",
                );
                None
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        tracing::warn!(
            "CORS_ALLOWED_ORIGINS was set but no valid origins were parsed; falling back to permissive CORS",
        );
        return CorsLayer::permissive();
    }

    tracing::info!(allowed = %origins, "Configured restricted CORS origins from environment");

    CorsLayer::new()
        .allow_credentials(true)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_origin(AllowOrigin::list(allowed_origins))
}

#[async_trait::async_trait]
impl Service for ApiService {
    async fn start<'a>(&mut self, mut runner: ServiceRunner<'a>) -> anyhow::Result<()> {
        ApiDoc::generate_openapi_json("./".into())?;

        let host = self.host.clone();
        let port = self.port;
        let state = self.state.clone();

        runner.spawn_loop(move |ctx| async move {
            let address = format!("{host}:{port}");
            let socket_addr: SocketAddr = address.parse()?;
            let listener = TcpListener::bind(socket_addr).await?;

            // Env-based rate limiting configuration
            let limiter_enabled: bool = env_or("RATE_LIMIT_ENABLED", true);
            let per_second: u64 = env_or("RATE_LIMIT_PER_SECOND", 2);
            let burst_size: u32 = env_or("RATE_LIMIT_BURST_SIZE", 5);
            let cleanup_secs: u64 = env_or("RATE_LIMIT_CLEANUP_INTERVAL_SECS", 60);
            let timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);

            tracing::info!(timeout_secs, "Request timeout configured");

            #[allow(clippy::default_constructed_unit_structs)]
            let app = {
                let base = api_router::<ApiDoc>(state.clone())
                    .with_state(state)
                    // include trace context as header into the response
                    //start OpenTelemetry trace on incoming request
                    .layer(OtelAxumLayer::default())
                    .layer(OtelInResponseLayer::default());

                let base = if limiter_enabled {
                    let governor_conf = GovernorConfigBuilder::default()
                        .per_second(per_second)
                        .burst_size(burst_size)
                        .use_headers()
                        .finish()
                        .context("failed to build governor config")?;

                    // Periodic cleanup of the limiter's internal storage, with graceful shutdown.
                    let governor_limiter = governor_conf.limiter().clone();
                    let cancel_token = ctx.token.clone();
                    tokio::spawn(async move {
                        let mut ticker = tokio::time::interval(Duration::from_secs(cleanup_secs));
                        loop {
                            tokio::select! {
                                _ = ticker.tick() => {
                                    tracing::debug!("rate limiting storage size: {}", governor_limiter.len());
                                    governor_limiter.retain_recent();
                                }
                                () = cancel_token.cancelled() => {
                                    tracing::debug!("rate limiter cleanup task shutting down");
                                    break;
                                }
                            }
                        }
                    });

                    base.layer(GovernorLayer::new(governor_conf))
                } else {
                    tracing::info!("rate limiter disabled via env");
                    base
                };

                base.layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)))
                    .layer(cors_layer_from_env())
            };

            tracing::info!("🧩 API started at http://{}", socket_addr);

            // Create a shutdown signal from our context
            let token = ctx.token.clone();
            let shutdown = async move { token.cancelled().await };

            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown)
            .await
            .context("😱 API server stopped!")
        });

        Ok(())
    }
}

mod de;
pub mod types;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use vaultwatch_types::HistoryQuery;

use crate::{error::MasterApiError, traits::VaultDataProvider};
use types::{DetailedVault, VaultHistoryResponse, VaultListResponse};

const API_KEY_HEADER: &str = "x-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct VaultsFyiClient {
    http_client: Client,
    api_endpoint: String,
    api_key: String,
}

impl VaultsFyiClient {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.vaults.fyi/v2";

    pub fn new(api_key: &str) -> Result<Self, MasterApiError> {
        Self::with_endpoint(api_key, Self::DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: &str, api_endpoint: &str) -> Result<Self, MasterApiError> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .inspect_err(|e| tracing::error!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MasterApiError> {
        let url = format!("{}{path}", self.api_endpoint);
        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(MasterApiError::NotFound(url)),
            StatusCode::TOO_MANY_REQUESTS => return Err(MasterApiError::RateLimited),
            status => {
                tracing::warn!(url = %url, status = status.as_u16(), "Vault data provider request failed");
                return Err(MasterApiError::UpstreamStatus {
                    status: status.as_u16(),
                    url,
                });
            }
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait::async_trait]
impl VaultDataProvider for VaultsFyiClient {
    async fn list_vaults(
        &self,
        network: &str,
        per_page: u32,
    ) -> Result<VaultListResponse, MasterApiError> {
        self.get_json(
            "/detailed-vaults",
            &[
                ("allowedNetworks", network.to_string()),
                ("perPage", per_page.to_string()),
            ],
        )
        .await
    }

    async fn vault_detail(
        &self,
        network: &str,
        address: &str,
    ) -> Result<DetailedVault, MasterApiError> {
        self.get_json(&format!("/detailed-vaults/{network}/{address}"), &[])
            .await
    }

    async fn vault_history(
        &self,
        network: &str,
        address: &str,
        query: &HistoryQuery,
    ) -> Result<VaultHistoryResponse, MasterApiError> {
        self.get_json(
            &format!("/historical/{network}/{address}"),
            &history_params(query),
        )
        .await
    }
}

fn history_params(query: &HistoryQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(interval) = query.apy_interval {
        params.push(("apyInterval", interval.to_string()));
    }
    if let Some(granularity) = query.granularity {
        params.push(("granularity", granularity.to_string()));
    }
    if let Some(from) = query.from_timestamp {
        params.push(("fromTimestamp", from.to_string()));
    }
    if let Some(to) = query.to_timestamp {
        params.push(("toTimestamp", to.to_string()));
    }
    if let Some(page) = query.page {
        params.push(("page", page.to_string()));
    }
    if let Some(per_page) = query.per_page {
        params.push(("perPage", per_page.to_string()));
    }
    params
}

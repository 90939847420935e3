use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use vaultwatch_metrics::ProviderMetrics;
use vaultwatch_types::{
    HistoryQuery, TRACKED_VAULTS, VaultDefinition, VaultHistory, VaultKey, VaultSummary,
};

use crate::{
    cache::TtlCache,
    clients::vaultsfyi::types::{DetailedVault, VaultHistoryResponse},
    error::MasterApiError,
    mapping::{to_history_point, to_summary},
    traits::VaultDataProvider,
};

const LIST_PAGE_SIZE: u32 = 250;
const SUMMARY_TTL: Duration = Duration::from_secs(60);
const HISTORY_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
struct VaultList {
    vaults: Arc<Vec<DetailedVault>>,
    fetched_at: DateTime<Utc>,
}

/// Cached access to the tracked vaults through a [`VaultDataProvider`].
pub struct VaultCatalog {
    provider: Arc<dyn VaultDataProvider>,
    tracked: &'static [VaultDefinition],
    lists: TtlCache<VaultList>,
    details: TtlCache<Arc<DetailedVault>>,
    histories: TtlCache<Arc<VaultHistoryResponse>>,
    metrics: Option<Arc<ProviderMetrics>>,
}

impl VaultCatalog {
    pub fn new(provider: Arc<dyn VaultDataProvider>) -> Self {
        Self {
            provider,
            tracked: &TRACKED_VAULTS,
            lists: TtlCache::new(),
            details: TtlCache::new(),
            histories: TtlCache::new(),
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<ProviderMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn record_fetch(&self, endpoint: &'static str, forced: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record_fetch(endpoint, forced);
        }
    }

    async fn load_vault_list(
        &self,
        network: &str,
        refresh: bool,
    ) -> Result<VaultList, MasterApiError> {
        let key = format!("vaults:list:{network}");
        self.lists
            .get_or_fetch(&key, SUMMARY_TTL, refresh, || async {
                self.record_fetch("list", refresh);
                tracing::debug!(network, refresh, "Fetching vault list from provider");
                let response = self.provider.list_vaults(network, LIST_PAGE_SIZE).await?;
                Ok::<_, MasterApiError>(VaultList {
                    vaults: Arc::new(response.data),
                    fetched_at: Utc::now(),
                })
            })
            .await
            .map_err(MasterApiError::from_shared)
    }

    fn find_in_list(
        definition: &VaultDefinition,
        list: &VaultList,
    ) -> Result<VaultSummary, MasterApiError> {
        list.vaults
            .iter()
            .find(|item| definition.matches_name(&item.name))
            .map(|item| to_summary(definition, item, list.fetched_at))
            .ok_or_else(|| MasterApiError::VaultNotListed(definition.name.to_string()))
    }

    /// Summaries of every tracked vault, in tracking order.
    pub async fn tracked_summaries(
        &self,
        refresh: bool,
    ) -> Result<Vec<VaultSummary>, MasterApiError> {
        let mut summaries = Vec::with_capacity(self.tracked.len());
        let mut loaded: Vec<(&str, VaultList)> = Vec::new();

        for definition in self.tracked {
            let list = match loaded.iter().find(|(network, _)| *network == definition.network) {
                Some((_, list)) => list.clone(),
                None => {
                    let list = self.load_vault_list(definition.network, refresh).await?;
                    loaded.push((definition.network, list.clone()));
                    list
                }
            };
            summaries.push(Self::find_in_list(definition, &list)?);
        }

        Ok(summaries)
    }

    /// Force a provider round-trip for every tracked vault and re-seed the caches.
    pub async fn refresh_tracked(&self) -> Result<Vec<VaultSummary>, MasterApiError> {
        self.tracked_summaries(true).await
    }

    pub async fn summary_by_key(
        &self,
        key: VaultKey,
        refresh: bool,
    ) -> Result<VaultSummary, MasterApiError> {
        let definition = key.definition();
        let list = self.load_vault_list(definition.network, refresh).await?;
        Self::find_in_list(definition, &list)
    }

    /// Full provider record for any vault, tracked or not.
    pub async fn vault_detail(
        &self,
        network: &str,
        address: &str,
        refresh: bool,
    ) -> Result<Arc<DetailedVault>, MasterApiError> {
        let key = format!("vaults:detail:{network}:{address}");
        self.details
            .get_or_fetch(&key, SUMMARY_TTL, refresh, || async {
                self.record_fetch("detail", refresh);
                let detail = self.provider.vault_detail(network, address).await?;
                Ok::<_, MasterApiError>(Arc::new(detail))
            })
            .await
            .map_err(MasterApiError::from_shared)
    }

    /// Historical series of a tracked vault.
    ///
    /// `query.refresh` also bypasses the cached vault list used to resolve the vault.
    pub async fn vault_history(
        &self,
        key: VaultKey,
        query: &HistoryQuery,
    ) -> Result<VaultHistory, MasterApiError> {
        let summary = self.summary_by_key(key, query.refresh).await?;
        let cache_key = query.cache_key(&summary.network, &summary.address);

        let history = self
            .histories
            .get_or_fetch(&cache_key, HISTORY_TTL, query.refresh, || async {
                self.record_fetch("history", query.refresh);
                let history = self
                    .provider
                    .vault_history(&summary.network, &summary.address, query)
                    .await?;
                Ok::<_, MasterApiError>(Arc::new(history))
            })
            .await
            .map_err(MasterApiError::from_shared)?;

        Ok(VaultHistory {
            key,
            address: summary.address,
            network: summary.network,
            points: history.data.iter().map(to_history_point).collect(),
            next_page: history.next_page,
            fetched_at: Utc::now(),
        })
    }

    /// Resolve a vault address to the tracked vault it belongs to, if any.
    pub async fn tracked_key_for_address(
        &self,
        network: &str,
        address: &str,
        refresh: bool,
    ) -> Result<Option<VaultKey>, MasterApiError> {
        let summaries = self.tracked_summaries(refresh).await?;
        Ok(summaries
            .iter()
            .find(|summary| {
                summary.network.eq_ignore_ascii_case(network)
                    && summary.address.eq_ignore_ascii_case(address)
            })
            .map(|summary| summary.key))
    }
}

use serde::Deserialize;
use utoipa::IntoParams;
use vaultwatch_types::{ApyInterval, Granularity, HistoryQuery};

pub const DEFAULT_SNAPSHOT_LIMIT: i64 = 50;
pub const MAX_SNAPSHOT_LIMIT: i64 = 200;

// Query strings are parsed leniently: flags are only set by the literal `true`
// (or only cleared by `false` when on by default) and unparseable values are
// treated as absent, so malformed parameters never reject the request.

/// Query parameters for the tracked vault list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VaultsQuery {
    /// Attach each vault's historical series
    #[serde(default, deserialize_with = "lenient::flag")]
    pub history: bool,
    /// Bypass cached provider data
    #[serde(default, deserialize_with = "lenient::flag")]
    pub refresh: bool,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub apy_interval: Option<ApyInterval>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub granularity: Option<Granularity>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub per_page: Option<u32>,
}

impl VaultsQuery {
    pub const fn history_query(&self) -> HistoryQuery {
        HistoryQuery {
            apy_interval: self.apy_interval,
            granularity: self.granularity,
            from_timestamp: None,
            to_timestamp: None,
            page: self.page,
            per_page: self.per_page,
            refresh: self.refresh,
        }
    }
}

/// Query parameters for a single vault
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VaultDetailQuery {
    /// Attach the tracked vault summary, on by default
    #[serde(default = "defaults::enabled", deserialize_with = "lenient::unless_false")]
    pub summary: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub history: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub refresh: bool,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub apy_interval: Option<ApyInterval>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub granularity: Option<Granularity>,
    /// Unix seconds
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub from_timestamp: Option<i64>,
    /// Unix seconds
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub to_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub per_page: Option<u32>,
}

impl Default for VaultDetailQuery {
    fn default() -> Self {
        Self {
            summary: true,
            history: false,
            refresh: false,
            apy_interval: None,
            granularity: None,
            from_timestamp: None,
            to_timestamp: None,
            page: None,
            per_page: None,
        }
    }
}

impl VaultDetailQuery {
    pub const fn history_query(&self) -> HistoryQuery {
        HistoryQuery {
            apy_interval: self.apy_interval,
            granularity: self.granularity,
            from_timestamp: self.from_timestamp,
            to_timestamp: self.to_timestamp,
            page: self.page,
            per_page: self.per_page,
            refresh: self.refresh,
        }
    }
}

/// Query parameters for the portfolio summary
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// Wallet to report on, falls back to the configured default wallet
    pub wallet: Option<String>,
    /// `weekly` enables weekly compounding
    pub compound: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub weekly_compounding: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub refresh: bool,
    /// Record a snapshot per vault, on by default
    #[serde(default = "defaults::enabled", deserialize_with = "lenient::unless_false")]
    pub persist: bool,
}

impl Default for SummaryQuery {
    fn default() -> Self {
        Self {
            wallet: None,
            compound: None,
            weekly_compounding: false,
            refresh: false,
            persist: true,
        }
    }
}

impl SummaryQuery {
    pub fn compound_weekly(&self) -> bool {
        self.weekly_compounding
            || self
                .compound
                .as_deref()
                .is_some_and(|mode| mode.eq_ignore_ascii_case("weekly"))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RefreshQuery {
    /// Bypass cached provider data
    #[serde(default, deserialize_with = "lenient::flag")]
    pub refresh: bool,
}

/// Query parameters for the snapshot listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SnapshotsQuery {
    /// Only return snapshots of this tracked vault
    pub platform_key: Option<String>,
    /// Between 1 and 200, defaults to 50
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

impl SnapshotsQuery {
    /// Unparseable limits fall back to the default, others are clamped into range.
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_SNAPSHOT_LIMIT)
            .clamp(1, MAX_SNAPSHOT_LIMIT)
    }
}

pub mod defaults {
    pub const fn enabled() -> bool {
        true
    }
}

mod lenient {
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer};

    pub(super) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.is_some_and(|raw| raw == "true"))
    }

    pub(super) fn unless_false<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<bool, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.is_none_or(|raw| raw != "false"))
    }

    pub(super) fn parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        Ok(Option::<String>::deserialize(deserializer)?.and_then(|raw| raw.trim().parse().ok()))
    }
}

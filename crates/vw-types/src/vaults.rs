use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

pub const BASE_CHAIN_ID: u64 = 8453;
pub const BASE_NETWORK_NAME: &str = "base";

/// Identifier of a vault tracked by the dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ToSchema,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum VaultKey {
    GauntletUsdAlpha,
    SuperlendUsdcSuperfund,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct VaultDefinition {
    pub key: VaultKey,
    /// Display name used by the vault data provider, matched case-insensitively.
    pub name: &'static str,
    /// Owning protocol or curator
    pub protocol: &'static str,
    pub network: &'static str,
}

pub static TRACKED_VAULTS: [VaultDefinition; 2] = [
    VaultDefinition {
        key: VaultKey::GauntletUsdAlpha,
        name: "Gauntlet USD Alpha",
        protocol: "Gauntlet",
        network: BASE_NETWORK_NAME,
    },
    VaultDefinition {
        key: VaultKey::SuperlendUsdcSuperfund,
        name: "Superlend USDC SuperFund",
        protocol: "Superlend",
        network: BASE_NETWORK_NAME,
    },
];

impl VaultKey {
    pub fn definition(self) -> &'static VaultDefinition {
        match self {
            Self::GauntletUsdAlpha => &TRACKED_VAULTS[0],
            Self::SuperlendUsdcSuperfund => &TRACKED_VAULTS[1],
        }
    }
}

impl VaultDefinition {
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

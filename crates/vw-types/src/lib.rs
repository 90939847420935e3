pub mod history;
pub mod summary;
pub mod vaults;

pub use history::{ApyInterval, Granularity, HistoryQuery, VaultHistoricalPoint, VaultHistory};
pub use summary::{
    ApyBreakdown, ApyIntervals, AssetSummary, HoldersSummary, RewardSummary, TopHolder,
    VaultSummary,
};
pub use vaults::{BASE_CHAIN_ID, BASE_NETWORK_NAME, TRACKED_VAULTS, VaultDefinition, VaultKey};

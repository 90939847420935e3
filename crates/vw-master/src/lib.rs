pub mod cache;
pub mod catalog;
pub mod clients;
pub mod error;
mod mapping;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::TtlCache;
pub use catalog::VaultCatalog;
pub use clients::VaultsFyiClient;
pub use clients::vaultsfyi::types::{
    DetailedVault, HistoricalPoint, VaultHistoryResponse, VaultListResponse,
};
pub use error::MasterApiError;
pub use traits::VaultDataProvider;

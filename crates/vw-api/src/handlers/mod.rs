pub mod alerts;
pub mod snapshots;
pub mod summary;
pub mod vaults;
pub mod wallet;

pub use alerts::list_alerts;
pub use snapshots::{create_snapshot, list_snapshots};
pub use summary::{build_portfolio_summary, get_portfolio_summary};
pub use vaults::{get_vault_detail, list_vaults};
pub use wallet::get_wallet_positions;

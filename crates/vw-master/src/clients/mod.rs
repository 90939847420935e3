pub mod vaultsfyi;

pub use vaultsfyi::VaultsFyiClient;

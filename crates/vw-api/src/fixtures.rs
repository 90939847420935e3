use std::sync::Arc;

use vaultwatch_db::testing::MemorySnapshotStore;
use vaultwatch_kpi::AlertThresholds;
use vaultwatch_master::{
    VaultCatalog,
    testing::{StaticVaultProvider, sample_history_point, sample_vault},
};
use vaultwatch_onchain::{PositionReader, testing::MockVaultContracts};

use crate::AppState;

pub(crate) const WALLET: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
pub(crate) const GAUNTLET: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";
pub(crate) const SUPERLEND: &str = "0xdbf03b407c01e7cd3cbea99509d93f8dddc8c6fb";
pub(crate) const UNTRACKED: &str = "0x52908400098527886e0f7030069857d2e4169ee7";
const USDC: &str = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";

/// Gauntlet at 10% holding 1000 USDC of the wallet, Superlend at 5% holding 4000.
pub(crate) struct Fixture {
    pub provider: Arc<StaticVaultProvider>,
    pub contracts: Arc<MockVaultContracts>,
    pub store: Arc<MemorySnapshotStore>,
    pub state: AppState,
}

impl Fixture {
    pub fn new() -> Self {
        let provider = Arc::new(
            StaticVaultProvider::new(vec![
                sample_vault("Gauntlet USD Alpha", GAUNTLET, 10.0, 15_000_000.0),
                sample_vault("Superlend USDC SuperFund", SUPERLEND, 5.0, 4_000_000.0),
                sample_vault("Some Untracked Vault", UNTRACKED, 3.0, 50_000.0),
            ])
            .with_history(vec![
                sample_history_point(1_700_000_000, 9.5),
                sample_history_point(1_700_086_400, 10.0),
            ]),
        );

        let contracts = MockVaultContracts::default();
        contracts.add_token(USDC, 6, "USDC");
        contracts.add_vault(GAUNTLET, USDC, 6, "gtUSDa");
        contracts.add_vault(SUPERLEND, USDC, 6, "slUSDC");
        contracts.set_balance(GAUNTLET, WALLET, 1_000_000_000);
        contracts.set_balance(SUPERLEND, WALLET, 4_000_000_000);
        let contracts = Arc::new(contracts);

        let store = Arc::new(MemorySnapshotStore::default());

        let state = AppState {
            catalog: Arc::new(VaultCatalog::new(provider.clone())),
            positions: Arc::new(PositionReader::new(contracts.clone())),
            store: store.clone(),
            default_wallet: Some(WALLET.to_string()),
            thresholds: AlertThresholds::default(),
        };

        Self {
            provider,
            contracts,
            store,
            state,
        }
    }
}

/// Status and JSON body of a handler response.
pub(crate) async fn into_json(
    response: impl axum::response::IntoResponse,
) -> (axum::http::StatusCode, serde_json::Value) {
    let response = response.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

//! In-memory contract client for tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use ethers::types::{Address, U256};

use crate::{address::parse_address, client::VaultContractClient, error::ChainError};

#[derive(Clone)]
struct MockToken {
    decimals: u8,
    symbol: String,
}

#[derive(Clone)]
struct MockVault {
    asset: Address,
    /// Assets per share as `numerator / denominator`
    price: (u128, u128),
}

#[derive(Default)]
pub struct MockVaultContracts {
    tokens: Mutex<HashMap<Address, MockToken>>,
    vaults: Mutex<HashMap<Address, MockVault>>,
    balances: Mutex<HashMap<(Address, Address), U256>>,
    failing: Mutex<HashSet<Address>>,
    pub metadata_calls: AtomicUsize,
    pub asset_calls: AtomicUsize,
    pub convert_calls: AtomicUsize,
}

fn address(value: &str) -> Address {
    parse_address(value).unwrap()
}

impl MockVaultContracts {
    pub fn add_token(&self, token: &str, decimals: u8, symbol: &str) {
        self.tokens.lock().unwrap().insert(
            address(token),
            MockToken {
                decimals,
                symbol: symbol.to_string(),
            },
        );
    }

    /// Registers a vault share token with a 1:1 share price in raw units.
    pub fn add_vault(&self, vault: &str, asset: &str, decimals: u8, symbol: &str) {
        self.add_token(vault, decimals, symbol);
        self.vaults.lock().unwrap().insert(
            address(vault),
            MockVault {
                asset: address(asset),
                price: (1, 1),
            },
        );
    }

    pub fn set_share_price(&self, vault: &str, numerator: u128, denominator: u128) {
        if let Some(entry) = self.vaults.lock().unwrap().get_mut(&address(vault)) {
            entry.price = (numerator, denominator);
        }
    }

    pub fn set_balance(&self, token: &str, owner: &str, raw: u128) {
        self.balances
            .lock()
            .unwrap()
            .insert((address(token), address(owner)), U256::from(raw));
    }

    pub fn fail_balance_reads(&self, token: &str) {
        self.failing.lock().unwrap().insert(address(token));
    }

    fn token(&self, token: Address) -> Result<MockToken, ChainError> {
        self.tokens
            .lock()
            .unwrap()
            .get(&token)
            .cloned()
            .ok_or(ChainError::Reverted)
    }

    fn vault(&self, vault: Address) -> Result<MockVault, ChainError> {
        self.vaults
            .lock()
            .unwrap()
            .get(&vault)
            .cloned()
            .ok_or(ChainError::Reverted)
    }
}

#[async_trait::async_trait]
impl VaultContractClient for MockVaultContracts {
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        if self.failing.lock().unwrap().contains(&token) {
            return Err(ChainError::Transport("header not found".to_string()));
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&(token, owner))
            .copied()
            .unwrap_or_default())
    }

    async fn decimals(&self, token: Address) -> Result<u8, ChainError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.token(token).map(|t| t.decimals)
    }

    async fn symbol(&self, token: Address) -> Result<String, ChainError> {
        self.token(token).map(|t| t.symbol)
    }

    async fn name(&self, token: Address) -> Result<String, ChainError> {
        self.token(token).map(|t| format!("{} Token", t.symbol))
    }

    async fn asset(&self, vault: Address) -> Result<Address, ChainError> {
        self.asset_calls.fetch_add(1, Ordering::SeqCst);
        self.vault(vault).map(|v| v.asset)
    }

    async fn convert_to_assets(&self, vault: Address, shares: U256) -> Result<U256, ChainError> {
        self.convert_calls.fetch_add(1, Ordering::SeqCst);
        let (numerator, denominator) = self.vault(vault)?.price;
        Ok(shares * U256::from(numerator) / U256::from(denominator))
    }
}

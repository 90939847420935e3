use std::{fmt, sync::Arc};

use ethers::{
    abi::Detokenize,
    contract::{ContractCall, ContractError},
    providers::{Http, Provider},
    types::{Address, U256},
};

use crate::{contracts::Erc4626, error::ChainError};

const DEFAULT_BASE_RPC_URL: &str = "https://mainnet.base.org";
const ALCHEMY_BASE_RPC_URL: &str = "https://base-mainnet.g.alchemy.com/v2";
const REDACTED: &str = "***";

/// The ERC-20 / ERC-4626 view calls needed to value a vault position.
#[async_trait::async_trait]
pub trait VaultContractClient: Send + Sync {
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError>;
    async fn decimals(&self, token: Address) -> Result<u8, ChainError>;
    async fn symbol(&self, token: Address) -> Result<String, ChainError>;
    async fn name(&self, token: Address) -> Result<String, ChainError>;
    async fn asset(&self, vault: Address) -> Result<Address, ChainError>;
    async fn convert_to_assets(&self, vault: Address, shares: U256) -> Result<U256, ChainError>;
}

/// An RPC URL, possibly embedding an API key that must never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    url: String,
    secret: Option<String>,
}

impl RpcEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret: None,
        }
    }

    pub(crate) fn with_secret(url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret: Some(secret.into()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn redact(&self, message: &str) -> String {
        match &self.secret {
            Some(secret) => message.replace(secret.as_str(), REDACTED),
            None => message.to_string(),
        }
    }
}

impl fmt::Debug for RpcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redact(&self.url))
    }
}

/// RPC endpoints in the order they are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoints(Vec<RpcEndpoint>);

impl RpcEndpoints {
    /// Alchemy first when a key is available, then the public or configured Base RPC.
    pub fn base(alchemy_api_key: Option<&str>, rpc_url: Option<&str>) -> Self {
        let mut endpoints = Vec::with_capacity(2);
        if let Some(key) = alchemy_api_key.filter(|key| !key.is_empty()) {
            endpoints.push(RpcEndpoint::with_secret(
                format!("{ALCHEMY_BASE_RPC_URL}/{key}"),
                key,
            ));
        }
        endpoints.push(RpcEndpoint::new(
            rpc_url
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_BASE_RPC_URL),
        ));
        Self(endpoints)
    }

    pub fn endpoints(&self) -> &[RpcEndpoint] {
        &self.0
    }
}

impl From<Vec<RpcEndpoint>> for RpcEndpoints {
    fn from(endpoints: Vec<RpcEndpoint>) -> Self {
        Self(endpoints)
    }
}

struct Connection {
    endpoint: RpcEndpoint,
    provider: Arc<Provider<Http>>,
}

/// Contract reads over `Provider<Http>`, falling back to the next endpoint on transport failures.
pub struct EthersVaultClient {
    connections: Vec<Connection>,
}

impl EthersVaultClient {
    pub fn new(endpoints: RpcEndpoints) -> Result<Self, ChainError> {
        if endpoints.0.is_empty() {
            return Err(ChainError::NoEndpoints);
        }

        let connections = endpoints
            .0
            .into_iter()
            .map(|endpoint| {
                let provider = Provider::<Http>::try_from(endpoint.url())
                    .map_err(|e| ChainError::InvalidEndpoint(endpoint.redact(&e.to_string())))?;
                Ok(Connection {
                    endpoint,
                    provider: Arc::new(provider),
                })
            })
            .collect::<Result<Vec<_>, ChainError>>()?;

        Ok(Self { connections })
    }

    async fn call<T, F>(&self, address: Address, build: F) -> Result<T, ChainError>
    where
        T: Detokenize + Send + Sync,
        F: Fn(&Erc4626<Provider<Http>>) -> ContractCall<Provider<Http>, T> + Send + Sync,
    {
        let mut last_error = ChainError::NoEndpoints;

        for connection in &self.connections {
            let contract = Erc4626::new(address, connection.provider.clone());
            let call = build(&contract);

            match call.call().await {
                Ok(value) => return Ok(value),
                Err(ContractError::Revert(_)) => return Err(ChainError::Reverted),
                Err(
                    err @ (ContractError::MiddlewareError { .. }
                    | ContractError::ProviderError { .. }),
                ) => {
                    let message = connection.endpoint.redact(&err.to_string());
                    tracing::warn!(
                        endpoint = ?connection.endpoint,
                        error = %message,
                        "RPC endpoint failed, trying next one"
                    );
                    last_error = ChainError::Transport(message);
                }
                Err(err) => return Err(ChainError::Call(connection.endpoint.redact(&err.to_string()))),
            }
        }

        Err(last_error)
    }
}

#[async_trait::async_trait]
impl VaultContractClient for EthersVaultClient {
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        self.call(token, |contract| contract.balance_of(owner)).await
    }

    async fn decimals(&self, token: Address) -> Result<u8, ChainError> {
        self.call(token, Erc4626::decimals).await
    }

    async fn symbol(&self, token: Address) -> Result<String, ChainError> {
        self.call(token, Erc4626::symbol).await
    }

    async fn name(&self, token: Address) -> Result<String, ChainError> {
        self.call(token, Erc4626::name).await
    }

    async fn asset(&self, vault: Address) -> Result<Address, ChainError> {
        self.call(vault, Erc4626::asset).await
    }

    async fn convert_to_assets(&self, vault: Address, shares: U256) -> Result<U256, ChainError> {
        self.call(vault, |contract| contract.convert_to_assets(shares)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alchemy_is_tried_first() {
        let endpoints = RpcEndpoints::base(Some("secret"), None);
        let urls: Vec<&str> = endpoints.endpoints().iter().map(RpcEndpoint::url).collect();
        assert_eq!(
            urls,
            [
                "https://base-mainnet.g.alchemy.com/v2/secret",
                "https://mainnet.base.org",
            ]
        );
    }

    #[test]
    fn test_configured_rpc_replaces_public_default() {
        let endpoints = RpcEndpoints::base(None, Some("https://rpc.example.org"));
        assert_eq!(endpoints.endpoints(), [RpcEndpoint::new("https://rpc.example.org")]);

        let endpoints = RpcEndpoints::base(Some(""), Some(""));
        assert_eq!(endpoints.endpoints(), [RpcEndpoint::new("https://mainnet.base.org")]);
    }

    #[test]
    fn test_client_needs_an_endpoint() {
        assert!(matches!(
            EthersVaultClient::new(RpcEndpoints(Vec::new())),
            Err(ChainError::NoEndpoints)
        ));
    }

    #[test]
    fn test_api_key_is_redacted() {
        let endpoints = RpcEndpoints::base(Some("k3y-123"), None);
        let alchemy = &endpoints.endpoints()[0];

        let message = alchemy.redact(
            "error sending request for url (https://base-mainnet.g.alchemy.com/v2/k3y-123)",
        );
        assert_eq!(
            message,
            "error sending request for url (https://base-mainnet.g.alchemy.com/v2/***)"
        );
        assert!(!format!("{endpoints:?}").contains("k3y-123"));
    }

    #[tokio::test]
    async fn test_every_endpoint_is_tried_before_failing() {
        // nothing listens on port 1, both endpoints fail to connect
        let client = EthersVaultClient::new(RpcEndpoints::from(vec![
            RpcEndpoint::with_secret("http://127.0.0.1:1/v2/k3y-123", "k3y-123"),
            RpcEndpoint::new("http://127.0.0.1:1/public"),
        ]))
        .unwrap();

        let err = client.decimals(Address::zero()).await.unwrap_err();

        assert!(matches!(err, ChainError::Transport(message) if message.contains("/public")));
    }

    #[tokio::test]
    async fn test_secret_endpoint_error_is_redacted() {
        let client = EthersVaultClient::new(RpcEndpoints::from(vec![RpcEndpoint::with_secret(
            "http://127.0.0.1:1/v2/k3y-123",
            "k3y-123",
        )]))
        .unwrap();

        let err = client.symbol(Address::zero()).await.unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, ChainError::Transport(_)));
        assert!(!message.contains("k3y-123"), "{message}");
    }
}

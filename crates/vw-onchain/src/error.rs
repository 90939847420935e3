use std::sync::Arc;

use ethers::utils::ConversionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),

    /// Endpoint unreachable or answering garbage. Messages are already redacted.
    #[error("RPC transport failed: {0}")]
    Transport(String),

    #[error("Contract call reverted")]
    Reverted,

    #[error("Contract call failed: {0}")]
    Call(String),

    #[error("Unsupported token decimals: {0}")]
    InvalidDecimals(u8),

    #[error("Could not format amount: {0}")]
    Units(#[from] ConversionError),

    #[error("No RPC endpoint configured")]
    NoEndpoints,

    #[error(transparent)]
    Shared(Arc<ChainError>),
}

impl ChainError {
    pub fn from_shared(err: Arc<Self>) -> Self {
        Arc::try_unwrap(err).unwrap_or_else(Self::Shared)
    }
}

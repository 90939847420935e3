use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MasterApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Vault data provider returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Vault data provider rate limit reached")]
    RateLimited,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Vault \"{0}\" not found in vault data provider response")]
    VaultNotListed(String),

    /// Failure of a fetch shared by every caller that waited on it.
    #[error(transparent)]
    Shared(Arc<MasterApiError>),
}

impl MasterApiError {
    /// Only the provider answering 404; a tracked vault missing from the list is not one.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Shared(inner) => inner.is_not_found(),
            _ => false,
        }
    }

    /// Unwrap an error coming out of the cache, keeping it shared when other waiters hold it.
    pub fn from_shared(err: Arc<Self>) -> Self {
        Arc::try_unwrap(err).unwrap_or_else(Self::Shared)
    }
}

//! Error types for the chain aggregator.

use dxmgn_domain::DomainError;
use dxmgn_protocols::error::ChainError;
use thiserror::Error;

/// Errors returned by [`crate::api::DxMgnPoolApi`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// A provider or contract call failed.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// A value could not be represented or converted.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Startup configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Returns true when no account is available to act for.
    pub fn is_no_account(&self) -> bool {
        matches!(self, ApiError::Chain(ChainError::NoAccount))
    }
}

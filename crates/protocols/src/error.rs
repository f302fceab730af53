//! Errors raised at the provider and contract boundary.

use primitive_types::H256;
use thiserror::Error;

/// Failure of a provider or contract call.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The provider exposes no account to act for.
    #[error("provider has no available account")]
    NoAccount,

    /// HTTP transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered without a result.
    #[error("empty result for {0}")]
    EmptyResult(String),

    /// Return data could not be decoded.
    #[error("abi decode failed: {0}")]
    Decode(String),

    /// Mined with a failure status.
    #[error("transaction {0:#x} reverted")]
    Reverted(H256),

    /// Not mined within the configured wait.
    #[error("transaction {hash:#x} not mined after {waited_secs}s")]
    ReceiptTimeout { hash: H256, waited_secs: u64 },

    /// A call was refused by the backend.
    #[error("call rejected: {0}")]
    Rejected(String),
}

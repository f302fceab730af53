//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use dxmgn_protocols::prelude::*;
//! ```

// Boundary traits
pub use crate::{PoolContracts, TokenContracts, Web3Provider};

// Contracts
pub use crate::contracts::{DxMgnContracts, Erc20Contracts};

// Errors
pub use crate::error::ChainError;

// RPC
pub use crate::rpc::{
    BlockInfo, BlockTag, Bytes, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_WEI, RpcConfig, RpcProvider,
    TransactionRequest, TxReceipt,
};

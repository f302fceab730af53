//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use dxmgn_execution::prelude::*;
//! ```

// Aggregator
pub use crate::api::{
    AccountSnapshot, AllowanceCheck, ChainSnapshot, DepositReceipt, DxMgnPoolApi,
    DxMgnPoolState, UserSnapshot,
};

// Config
pub use crate::config::{
    AppConfig, COOKIE_SETTINGS_KEY, GAS_LIMIT, GAS_PRICE, NetworkConfig,
    VERIFICATION_SETTINGS_KEY, WETH_BUFFER_PERCENT,
};

// Errors
pub use crate::error::ApiError;

// Sync
pub use crate::sync::{ProviderWatcher, WatchEvent, WatcherConfig};

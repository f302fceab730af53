//! Contract bindings over the JSON-RPC provider.
//!
//! Calls are encoded and decoded through the `sol!` interfaces in
//! [`interfaces`]:
//! - ERC20 tokens and WETH
//! - DxMgnPool instances, their coordinator and the MGN token

/// DxMgnPool, coordinator and MGN bindings.
pub mod dx_mgn_pool;
/// ERC20 and WETH bindings.
pub mod erc20;
/// Solidity interfaces and primitive conversions.
pub mod interfaces;

pub use dx_mgn_pool::DxMgnContracts;
pub use erc20::Erc20Contracts;

//! Aggregated results returned by [`super::DxMgnPoolApi`].

use dxmgn_domain::entities::{PoolPair, PoolTokens};
use dxmgn_domain::enums::{Network, PoolNumber};
use dxmgn_domain::{Address, U256};
use dxmgn_protocols::rpc::TxReceipt;
use serde::Serialize;

/// Account and latest block timestamp, read together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub account: Address,
    pub timestamp: u64,
}

/// Account, block timestamp and network, read together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainSnapshot {
    pub account: Address,
    pub timestamp: u64,
    pub network: Network,
}

/// Account, its ether balance and the network, read together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserSnapshot {
    pub account: Address,
    pub balance: U256,
    pub network: Network,
}

/// Everything the pool overview shows, in one read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DxMgnPoolState {
    pub mgn_address: Address,
    pub mgn_balance: U256,
    pub total_shares: PoolPair<U256>,
    pub participation: PoolPair<U256>,
    pub tokens: PoolTokens,
}

/// Transactions submitted by one approve-and-deposit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReceipt {
    pub pool: PoolNumber,
    pub pool_address: Address,
    pub token: Address,
    pub amount: U256,
    /// Present when the allowance was below the amount.
    pub approval: Option<TxReceipt>,
    /// Present when ether had to be wrapped first.
    pub wrap: Option<TxReceipt>,
    pub deposit: TxReceipt,
}

/// Outcome of the false-allowance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceCheck {
    /// The allowance already covers the amount.
    Sufficient,
    /// Approve this amount to top the allowance up to `2^255`, or up to
    /// the requested amount when that is larger. Never zero.
    Approve(U256),
    /// The allowance could not be read; the error was logged.
    Unavailable,
}

//! Ethereum JSON-RPC plumbing for the DxMgnPool contracts.
//!
//! This crate provides:
//! - The provider and contract boundaries as traits
//! - An HTTP JSON-RPC provider implementing them
//! - `sol!` interfaces of the ERC20, WETH, pool, coordinator and MGN contracts
//! - An in-memory backend for tests (feature `mock`)

/// Prelude module for convenient imports.
pub mod prelude;

/// Contract bindings over the JSON-RPC provider.
pub mod contracts;
/// Error types.
pub mod error;
/// In-memory chain backend.
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// JSON-RPC provider.
pub mod rpc;

use async_trait::async_trait;
use dxmgn_domain::entities::PoolPair;
use dxmgn_domain::enums::Network;
use dxmgn_domain::{Address, U256};
use error::ChainError;
use rpc::{BlockInfo, BlockTag, TxReceipt};

/// The wallet/provider session.
#[async_trait]
pub trait Web3Provider: Send + Sync {
    /// Returns the account the session is acting for.
    async fn current_account(&self) -> Result<Address, ChainError>;

    /// Returns the numeric network id.
    async fn network_id(&self) -> Result<u64, ChainError>;

    /// Returns the network the session is attached to.
    async fn network(&self) -> Result<Network, ChainError> {
        Ok(Network::from_id(self.network_id().await?))
    }

    /// Returns the native balance of an account.
    async fn balance(&self, account: Address) -> Result<U256, ChainError>;

    /// Returns header information for a block.
    async fn block_info(&self, block: BlockTag) -> Result<BlockInfo, ChainError>;
}

/// ERC20 (and WETH) contract calls.
///
/// Read methods returning `Option` yield `None` when the contract returns
/// no data for that getter.
#[async_trait]
pub trait TokenContracts: Send + Sync {
    async fn name(&self, token: Address) -> Result<Option<String>, ChainError>;

    async fn symbol(&self, token: Address) -> Result<Option<String>, ChainError>;

    async fn decimals(&self, token: Address) -> Result<Option<u8>, ChainError>;

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError>;

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        from: Address,
    ) -> Result<TxReceipt, ChainError>;

    async fn transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
        from: Address,
    ) -> Result<TxReceipt, ChainError>;

    /// Wraps `value` wei of ether by calling `deposit()` on the WETH contract.
    async fn deposit_eth(
        &self,
        weth: Address,
        value: U256,
        from: Address,
    ) -> Result<TxReceipt, ChainError>;
}

/// DxMgnPool, coordinator and MGN contract calls.
#[async_trait]
pub trait PoolContracts: Send + Sync {
    /// Addresses of the two pools, as registered in the coordinator.
    async fn pool_addresses(&self) -> Result<PoolPair<Address>, ChainError>;

    async fn total_pool_shares(&self, pool: Address) -> Result<U256, ChainError>;

    /// Per-deposit share entries of an account. Order is not guaranteed.
    async fn pool_shares_by_address(
        &self,
        pool: Address,
        account: Address,
    ) -> Result<Vec<U256>, ChainError>;

    async fn deposit_token(&self, pool: Address) -> Result<Address, ChainError>;

    async fn secondary_token(&self, pool: Address) -> Result<Address, ChainError>;

    async fn mgn_token(&self, pool: Address) -> Result<Address, ChainError>;

    async fn mgn_locked_balance(&self, mgn: Address, account: Address) -> Result<U256, ChainError>;

    async fn mgn_unlocked_balance(
        &self,
        mgn: Address,
        account: Address,
    ) -> Result<U256, ChainError>;

    async fn deposit(
        &self,
        pool: Address,
        amount: U256,
        from: Address,
    ) -> Result<TxReceipt, ChainError>;
}

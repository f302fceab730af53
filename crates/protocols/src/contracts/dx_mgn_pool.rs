//! DxMgnPool, coordinator and MGN token bindings.
//!
//! The coordinator contract knows both pool addresses; each pool knows its
//! deposit token, secondary token and the MGN token it accrues.

use super::interfaces::{
    IDxMgnCoordinator, IDxMgnPool, ITokenMGN, decode_returns, from_sol_address, from_sol_uint,
    to_sol_address, to_sol_uint,
};
use crate::PoolContracts;
use crate::error::ChainError;
use crate::rpc::{RpcProvider, TxReceipt};
use alloy_primitives::Address as SolAddress;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use dxmgn_domain::entities::PoolPair;
use primitive_types::{H160, U256};
use std::sync::Arc;
use tracing::{debug, info};

/// DxMgnPool calls through an [`RpcProvider`].
pub struct DxMgnContracts {
    /// RPC provider for blockchain interaction.
    provider: Arc<RpcProvider>,
    /// Coordinator contract holding both pool addresses.
    coordinator: H160,
}

impl DxMgnContracts {
    /// Creates new bindings for the pools registered in `coordinator`.
    pub fn new(provider: Arc<RpcProvider>, coordinator: H160) -> Self {
        Self {
            provider,
            coordinator,
        }
    }

    /// Returns the coordinator address.
    pub fn coordinator(&self) -> H160 {
        self.coordinator
    }

    async fn read<C>(&self, contract: H160, call: C) -> Result<C::Return, ChainError>
    where
        C: SolCall + Send,
    {
        let data = self.provider.call(contract, call.abi_encode()).await?;
        decode_returns::<C>(&data)
    }

    async fn read_address<C>(
        &self,
        contract: H160,
        call: C,
        address: impl FnOnce(C::Return) -> SolAddress + Send,
    ) -> Result<H160, ChainError>
    where
        C: SolCall + Send,
    {
        let result = self.read(contract, call).await?;
        Ok(from_sol_address(address(result)))
    }
}

#[async_trait]
impl PoolContracts for DxMgnContracts {
    async fn pool_addresses(&self) -> Result<PoolPair<H160>, ChainError> {
        let (pool1, pool2) = tokio::try_join!(
            self.read_address(self.coordinator, IDxMgnCoordinator::dxMgnPool1Call {}, |r| r._0),
            self.read_address(self.coordinator, IDxMgnCoordinator::dxMgnPool2Call {}, |r| r._0),
        )?;
        debug!(
            pool1 = %format!("{pool1:#x}"),
            pool2 = %format!("{pool2:#x}"),
            "Resolved pool addresses"
        );
        Ok(PoolPair::new(pool1, pool2))
    }

    async fn total_pool_shares(&self, pool: H160) -> Result<U256, ChainError> {
        let shares = self.read(pool, IDxMgnPool::totalPoolSharesCall {}).await?;
        Ok(from_sol_uint(shares._0))
    }

    async fn pool_shares_by_address(
        &self,
        pool: H160,
        account: H160,
    ) -> Result<Vec<U256>, ChainError> {
        let call = IDxMgnPool::poolSharesByAddressCall {
            account: to_sol_address(account),
        };
        let shares = self.read(pool, call).await?;
        Ok(shares._0.into_iter().map(from_sol_uint).collect())
    }

    async fn deposit_token(&self, pool: H160) -> Result<H160, ChainError> {
        self.read_address(pool, IDxMgnPool::depositTokenCall {}, |r| r._0)
            .await
    }

    async fn secondary_token(&self, pool: H160) -> Result<H160, ChainError> {
        self.read_address(pool, IDxMgnPool::secondaryTokenCall {}, |r| r._0)
            .await
    }

    async fn mgn_token(&self, pool: H160) -> Result<H160, ChainError> {
        self.read_address(pool, IDxMgnPool::mgnTokenCall {}, |r| r._0)
            .await
    }

    async fn mgn_locked_balance(&self, mgn: H160, account: H160) -> Result<U256, ChainError> {
        let call = ITokenMGN::lockedTokenBalancesCall {
            account: to_sol_address(account),
        };
        Ok(from_sol_uint(self.read(mgn, call).await?._0))
    }

    async fn mgn_unlocked_balance(&self, mgn: H160, account: H160) -> Result<U256, ChainError> {
        let call = ITokenMGN::unlockedTokensCall {
            account: to_sol_address(account),
        };
        Ok(from_sol_uint(self.read(mgn, call).await?.amountUnlocked))
    }

    async fn deposit(
        &self,
        pool: H160,
        amount: U256,
        from: H160,
    ) -> Result<TxReceipt, ChainError> {
        info!(
            pool = %format!("{pool:#x}"),
            amount = %amount,
            "Depositing into pool"
        );
        let data = IDxMgnPool::depositCall {
            amount: to_sol_uint(amount),
        }
        .abi_encode();
        let tx = self.provider.build_transaction(from, pool, data, None);
        self.provider.send_and_confirm(&tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_selectors() {
        assert_eq!(hex::encode(IDxMgnCoordinator::dxMgnPool1Call::SELECTOR), "c351ab21");
        assert_eq!(hex::encode(IDxMgnCoordinator::dxMgnPool2Call::SELECTOR), "e267ca5f");
        assert_eq!(hex::encode(IDxMgnPool::totalPoolSharesCall::SELECTOR), "6d0a67de");
        assert_eq!(
            hex::encode(ITokenMGN::lockedTokenBalancesCall::SELECTOR),
            "8b525d0c"
        );
    }

    #[test]
    fn test_shares_calldata() {
        let account = H160::repeat_byte(0xaa);
        let data = IDxMgnPool::poolSharesByAddressCall {
            account: to_sol_address(account),
        }
        .abi_encode();
        assert_eq!(data.len(), 36);
        assert_eq!(&data[16..36], account.as_bytes());
    }
}

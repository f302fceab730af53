//! ERC20 token and WETH bindings.

use super::interfaces::{
    IERC20, IERC20Bytes32, IWETH, decode_returns, decode_text, from_sol_uint, to_sol_address,
    to_sol_uint,
};
use crate::TokenContracts;
use crate::error::ChainError;
use crate::rpc::{RpcProvider, TxReceipt};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use primitive_types::{H160, U256};
use std::sync::Arc;
use tracing::{debug, info};

/// ERC20 calls through an [`RpcProvider`].
pub struct Erc20Contracts {
    /// RPC provider for blockchain interaction.
    provider: Arc<RpcProvider>,
}

impl Erc20Contracts {
    /// Creates new ERC20 bindings.
    pub fn new(provider: Arc<RpcProvider>) -> Self {
        Self { provider }
    }

    async fn send(
        &self,
        from: H160,
        to: H160,
        data: Vec<u8>,
        value: Option<U256>,
    ) -> Result<TxReceipt, ChainError> {
        let tx = self.provider.build_transaction(from, to, data, value);
        self.provider.send_and_confirm(&tx).await
    }
}

#[async_trait]
impl TokenContracts for Erc20Contracts {
    async fn name(&self, token: H160) -> Result<Option<String>, ChainError> {
        let data = self
            .provider
            .call(token, IERC20::nameCall {}.abi_encode())
            .await?;
        decode_text::<IERC20::nameCall, IERC20Bytes32::nameCall>(&data, |r| r._0, |r| r._0)
    }

    async fn symbol(&self, token: H160) -> Result<Option<String>, ChainError> {
        let data = self
            .provider
            .call(token, IERC20::symbolCall {}.abi_encode())
            .await?;
        decode_text::<IERC20::symbolCall, IERC20Bytes32::symbolCall>(&data, |r| r._0, |r| r._0)
    }

    async fn decimals(&self, token: H160) -> Result<Option<u8>, ChainError> {
        let data = self
            .provider
            .call(token, IERC20::decimalsCall {}.abi_encode())
            .await?;
        if data.is_empty() {
            return Ok(None);
        }
        Ok(Some(decode_returns::<IERC20::decimalsCall>(&data)?._0))
    }

    async fn balance_of(&self, token: H160, owner: H160) -> Result<U256, ChainError> {
        let data = self
            .provider
            .call(
                token,
                IERC20::balanceOfCall {
                    owner: to_sol_address(owner),
                }
                .abi_encode(),
            )
            .await?;
        Ok(from_sol_uint(decode_returns::<IERC20::balanceOfCall>(&data)?._0))
    }

    async fn allowance(
        &self,
        token: H160,
        owner: H160,
        spender: H160,
    ) -> Result<U256, ChainError> {
        let data = self
            .provider
            .call(
                token,
                IERC20::allowanceCall {
                    owner: to_sol_address(owner),
                    spender: to_sol_address(spender),
                }
                .abi_encode(),
            )
            .await?;
        let allowance = from_sol_uint(decode_returns::<IERC20::allowanceCall>(&data)?._0);
        debug!(
            token = %format!("{token:#x}"),
            spender = %format!("{spender:#x}"),
            allowance = %allowance,
            "Read allowance"
        );
        Ok(allowance)
    }

    async fn approve(
        &self,
        token: H160,
        spender: H160,
        amount: U256,
        from: H160,
    ) -> Result<TxReceipt, ChainError> {
        info!(
            token = %format!("{token:#x}"),
            spender = %format!("{spender:#x}"),
            amount = %amount,
            "Approving"
        );
        let data = IERC20::approveCall {
            spender: to_sol_address(spender),
            amount: to_sol_uint(amount),
        }
        .abi_encode();
        self.send(from, token, data, None).await
    }

    async fn transfer(
        &self,
        token: H160,
        to: H160,
        amount: U256,
        from: H160,
    ) -> Result<TxReceipt, ChainError> {
        info!(
            token = %format!("{token:#x}"),
            to = %format!("{to:#x}"),
            amount = %amount,
            "Transferring"
        );
        let data = IERC20::transferCall {
            to: to_sol_address(to),
            amount: to_sol_uint(amount),
        }
        .abi_encode();
        self.send(from, token, data, None).await
    }

    async fn deposit_eth(
        &self,
        weth: H160,
        value: U256,
        from: H160,
    ) -> Result<TxReceipt, ChainError> {
        info!(weth = %format!("{weth:#x}"), value = %value, "Wrapping ether");
        let data = IWETH::depositCall {}.abi_encode();
        self.send(from, weth, data, Some(value)).await
    }
}

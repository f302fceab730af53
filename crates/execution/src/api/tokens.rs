//! ERC20 and WETH helpers.

use super::DxMgnPoolApi;
use crate::error::ApiError;
use dxmgn_domain::value_objects::{ETHER_DECIMALS, format_units};
use dxmgn_domain::{Address, DomainError, U256};
use dxmgn_protocols::rpc::TxReceipt;
use tracing::{debug, info};

impl DxMgnPoolApi {
    pub async fn allowance(
        &self,
        token: Address,
        account: Option<Address>,
        spender: Address,
    ) -> Result<U256, ApiError> {
        let account = self.fill_default_account(account).await?;
        Ok(self.tokens.allowance(token, account, spender).await?)
    }

    pub async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        account: Option<Address>,
    ) -> Result<TxReceipt, ApiError> {
        let account = self.fill_default_account(account).await?;
        Ok(self.tokens.approve(token, spender, amount, account).await?)
    }

    pub async fn token_balance(
        &self,
        token: Address,
        account: Option<Address>,
    ) -> Result<U256, ApiError> {
        let account = self.fill_default_account(account).await?;
        Ok(self.tokens.balance_of(token, account).await?)
    }

    /// Token balance formatted in whole units of the token's decimals.
    pub async fn token_balance_formatted(
        &self,
        token: Address,
        account: Option<Address>,
    ) -> Result<String, ApiError> {
        let decimals = async { Ok::<_, ApiError>(self.tokens.decimals(token).await?) };
        let (balance, decimals) = tokio::try_join!(self.token_balance(token, account), decimals)?;
        let decimals = decimals.filter(|d| *d != 0).unwrap_or(ETHER_DECIMALS);
        Ok(format_units(balance, decimals))
    }

    pub async fn transfer(
        &self,
        token: Address,
        amount: U256,
        to: Address,
        account: Option<Address>,
    ) -> Result<TxReceipt, ApiError> {
        let account = self.fill_default_account(account).await?;
        Ok(self.tokens.transfer(token, to, amount, account).await?)
    }

    /// Wraps `amount` wei into the WETH contract at `weth`.
    pub async fn deposit_eth(
        &self,
        weth: Address,
        amount: U256,
        account: Option<Address>,
    ) -> Result<TxReceipt, ApiError> {
        let account = self.fill_default_account(account).await?;
        Ok(self.tokens.deposit_eth(weth, amount, account).await?)
    }

    /// True when `token` is this network's WETH.
    pub fn is_weth(&self, token: Address) -> bool {
        token == self.network.weth
    }

    /// Amount of ether to wrap before depositing `amount` of `token`.
    ///
    /// `None` when the token is not WETH, when the WETH balance covers
    /// the buffered amount, or when nothing is missing.
    pub async fn weth_shortfall(
        &self,
        token: Address,
        amount: U256,
        account: Address,
    ) -> Result<Option<U256>, ApiError> {
        if !self.is_weth(token) {
            return Ok(None);
        }

        let wrapped = self.tokens.balance_of(token, account).await?;
        let required = amount
            .checked_mul(U256::from(self.network.weth_buffer_percent))
            .ok_or_else(|| DomainError::Overflow(format!("{amount} * buffer")))?
            / U256::from(100u64);

        if wrapped >= required {
            debug!(
                wrapped = %wrapped,
                required = %required,
                "Enough WETH, skipping wrap"
            );
            return Ok(None);
        }

        let shortfall = amount.saturating_sub(wrapped);
        Ok((!shortfall.is_zero()).then_some(shortfall))
    }

    /// Wraps the WETH shortfall for a deposit of `amount`, if any.
    pub async fn deposit_if_eth(
        &self,
        token: Address,
        amount: U256,
        account: Address,
    ) -> Result<Option<TxReceipt>, ApiError> {
        match self.weth_shortfall(token, amount, account).await? {
            Some(shortfall) => {
                info!(
                    account = %format!("{account:#x}"),
                    shortfall = %shortfall,
                    "Wrapping ether before deposit"
                );
                let receipt = self.tokens.deposit_eth(token, shortfall, account).await?;
                Ok(Some(receipt))
            }
            None => Ok(None),
        }
    }
}

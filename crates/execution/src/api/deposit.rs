//! Approve-and-deposit flow and the false-allowance check.

use super::{AllowanceCheck, DepositReceipt, DxMgnPoolApi};
use crate::error::ApiError;
use dxmgn_domain::enums::PoolNumber;
use dxmgn_domain::{Address, U256};
use tracing::{error, info};

impl DxMgnPoolApi {
    /// Deposits `amount` into a pool, approving and wrapping ether first
    /// when needed.
    ///
    /// Pool 1 takes pool 1's deposit token, pool 2 takes pool 1's
    /// secondary token. Steps run strictly in order and each transaction
    /// is mined before the next one is sent.
    pub async fn approve_and_deposit(
        &self,
        pool: PoolNumber,
        amount: U256,
        account: Option<Address>,
    ) -> Result<DepositReceipt, ApiError> {
        let account = self.fill_default_account(account).await?;
        let pools = self.pool_addresses().await?;
        let token = match pool {
            PoolNumber::One => self.pools.deposit_token(pools.pool1).await?,
            PoolNumber::Two => self.pools.secondary_token(pools.pool1).await?,
        };
        let pool_address = *pools.get(pool);

        info!(
            pool = %pool,
            pool_address = %format!("{pool_address:#x}"),
            token = %format!("{token:#x}"),
            amount = %amount,
            "Starting deposit"
        );

        let allowance = self.tokens.allowance(token, account, pool_address).await?;
        let approval = if allowance < amount {
            Some(
                self.tokens
                    .approve(token, pool_address, amount, account)
                    .await?,
            )
        } else {
            None
        };

        let wrap = self.deposit_if_eth(token, amount, account).await?;

        let deposit = self.pools.deposit(pool_address, amount, account).await?;

        info!(
            pool = %pool,
            approved = approval.is_some(),
            wrapped = wrap.is_some(),
            hash = %format!("{:#x}", deposit.transaction_hash),
            "Deposit mined"
        );

        Ok(DepositReceipt {
            pool,
            pool_address,
            token,
            amount,
            approval,
            wrap,
            deposit,
        })
    }

    /// Checks the GNO allowance granted by `account` to `spender`.
    ///
    /// When it is below `amount`, returns the amount that tops the
    /// allowance up to `2^255`, or up to `amount` when that is larger.
    /// A failed read is logged and reported as
    /// [`AllowanceCheck::Unavailable`].
    pub async fn check_if_false_allowance(
        &self,
        amount: U256,
        account: Address,
        spender: Address,
    ) -> AllowanceCheck {
        let allowance = match self
            .tokens
            .allowance(self.network.gno, account, spender)
            .await
        {
            Ok(allowance) => allowance,
            Err(e) => {
                error!(
                    error = %e,
                    spender = %format!("{spender:#x}"),
                    "Allowance check failed"
                );
                return AllowanceCheck::Unavailable;
            }
        };

        if allowance < amount {
            // An allowance already past 2^255 is topped up to `amount` instead.
            let ceiling = (U256::one() << 255).max(amount);
            let to_approve = ceiling - allowance;
            info!(
                allowance = %allowance,
                to_approve = %to_approve,
                "Allowance below amount"
            );
            AllowanceCheck::Approve(to_approve)
        } else {
            AllowanceCheck::Sufficient
        }
    }
}

//! Pool, share and MGN reads.

use super::{DxMgnPoolApi, DxMgnPoolState};
use crate::error::ApiError;
use dxmgn_domain::entities::token::{DEPOSIT_TOKEN_TITLE, SECONDARY_TOKEN_TITLE};
use dxmgn_domain::entities::{MgnBalances, PoolPair, PoolTokens, TokenInfo, sum_shares};
use dxmgn_domain::{Address, U256};
use tracing::debug;

impl DxMgnPoolApi {
    /// Addresses of pool 1 and pool 2.
    pub async fn pool_addresses(&self) -> Result<PoolPair<Address>, ApiError> {
        Ok(self.pools.pool_addresses().await?)
    }

    /// Total shares of both pools.
    pub async fn get_total_pool_shares(&self) -> Result<PoolPair<U256>, ApiError> {
        let pools = self.pool_addresses().await?;
        let (pool1, pool2) = tokio::try_join!(
            self.pools.total_pool_shares(pools.pool1),
            self.pools.total_pool_shares(pools.pool2),
        )?;
        Ok(PoolPair::new(pool1, pool2))
    }

    /// MGN token address, as reported by pool 1.
    pub async fn get_mgn_token_address(&self) -> Result<Address, ApiError> {
        let pools = self.pool_addresses().await?;
        Ok(self.pools.mgn_token(pools.pool1).await?)
    }

    pub async fn get_mgn_token_balance(&self, account: Option<Address>) -> Result<U256, ApiError> {
        let account = self.fill_default_account(account).await?;
        let mgn = self.get_mgn_token_address().await?;
        Ok(self.tokens.balance_of(mgn, account).await?)
    }

    /// Total, locked and unlocked MGN of an account.
    pub async fn get_mgn_balances(&self, account: Option<Address>) -> Result<MgnBalances, ApiError> {
        let (account, mgn) =
            tokio::try_join!(self.fill_default_account(account), self.get_mgn_token_address())?;
        let (balance, locked, unlocked) = tokio::try_join!(
            self.tokens.balance_of(mgn, account),
            self.pools.mgn_locked_balance(mgn, account),
            self.pools.mgn_unlocked_balance(mgn, account),
        )?;
        Ok(MgnBalances {
            address: mgn,
            balance,
            locked,
            unlocked,
        })
    }

    /// Metadata of pool 1's deposit and secondary tokens. Balances are read
    /// for `account`, or the provider's account; without either the token
    /// metadata is still returned and the balances are `None`.
    pub async fn get_pool_tokens_info(&self, account: Option<Address>) -> Result<PoolTokens, ApiError> {
        let (account, pools) =
            tokio::try_join!(self.optional_account(account), self.pool_addresses())?;
        let (deposit_token, secondary_token) = tokio::try_join!(
            self.pools.deposit_token(pools.pool1),
            self.pools.secondary_token(pools.pool1),
        )?;
        let (deposit, secondary) = tokio::try_join!(
            self.token_info(DEPOSIT_TOKEN_TITLE, deposit_token, account),
            self.token_info(SECONDARY_TOKEN_TITLE, secondary_token, account),
        )?;
        Ok(PoolTokens { deposit, secondary })
    }

    async fn token_info(
        &self,
        title: &str,
        token: Address,
        account: Option<Address>,
    ) -> Result<TokenInfo, ApiError> {
        let balance = async {
            match account {
                Some(account) => self.tokens.balance_of(token, account).await.map(Some),
                None => Ok(None),
            }
        };
        let (name, symbol, decimals, balance) = tokio::try_join!(
            self.tokens.name(token),
            self.tokens.symbol(token),
            self.tokens.decimals(token),
            balance,
        )?;
        Ok(TokenInfo::from_reads(
            title, token, name, symbol, decimals, balance,
        ))
    }

    /// Sum of the account's share entries in each pool.
    pub async fn calculate_user_participation(
        &self,
        account: Option<Address>,
    ) -> Result<PoolPair<U256>, ApiError> {
        let (account, pools) =
            tokio::try_join!(self.fill_default_account(account), self.pool_addresses())?;
        let (shares1, shares2) = tokio::try_join!(
            self.pools.pool_shares_by_address(pools.pool1, account),
            self.pools.pool_shares_by_address(pools.pool2, account),
        )?;
        debug!(
            account = %format!("{account:#x}"),
            entries1 = shares1.len(),
            entries2 = shares2.len(),
            "Read pool shares"
        );
        Ok(PoolPair::new(sum_shares(&shares1)?, sum_shares(&shares2)?))
    }

    /// Reads MGN address and balance, total shares, participation and
    /// token info in one joined call.
    pub async fn calculate_dx_mgn_pool_state(
        &self,
        account: Option<Address>,
    ) -> Result<DxMgnPoolState, ApiError> {
        let account = self.fill_default_account(account).await?;
        let (mgn_address, mgn_balance, total_shares, participation, tokens) = tokio::try_join!(
            self.get_mgn_token_address(),
            self.get_mgn_token_balance(Some(account)),
            self.get_total_pool_shares(),
            self.calculate_user_participation(Some(account)),
            self.get_pool_tokens_info(Some(account)),
        )?;
        Ok(DxMgnPoolState {
            mgn_address,
            mgn_balance,
            total_shares,
            participation,
            tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::fixture_api;
    use super::*;
    use dxmgn_domain::DomainError;
    use dxmgn_domain::entities::token::{UNKNOWN_TOKEN_NAME, UNKNOWN_TOKEN_SYMBOL};
    use dxmgn_protocols::error::ChainError;
    use dxmgn_protocols::mock::fixture;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[tokio::test]
    async fn test_total_pool_shares() {
        let (chain, api) = fixture_api();
        chain.set_total_shares(fixture::pool1(), u(100));
        chain.set_total_shares(fixture::pool2(), u(250));
        let shares = api.get_total_pool_shares().await.unwrap();
        assert_eq!(shares.into_tuple(), (u(100), u(250)));
    }

    #[tokio::test]
    async fn test_total_pool_shares_fails_if_either_read_fails() {
        let (chain, api) = fixture_api();
        chain.fail_on("total_pool_shares");
        let err = api.get_total_pool_shares().await.unwrap_err();
        assert!(matches!(err, ApiError::Chain(ChainError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_mgn_balance_uses_default_account() {
        let (chain, api) = fixture_api();
        chain.set_mgn_balances(fixture::account(), u(9), u(6), u(3));
        assert_eq!(api.get_mgn_token_address().await.unwrap(), fixture::mgn());
        assert_eq!(api.get_mgn_token_balance(None).await.unwrap(), u(9));
        assert_eq!(
            api.get_mgn_token_balance(Some(Address::repeat_byte(0x77)))
                .await
                .unwrap(),
            U256::zero()
        );

        let balances = api.get_mgn_balances(None).await.unwrap();
        assert_eq!(balances.address, fixture::mgn());
        assert_eq!(
            (balances.balance, balances.locked, balances.unlocked),
            (u(9), u(6), u(3))
        );
    }

    #[tokio::test]
    async fn test_pool_tokens_info() {
        let (chain, api) = fixture_api();
        chain.set_token_balance(fixture::deposit_token(), fixture::account(), u(5));
        chain.set_token_balance(fixture::secondary_token(), fixture::account(), u(7));

        let tokens = api.get_pool_tokens_info(None).await.unwrap();
        assert_eq!(tokens.deposit.title, DEPOSIT_TOKEN_TITLE);
        assert_eq!(tokens.deposit.symbol, "GNO");
        assert_eq!(tokens.deposit.balance, Some(u(5)));
        assert_eq!(tokens.secondary.title, SECONDARY_TOKEN_TITLE);
        assert_eq!(tokens.secondary.name, "Wrapped Ether");
        assert_eq!(tokens.secondary.address, fixture::secondary_token());
        assert_eq!(tokens.secondary.balance, Some(u(7)));
    }

    #[tokio::test]
    async fn test_pool_tokens_info_fallbacks() {
        let (chain, api) = fixture_api();
        {
            let mut state = chain.lock();
            let token = state
                .tokens
                .get_mut(&fixture::deposit_token())
                .expect("fixture token");
            token.name = Some(String::new());
            token.symbol = None;
            token.decimals = Some(0);
        }
        let tokens = api.get_pool_tokens_info(None).await.unwrap();
        assert_eq!(tokens.deposit.name, UNKNOWN_TOKEN_NAME);
        assert_eq!(tokens.deposit.symbol, UNKNOWN_TOKEN_SYMBOL);
        assert_eq!(tokens.deposit.decimals, 18);
        assert_eq!(tokens.secondary.symbol, "WETH");
    }

    #[tokio::test]
    async fn test_pool_tokens_info_without_account() {
        let (chain, api) = fixture_api();
        chain.set_account(None);

        let tokens = api.get_pool_tokens_info(None).await.unwrap();
        assert_eq!(tokens.deposit.name, "Gnosis");
        assert_eq!(tokens.deposit.decimals, 18);
        assert_eq!(tokens.secondary.symbol, "WETH");
        assert_eq!(tokens.deposit.balance, None);
        assert_eq!(tokens.secondary.balance, None);
        assert_eq!(tokens.deposit.formatted_balance(), None);
    }

    #[tokio::test]
    async fn test_pool_tokens_info_other_errors_propagate() {
        let (chain, api) = fixture_api();
        chain.set_account(None);
        chain.fail_on("name");
        assert!(api.get_pool_tokens_info(None).await.is_err());
    }

    #[tokio::test]
    async fn test_participation_sums_entries_in_any_order() {
        let (chain, api) = fixture_api();
        let account = fixture::account();
        chain.set_shares(fixture::pool1(), account, vec![u(3), u(4), u(5)]);
        chain.set_shares(fixture::pool2(), account, vec![u(5), u(3), u(4)]);
        let participation = api.calculate_user_participation(None).await.unwrap();
        assert_eq!(participation.pool1, u(12));
        assert_eq!(participation.pool2, u(12));

        chain.set_shares(fixture::pool2(), account, Vec::new());
        let participation = api.calculate_user_participation(None).await.unwrap();
        assert_eq!(participation.pool2, U256::zero());
    }

    #[tokio::test]
    async fn test_participation_overflow_is_an_error() {
        let (chain, api) = fixture_api();
        chain.set_shares(fixture::pool1(), fixture::account(), vec![U256::MAX, u(1)]);
        let err = api.calculate_user_participation(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Domain(DomainError::Overflow(_))));
    }

    #[tokio::test]
    async fn test_dx_mgn_pool_state() {
        let (chain, api) = fixture_api();
        let account = fixture::account();
        chain.set_mgn_balances(account, u(42), u(0), u(0));
        chain.set_total_shares(fixture::pool1(), u(1_000));
        chain.set_total_shares(fixture::pool2(), u(2_000));
        chain.set_shares(fixture::pool1(), account, vec![u(10), u(20)]);
        chain.set_token_balance(fixture::deposit_token(), account, u(5));

        let state = api.calculate_dx_mgn_pool_state(None).await.unwrap();
        assert_eq!(state.mgn_address, fixture::mgn());
        assert_eq!(state.mgn_balance, u(42));
        assert_eq!(state.total_shares.into_tuple(), (u(1_000), u(2_000)));
        assert_eq!(state.participation.into_tuple(), (u(30), U256::zero()));
        assert_eq!(state.tokens.deposit.balance, Some(u(5)));
        assert_eq!(state.tokens.secondary.symbol, "WETH");
    }

    #[tokio::test]
    async fn test_dx_mgn_pool_state_fails_on_any_failure() {
        let (chain, api) = fixture_api();
        chain.fail_on("symbol");
        assert!(api.calculate_dx_mgn_pool_state(None).await.is_err());
    }
}

//! In-memory chain backend.
//!
//! Implements the provider and contract traits over plain maps. Writes
//! mutate the stored state (an approval sets the allowance, wrapping ether
//! credits WETH) so sequential flows observe their own effects, and every
//! write is recorded for assertions.

use crate::error::ChainError;
use crate::rpc::{BlockInfo, BlockTag, TxReceipt};
use crate::{PoolContracts, TokenContracts, Web3Provider};
use async_trait::async_trait;
use dxmgn_domain::entities::PoolPair;
use primitive_types::{H160, H256, U256};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Fixed addresses used by [`MockChain::dx_mgn_fixture`].
pub mod fixture {
    use primitive_types::H160;

    pub fn account() -> H160 {
        H160::repeat_byte(0xaa)
    }
    pub fn pool1() -> H160 {
        H160::repeat_byte(0x01)
    }
    pub fn pool2() -> H160 {
        H160::repeat_byte(0x02)
    }
    pub fn deposit_token() -> H160 {
        H160::repeat_byte(0x10)
    }
    pub fn secondary_token() -> H160 {
        H160::repeat_byte(0x20)
    }
    pub fn mgn() -> H160 {
        H160::repeat_byte(0x30)
    }
}

/// A write performed against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Approve {
        token: H160,
        spender: H160,
        amount: U256,
        from: H160,
    },
    Transfer {
        token: H160,
        to: H160,
        amount: U256,
        from: H160,
    },
    DepositEth {
        weth: H160,
        value: U256,
        from: H160,
    },
    Deposit {
        pool: H160,
        amount: U256,
        from: H160,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MockToken {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub balances: HashMap<H160, U256>,
    pub allowances: HashMap<(H160, H160), U256>,
}

#[derive(Debug, Clone, Default)]
pub struct MockPool {
    pub deposit_token: H160,
    pub secondary_token: H160,
    pub mgn_token: H160,
    pub total_shares: U256,
    pub shares_by_address: HashMap<H160, Vec<U256>>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub account: Option<H160>,
    pub network_id: u64,
    pub eth_balances: HashMap<H160, U256>,
    pub block_timestamp: u64,
    pub pools: PoolPair<H160>,
    pub pool_state: HashMap<H160, MockPool>,
    pub tokens: HashMap<H160, MockToken>,
    pub mgn_locked: HashMap<H160, U256>,
    pub mgn_unlocked: HashMap<H160, U256>,
    pub calls: Vec<MockCall>,
    pub failing: HashSet<&'static str>,
    pub delays: HashMap<&'static str, Duration>,
    pub next_tx: u64,
}

/// In-memory chain implementing every boundary trait.
#[derive(Debug, Default)]
pub struct MockChain {
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two pools sharing a deposit and a secondary token, an MGN token and
    /// one funded account, on network id 4.
    pub fn dx_mgn_fixture() -> Self {
        let chain = Self::new();
        {
            let mut s = chain.lock();
            s.account = Some(fixture::account());
            s.network_id = 4;
            s.block_timestamp = 1_550_000_000;
            s.eth_balances
                .insert(fixture::account(), U256::from(10u64).pow(U256::from(19u64)));
            s.pools = PoolPair::new(fixture::pool1(), fixture::pool2());

            s.pool_state.insert(
                fixture::pool1(),
                MockPool {
                    deposit_token: fixture::deposit_token(),
                    secondary_token: fixture::secondary_token(),
                    mgn_token: fixture::mgn(),
                    ..MockPool::default()
                },
            );
            s.pool_state.insert(
                fixture::pool2(),
                MockPool {
                    deposit_token: fixture::secondary_token(),
                    secondary_token: fixture::deposit_token(),
                    mgn_token: fixture::mgn(),
                    ..MockPool::default()
                },
            );

            s.tokens.insert(
                fixture::deposit_token(),
                MockToken {
                    name: Some("Gnosis".to_string()),
                    symbol: Some("GNO".to_string()),
                    decimals: Some(18),
                    ..MockToken::default()
                },
            );
            s.tokens.insert(
                fixture::secondary_token(),
                MockToken {
                    name: Some("Wrapped Ether".to_string()),
                    symbol: Some("WETH".to_string()),
                    decimals: Some(18),
                    ..MockToken::default()
                },
            );
            s.tokens.insert(
                fixture::mgn(),
                MockToken {
                    name: Some("Magnolia Token".to_string()),
                    symbol: Some("MGN".to_string()),
                    decimals: Some(18),
                    ..MockToken::default()
                },
            );
        }
        chain
    }

    /// Locks the state for direct setup or inspection.
    pub fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes every later call to `method` fail.
    pub fn fail_on(&self, method: &'static str) {
        self.lock().failing.insert(method);
    }

    /// Delays every later call to `method`.
    pub fn delay(&self, method: &'static str, delay: Duration) {
        self.lock().delays.insert(method, delay);
    }

    pub fn set_account(&self, account: Option<H160>) {
        self.lock().account = account;
    }

    pub fn set_token_balance(&self, token: H160, owner: H160, amount: U256) {
        self.lock()
            .tokens
            .entry(token)
            .or_default()
            .balances
            .insert(owner, amount);
    }

    pub fn set_allowance(&self, token: H160, owner: H160, spender: H160, amount: U256) {
        self.lock()
            .tokens
            .entry(token)
            .or_default()
            .allowances
            .insert((owner, spender), amount);
    }

    pub fn set_total_shares(&self, pool: H160, shares: U256) {
        self.lock().pool_state.entry(pool).or_default().total_shares = shares;
    }

    pub fn set_shares(&self, pool: H160, account: H160, shares: Vec<U256>) {
        self.lock()
            .pool_state
            .entry(pool)
            .or_default()
            .shares_by_address
            .insert(account, shares);
    }

    pub fn set_mgn_balances(&self, account: H160, balance: U256, locked: U256, unlocked: U256) {
        let mgn = fixture::mgn();
        self.set_token_balance(mgn, account, balance);
        let mut s = self.lock();
        s.mgn_locked.insert(account, locked);
        s.mgn_unlocked.insert(account, unlocked);
    }

    /// Writes recorded so far, in submission order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    async fn enter(&self, method: &'static str) -> Result<(), ChainError> {
        let (fails, delay) = {
            let s = self.lock();
            (s.failing.contains(method), s.delays.get(method).copied())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fails {
            return Err(ChainError::Rejected(method.to_string()));
        }
        Ok(())
    }

    fn record(&self, call: MockCall) -> TxReceipt {
        let mut s = self.lock();
        s.calls.push(call);
        s.next_tx += 1;
        let mut hash = [0u8; 32];
        hash[24..].copy_from_slice(&s.next_tx.to_be_bytes());
        TxReceipt {
            transaction_hash: H256::from(hash),
            block_number: Some(U256::from(s.next_tx)),
            gas_used: Some(U256::from(21_000u64)),
            status: Some(U256::one()),
        }
    }

    fn pool(&self, pool: H160) -> Result<MockPool, ChainError> {
        self.lock()
            .pool_state
            .get(&pool)
            .cloned()
            .ok_or_else(|| ChainError::Rejected(format!("no pool at {pool:#x}")))
    }

    fn token(&self, token: H160) -> Result<MockToken, ChainError> {
        self.lock()
            .tokens
            .get(&token)
            .cloned()
            .ok_or_else(|| ChainError::Rejected(format!("no token at {token:#x}")))
    }
}

#[async_trait]
impl Web3Provider for MockChain {
    async fn current_account(&self) -> Result<H160, ChainError> {
        self.enter("current_account").await?;
        self.lock().account.ok_or(ChainError::NoAccount)
    }

    async fn network_id(&self) -> Result<u64, ChainError> {
        self.enter("network_id").await?;
        Ok(self.lock().network_id)
    }

    async fn balance(&self, account: H160) -> Result<U256, ChainError> {
        self.enter("balance").await?;
        Ok(self
            .lock()
            .eth_balances
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn block_info(&self, block: BlockTag) -> Result<BlockInfo, ChainError> {
        self.enter("block_info").await?;
        let number = match block {
            BlockTag::Number(n) => Some(U256::from(n)),
            _ => Some(U256::from(self.lock().next_tx)),
        };
        Ok(BlockInfo {
            number,
            hash: None,
            timestamp: U256::from(self.lock().block_timestamp),
        })
    }
}

#[async_trait]
impl TokenContracts for MockChain {
    async fn name(&self, token: H160) -> Result<Option<String>, ChainError> {
        self.enter("name").await?;
        Ok(self.token(token)?.name)
    }

    async fn symbol(&self, token: H160) -> Result<Option<String>, ChainError> {
        self.enter("symbol").await?;
        Ok(self.token(token)?.symbol)
    }

    async fn decimals(&self, token: H160) -> Result<Option<u8>, ChainError> {
        self.enter("decimals").await?;
        Ok(self.token(token)?.decimals)
    }

    async fn balance_of(&self, token: H160, owner: H160) -> Result<U256, ChainError> {
        self.enter("balance_of").await?;
        Ok(self
            .token(token)?
            .balances
            .get(&owner)
            .copied()
            .unwrap_or_default())
    }

    async fn allowance(
        &self,
        token: H160,
        owner: H160,
        spender: H160,
    ) -> Result<U256, ChainError> {
        self.enter("allowance").await?;
        Ok(self
            .token(token)?
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn approve(
        &self,
        token: H160,
        spender: H160,
        amount: U256,
        from: H160,
    ) -> Result<TxReceipt, ChainError> {
        self.enter("approve").await?;
        self.set_allowance(token, from, spender, amount);
        Ok(self.record(MockCall::Approve {
            token,
            spender,
            amount,
            from,
        }))
    }

    async fn transfer(
        &self,
        token: H160,
        to: H160,
        amount: U256,
        from: H160,
    ) -> Result<TxReceipt, ChainError> {
        self.enter("transfer").await?;
        {
            let mut s = self.lock();
            let entry = s.tokens.entry(token).or_default();
            let from_balance = entry.balances.get(&from).copied().unwrap_or_default();
            let remaining = from_balance
                .checked_sub(amount)
                .ok_or_else(|| ChainError::Rejected("insufficient balance".to_string()))?;
            entry.balances.insert(from, remaining);
            let to_balance = entry.balances.entry(to).or_default();
            *to_balance = to_balance.saturating_add(amount);
        }
        Ok(self.record(MockCall::Transfer {
            token,
            to,
            amount,
            from,
        }))
    }

    async fn deposit_eth(
        &self,
        weth: H160,
        value: U256,
        from: H160,
    ) -> Result<TxReceipt, ChainError> {
        self.enter("deposit_eth").await?;
        {
            let mut s = self.lock();
            let balance = s
                .tokens
                .entry(weth)
                .or_default()
                .balances
                .entry(from)
                .or_default();
            *balance = balance.saturating_add(value);
        }
        Ok(self.record(MockCall::DepositEth { weth, value, from }))
    }
}

#[async_trait]
impl PoolContracts for MockChain {
    async fn pool_addresses(&self) -> Result<PoolPair<H160>, ChainError> {
        self.enter("pool_addresses").await?;
        Ok(self.lock().pools)
    }

    async fn total_pool_shares(&self, pool: H160) -> Result<U256, ChainError> {
        self.enter("total_pool_shares").await?;
        Ok(self.pool(pool)?.total_shares)
    }

    async fn pool_shares_by_address(
        &self,
        pool: H160,
        account: H160,
    ) -> Result<Vec<U256>, ChainError> {
        self.enter("pool_shares_by_address").await?;
        Ok(self
            .pool(pool)?
            .shares_by_address
            .get(&account)
            .cloned()
            .unwrap_or_default())
    }

    async fn deposit_token(&self, pool: H160) -> Result<H160, ChainError> {
        self.enter("deposit_token").await?;
        Ok(self.pool(pool)?.deposit_token)
    }

    async fn secondary_token(&self, pool: H160) -> Result<H160, ChainError> {
        self.enter("secondary_token").await?;
        Ok(self.pool(pool)?.secondary_token)
    }

    async fn mgn_token(&self, pool: H160) -> Result<H160, ChainError> {
        self.enter("mgn_token").await?;
        Ok(self.pool(pool)?.mgn_token)
    }

    async fn mgn_locked_balance(&self, _mgn: H160, account: H160) -> Result<U256, ChainError> {
        self.enter("mgn_locked_balance").await?;
        Ok(self
            .lock()
            .mgn_locked
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn mgn_unlocked_balance(&self, _mgn: H160, account: H160) -> Result<U256, ChainError> {
        self.enter("mgn_unlocked_balance").await?;
        Ok(self
            .lock()
            .mgn_unlocked
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn deposit(
        &self,
        pool: H160,
        amount: U256,
        from: H160,
    ) -> Result<TxReceipt, ChainError> {
        self.enter("deposit").await?;
        {
            let mut s = self.lock();
            let entry = s.pool_state.entry(pool).or_default();
            entry.total_shares = entry.total_shares.saturating_add(amount);
            entry.shares_by_address.entry(from).or_default().push(amount);
        }
        Ok(self.record(MockCall::Deposit { pool, amount, from }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_reads() {
        let chain = MockChain::dx_mgn_fixture();
        assert_eq!(chain.current_account().await.unwrap(), fixture::account());
        assert_eq!(
            chain.deposit_token(fixture::pool1()).await.unwrap(),
            fixture::deposit_token()
        );
        assert_eq!(
            chain.secondary_token(fixture::pool2()).await.unwrap(),
            fixture::deposit_token()
        );
        assert_eq!(
            chain.name(fixture::deposit_token()).await.unwrap().as_deref(),
            Some("Gnosis")
        );
    }

    #[tokio::test]
    async fn test_approve_updates_allowance() {
        let chain = MockChain::dx_mgn_fixture();
        let token = fixture::deposit_token();
        let owner = fixture::account();
        let spender = fixture::pool1();
        chain
            .approve(token, spender, U256::from(100u64), owner)
            .await
            .unwrap();
        assert_eq!(
            chain.allowance(token, owner, spender).await.unwrap(),
            U256::from(100u64)
        );
        assert_eq!(chain.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fail_on_rejects() {
        let chain = MockChain::dx_mgn_fixture();
        chain.fail_on("total_pool_shares");
        let err = chain.total_pool_shares(fixture::pool1()).await.unwrap_err();
        assert!(matches!(err, ChainError::Rejected(m) if m == "total_pool_shares"));
    }
}

//! Action creators.
//!
//! Async creators query the chain first and dispatch once with the result,
//! so no half-applied fetch is ever visible. Each async creator takes a
//! ticket from [`RequestVersions`] before it starts; when a newer call of
//! the same kind was started in the meantime, the older result is dropped.

use crate::actions::{
    Action, DxMgnPoolPatch, MgnPatch, PoolPatch, PoolTokenInfo, ProviderPatch, UserPatch,
    UserStatePatch,
};
use crate::state::AppState;
use crate::store::Store;
use dxmgn_domain::enums::PoolNumber;
use dxmgn_domain::value_objects::{ETHER_DECIMALS, parse_units};
use dxmgn_execution::api::{DepositReceipt, DxMgnPoolApi, DxMgnPoolState, UserSnapshot};
use dxmgn_execution::error::ApiError;
use dxmgn_execution::sync::WatchEvent;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, Weak};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Position of one async request among those of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub kind: &'static str,
    pub version: u64,
}

/// Monotonic per-kind request counters.
#[derive(Debug, Default)]
pub struct RequestVersions {
    latest: Mutex<HashMap<&'static str, u64>>,
}

impl RequestVersions {
    /// Starts a request of `kind`, superseding earlier ones.
    pub fn begin(&self, kind: &'static str) -> RequestTicket {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let version = latest.entry(kind).or_insert(0);
        *version += 1;
        RequestTicket {
            kind,
            version: *version,
        }
    }

    /// True when no request of the same kind started after `ticket`.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(ticket.kind).copied() == Some(ticket.version)
    }
}

/// Result of an async action creator.
#[derive(Debug, Clone)]
pub enum Dispatched {
    /// The result was applied; holds the new tree.
    Applied(Arc<AppState>),
    /// A newer request of the same kind started first; nothing was applied.
    Superseded,
}

impl Dispatched {
    pub fn state(&self) -> Option<&Arc<AppState>> {
        match self {
            Dispatched::Applied(state) => Some(state),
            Dispatched::Superseded => None,
        }
    }
}

/// A tree together with the creators that act on it.
pub struct StoreContext {
    pub state: Arc<AppState>,
    pub dispatchers: Dispatchers,
}

/// Action creators bound to one store and one aggregator.
///
/// Clones share the store, the request versions and the aggregator slot.
#[derive(Clone)]
pub struct Dispatchers {
    store: Arc<Store>,
    api: Arc<RwLock<Arc<DxMgnPoolApi>>>,
    versions: Arc<RequestVersions>,
    context: Arc<Mutex<Weak<StoreContext>>>,
}

impl Dispatchers {
    pub fn new(store: Arc<Store>, api: Arc<DxMgnPoolApi>) -> Self {
        Self {
            store,
            api: Arc::new(RwLock::new(api)),
            versions: Arc::new(RequestVersions::default()),
            context: Arc::new(Mutex::new(Weak::new())),
        }
    }

    /// Swaps the aggregator, e.g. after reconnecting to another node.
    /// Every clone and every cached [`StoreContext`] sees the new one;
    /// requests already in flight keep the old one.
    pub fn reinitialize(&self, api: Arc<DxMgnPoolApi>) {
        info!("Reinitializing dispatchers with a new client");
        *self.api.write().unwrap_or_else(|e| e.into_inner()) = api;
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn api(&self) -> Arc<DxMgnPoolApi> {
        self.api.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn versions(&self) -> &Arc<RequestVersions> {
        &self.versions
    }

    /// Current tree and these dispatchers. The same `Arc` is returned for
    /// as long as the tree is unchanged and a previous context is alive.
    pub fn context(&self) -> Arc<StoreContext> {
        let state = self.store.get_state();
        let mut cached = self.context.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(context) = cached.upgrade() {
            if Arc::ptr_eq(&context.state, &state) {
                return context;
            }
        }
        let context = Arc::new(StoreContext {
            state,
            dispatchers: self.clone(),
        });
        *cached = Arc::downgrade(&context);
        context
    }

    pub fn set_input_amount(&self, amount: Decimal) -> Arc<AppState> {
        self.store.dispatch(Action::SetInputAmount(amount))
    }

    pub fn app_loading(&self, loading: bool) -> Arc<AppState> {
        self.store.dispatch(Action::SetAppLoading(loading))
    }

    pub fn show_modal(&self, modal: Option<String>) -> Arc<AppState> {
        self.store.dispatch(Action::ShowModal(modal))
    }

    pub fn set_active_provider(&self, provider: Option<String>) -> Arc<AppState> {
        self.store.dispatch(Action::SetActiveProvider(provider))
    }

    pub fn register_providers(&self, providers: Vec<String>) -> Arc<AppState> {
        self.store.dispatch(Action::RegisterProviders(providers))
    }

    pub fn set_mgn_balances(&self, patch: MgnPatch) -> Arc<AppState> {
        self.store.dispatch(Action::SetMgnBalances(patch))
    }

    /// Applies a watcher event to the user and provider subtrees.
    ///
    /// The event counts as the newest user-state request, so a
    /// `set_user_state` still in flight is dropped when it lands.
    pub fn apply_watch_event(&self, event: &WatchEvent) -> Arc<AppState> {
        self.versions.begin(crate::actions::SET_USER_STATE);
        match event {
            WatchEvent::Changed(snapshot) => self
                .store
                .dispatch(Action::SetUserState(user_state_patch(snapshot))),
            WatchEvent::Unavailable(_) => self.store.dispatch(Action::SetUserAccount(None)),
        }
    }

    /// Applies watcher events until the channel closes.
    pub async fn follow(&self, mut events: mpsc::Receiver<WatchEvent>) {
        while let Some(event) = events.recv().await {
            self.apply_watch_event(&event);
        }
    }

    /// Reads account, balance and network and stores them.
    pub async fn set_user_state(&self) -> Result<Dispatched, ApiError> {
        let ticket = self.versions.begin(crate::actions::SET_USER_STATE);
        let snapshot = self.api().user_state().await?;
        Ok(self.apply(ticket, Action::SetUserState(user_state_patch(&snapshot))))
    }

    /// Reads the full pool overview and stores it.
    pub async fn set_dx_mgn_pool_state(&self) -> Result<Dispatched, ApiError> {
        let ticket = self.versions.begin(crate::actions::SET_DX_MGN_POOL_STATE);
        let account = self.store.select(|s| s.user.account);
        let pool_state = self.api().calculate_dx_mgn_pool_state(account).await?;
        Ok(self.apply(ticket, Action::SetDxMgnPoolState(pool_patch(&pool_state))))
    }

    /// Reads token names, symbols and balances and stores them.
    pub async fn set_pool_token_info(&self) -> Result<Dispatched, ApiError> {
        let ticket = self.versions.begin(crate::actions::SET_POOL_TOKEN_INFO);
        let account = self.store.select(|s| s.user.account);
        let tokens = self.api().get_pool_tokens_info(account).await?;
        let info = PoolTokenInfo {
            name: tokens.deposit.name,
            symbol: tokens.deposit.symbol,
            balance: tokens.deposit.balance,
            name2: tokens.secondary.name,
            symbol2: tokens.secondary.symbol,
            balance2: tokens.secondary.balance,
        };
        Ok(self.apply(ticket, Action::SetPoolTokenInfo(info)))
    }

    /// Reads total, locked and unlocked MGN and stores them.
    pub async fn refresh_mgn_balances(&self) -> Result<Dispatched, ApiError> {
        let ticket = self.versions.begin(crate::actions::SET_MGN_BALANCES);
        let account = self.store.select(|s| s.user.account);
        let balances = self.api().get_mgn_balances(account).await?;
        let patch = MgnPatch {
            address: Some(balances.address),
            balance: Some(balances.balance),
            locked_balance: Some(balances.locked),
            unlocked_balance: Some(balances.unlocked),
        };
        Ok(self.apply(ticket, Action::SetMgnBalances(patch)))
    }

    /// Deposits the current input amount, read as whole ether-decimal
    /// tokens, into `pool`.
    pub async fn set_deposit_amount(&self, pool: PoolNumber) -> Result<DepositReceipt, ApiError> {
        let (account, input) = self.store.select(|s| (s.user.account, s.input_amount));
        let amount = parse_units(input, ETHER_DECIMALS)?;
        info!(pool = %pool, amount = %input, "Depositing input amount");
        let receipt = self.api().approve_and_deposit(pool, amount, account).await?;
        info!(
            pool = %pool,
            hash = %format!("{:#x}", receipt.deposit.transaction_hash),
            "Deposit receipt"
        );
        Ok(receipt)
    }

    fn apply(&self, ticket: RequestTicket, action: Action) -> Dispatched {
        if !self.versions.is_current(&ticket) {
            warn!(
                kind = ticket.kind,
                version = ticket.version,
                "Dropping superseded result"
            );
            return Dispatched::Superseded;
        }
        Dispatched::Applied(self.store.dispatch(action))
    }
}

fn user_state_patch(snapshot: &UserSnapshot) -> UserStatePatch {
    UserStatePatch {
        user: UserPatch {
            account: Some(snapshot.account),
            balance: Some(snapshot.balance),
        },
        provider: ProviderPatch {
            network: Some(snapshot.network),
            ..ProviderPatch::default()
        },
    }
}

fn pool_patch(state: &DxMgnPoolState) -> DxMgnPoolPatch {
    let deposit = &state.tokens.deposit;
    let secondary = &state.tokens.secondary;
    DxMgnPoolPatch {
        pool1: PoolPatch {
            your_share: Some(state.participation.pool1),
            total_share: Some(state.total_shares.pool1),
            deposit_token: Some(deposit.name.clone()),
            deposit_symbol: Some(deposit.symbol.clone()),
            deposit_decimals: Some(deposit.decimals),
            secondary_token: Some(secondary.name.clone()),
            secondary_symbol: Some(secondary.symbol.clone()),
            secondary_decimals: Some(secondary.decimals),
            token_balance: deposit.balance,
        },
        pool2: PoolPatch {
            your_share: Some(state.participation.pool2),
            total_share: Some(state.total_shares.pool2),
            deposit_token: Some(secondary.name.clone()),
            deposit_symbol: Some(secondary.symbol.clone()),
            deposit_decimals: Some(secondary.decimals),
            secondary_token: Some(deposit.name.clone()),
            secondary_symbol: Some(deposit.symbol.clone()),
            secondary_decimals: Some(deposit.decimals),
            token_balance: secondary.balance,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxmgn_domain::enums::Network;
    use dxmgn_domain::{Address, U256};
    use dxmgn_execution::config::NetworkConfig;
    use dxmgn_protocols::mock::{MockCall, MockChain, fixture};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn fixture_api(chain: Arc<MockChain>) -> Arc<DxMgnPoolApi> {
        let network = NetworkConfig {
            weth: fixture::secondary_token(),
            gno: fixture::deposit_token(),
            ..NetworkConfig::for_network(Network::Rinkeby)
        };
        Arc::new(DxMgnPoolApi::with_backend(chain, network))
    }

    fn setup() -> (Arc<MockChain>, Dispatchers) {
        let chain = Arc::new(MockChain::dx_mgn_fixture());
        let dispatchers = Dispatchers::new(Arc::new(Store::default()), fixture_api(chain.clone()));
        (chain, dispatchers)
    }

    #[test]
    fn test_request_versions() {
        let versions = RequestVersions::default();
        let first = versions.begin("A");
        assert!(versions.is_current(&first));
        let other = versions.begin("B");
        assert!(versions.is_current(&first));
        let second = versions.begin("A");
        assert!(!versions.is_current(&first));
        assert!(versions.is_current(&second));
        assert!(versions.is_current(&other));
    }

    #[tokio::test]
    async fn test_set_user_state() {
        let (_chain, dispatchers) = setup();
        let outcome = dispatchers.set_user_state().await.unwrap();
        let state = outcome.state().unwrap();
        assert_eq!(state.user.account, Some(fixture::account()));
        assert_eq!(state.user.balance, Some(U256::exp10(19)));
        assert_eq!(state.provider.network, Some(Network::Rinkeby));
    }

    #[tokio::test]
    async fn test_set_dx_mgn_pool_state() {
        let (chain, dispatchers) = setup();
        let account = fixture::account();
        chain.set_total_shares(fixture::pool1(), U256::from(100u64));
        chain.set_shares(fixture::pool2(), account, vec![U256::from(2u64), U256::from(3u64)]);
        chain.set_token_balance(fixture::secondary_token(), account, U256::from(7u64));

        let outcome = dispatchers.set_dx_mgn_pool_state().await.unwrap();
        let pools = &outcome.state().unwrap().dx_mgn_pool;
        assert_eq!(pools.pool1.total_share, U256::from(100u64));
        assert_eq!(pools.pool1.deposit_token, "Gnosis");
        assert_eq!(pools.pool1.secondary_symbol, "WETH");
        assert_eq!(pools.pool2.your_share, U256::from(5u64));
        assert_eq!(pools.pool2.deposit_symbol, "WETH");
        assert_eq!(pools.pool2.secondary_token, "Gnosis");
        assert_eq!(pools.pool2.token_balance, Some(U256::from(7u64)));
    }

    #[tokio::test]
    async fn test_failed_fetch_dispatches_nothing() {
        let (chain, dispatchers) = setup();
        chain.fail_on("mgn_token");
        let before = dispatchers.store().get_state();
        assert!(dispatchers.set_dx_mgn_pool_state().await.is_err());
        assert!(Arc::ptr_eq(&before, &dispatchers.store().get_state()));
    }

    #[tokio::test]
    async fn test_pool_token_info_and_mgn_balances() {
        let (chain, dispatchers) = setup();
        chain.set_mgn_balances(fixture::account(), U256::from(9u64), U256::from(6u64), U256::from(3u64));

        dispatchers.set_pool_token_info().await.unwrap();
        let outcome = dispatchers.refresh_mgn_balances().await.unwrap();
        let state = outcome.state().unwrap();
        assert_eq!(state.dx_mgn_pool.pool1.deposit_token, "Gnosis");
        assert_eq!(state.dx_mgn_pool.pool2.deposit_token, "Wrapped Ether");
        assert_eq!(state.token_mgn.address, Some(fixture::mgn()));
        assert_eq!(state.token_mgn.locked_balance, Some(U256::from(6u64)));
    }

    // Without the version check the slower, older request would overwrite
    // the newer result when it finally lands.
    #[tokio::test]
    async fn test_stale_result_is_dropped_by_request_version() {
        let (chain, dispatchers) = setup();
        chain.delay("balance", Duration::from_millis(200));

        let slow = {
            let dispatchers = dispatchers.clone();
            tokio::spawn(async move { dispatchers.set_user_state().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let newer = Address::repeat_byte(0x44);
        chain.set_account(Some(newer));
        chain.delay("balance", Duration::ZERO);
        let fast = dispatchers.set_user_state().await.unwrap();
        assert!(matches!(fast, Dispatched::Applied(_)));

        let stale = slow.await.unwrap().unwrap();
        assert!(matches!(stale, Dispatched::Superseded));
        assert_eq!(dispatchers.store().get_state().user.account, Some(newer));
    }

    #[tokio::test]
    async fn test_watch_event_supersedes_pending_user_state() {
        let (chain, dispatchers) = setup();
        chain.delay("balance", Duration::from_millis(200));

        let slow = {
            let dispatchers = dispatchers.clone();
            tokio::spawn(async move { dispatchers.set_user_state().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let newer = Address::repeat_byte(0x44);
        dispatchers.apply_watch_event(&WatchEvent::Changed(UserSnapshot {
            account: newer,
            balance: U256::one(),
            network: Network::Rinkeby,
        }));

        let stale = slow.await.unwrap().unwrap();
        assert!(matches!(stale, Dispatched::Superseded));
        let state = dispatchers.store().get_state();
        assert_eq!(state.user.account, Some(newer));
        assert_eq!(state.user.balance, Some(U256::one()));
    }

    #[tokio::test]
    async fn test_pool_token_info_without_account() {
        let (chain, dispatchers) = setup();
        chain.set_account(None);

        let outcome = dispatchers.set_pool_token_info().await.unwrap();
        let pools = &outcome.state().unwrap().dx_mgn_pool;
        assert_eq!(pools.pool1.deposit_token, "Gnosis");
        assert_eq!(pools.pool2.deposit_symbol, "WETH");
        assert_eq!(pools.pool1.token_balance, None);
        assert_eq!(pools.pool2.token_balance, None);
    }

    #[tokio::test]
    async fn test_set_deposit_amount_converts_input() {
        let (chain, dispatchers) = setup();
        dispatchers.set_input_amount(dec!(1.5));
        let amount = U256::exp10(18) * U256::from(3u64) / U256::from(2u64);
        chain.set_allowance(fixture::deposit_token(), fixture::account(), fixture::pool1(), amount);

        let receipt = dispatchers
            .set_deposit_amount(PoolNumber::One)
            .await
            .unwrap();
        assert_eq!(receipt.amount, amount);
        assert!(receipt.approval.is_none());
        assert_eq!(
            chain.calls(),
            vec![MockCall::Deposit {
                pool: fixture::pool1(),
                amount,
                from: fixture::account(),
            }]
        );
    }

    #[tokio::test]
    async fn test_watch_events_update_user() {
        let (_chain, dispatchers) = setup();
        let snapshot = UserSnapshot {
            account: fixture::account(),
            balance: U256::one(),
            network: Network::Main,
        };
        let (tx, rx) = mpsc::channel(4);
        tx.send(WatchEvent::Changed(snapshot)).await.unwrap();
        tx.send(WatchEvent::Unavailable("down".into())).await.unwrap();
        drop(tx);
        dispatchers.follow(rx).await;

        let state = dispatchers.store().get_state();
        assert_eq!(state.user.account, None);
        assert_eq!(state.user.balance, Some(U256::one()));
        assert_eq!(state.provider.network, Some(Network::Main));
    }

    #[tokio::test]
    async fn test_context_is_memoized_per_tree() {
        let (_chain, dispatchers) = setup();
        let first = dispatchers.context();
        let again = dispatchers.context();
        assert!(Arc::ptr_eq(&first, &again));

        dispatchers.app_loading(true);
        let changed = dispatchers.context();
        assert!(!Arc::ptr_eq(&first, &changed));
        assert!(changed.state.loading);
        assert!(Arc::ptr_eq(&changed.state, &changed.dispatchers.store().get_state()));
    }

    #[tokio::test]
    async fn test_reinitialize_reaches_clones_and_context() {
        let (_chain, dispatchers) = setup();
        let context = dispatchers.context();
        let clone = dispatchers.clone();

        let other = Arc::new(MockChain::dx_mgn_fixture());
        other.set_account(Some(Address::repeat_byte(0x55)));
        let replacement = fixture_api(other);
        dispatchers.reinitialize(replacement.clone());

        assert!(Arc::ptr_eq(&dispatchers.api(), &replacement));
        assert!(Arc::ptr_eq(&clone.api(), &replacement));
        assert!(Arc::ptr_eq(&context.dispatchers.api(), &replacement));
        assert!(Arc::ptr_eq(&dispatchers.context().dispatchers.api(), &replacement));

        let outcome = context.dispatchers.set_user_state().await.unwrap();
        assert_eq!(
            outcome.state().unwrap().user.account,
            Some(Address::repeat_byte(0x55))
        );
    }

    #[tokio::test]
    async fn test_sync_creators() {
        let (_chain, dispatchers) = setup();
        dispatchers.register_providers(vec!["node".into()]);
        dispatchers.set_active_provider(Some("node".into()));
        dispatchers.show_modal(Some("hello".into()));
        let state = dispatchers.set_mgn_balances(MgnPatch {
            balance: Some(U256::from(4u64)),
            ..MgnPatch::default()
        });
        assert_eq!(state.provider.providers, vec!["node"]);
        assert_eq!(state.provider.active_provider.as_deref(), Some("node"));
        assert_eq!(state.show_modal.as_deref(), Some("hello"));
        assert_eq!(state.token_mgn.balance, Some(U256::from(4u64)));
    }
}

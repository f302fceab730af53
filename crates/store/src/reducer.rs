//! State transitions.

use crate::actions::{
    Action, DxMgnPoolPatch, MgnPatch, PoolPatch, PoolTokenInfo, ProviderPatch, UserPatch,
};
use crate::state::{AppState, DxMgnPoolSlice, MgnState, PoolState, ProviderState, UserState};
use std::sync::Arc;

/// Applies `action` to `state`, returning the next tree.
///
/// The previous tree is never mutated. Each action replaces only its own
/// subtree; patch fields left `None` keep their current value.
pub fn reduce(state: &Arc<AppState>, action: &Action) -> Arc<AppState> {
    let mut next = AppState::clone(state);

    match action {
        Action::SetInputAmount(amount) => next.input_amount = *amount,
        Action::SetMgnBalances(patch) => merge_mgn(&mut next.token_mgn, patch),
        Action::SetPoolTokenInfo(info) => mirror_token_info(&mut next.dx_mgn_pool, info),
        Action::SetDxMgnPoolState(patch) => merge_pools(&mut next.dx_mgn_pool, patch),
        Action::SetUserAccount(account) => next.user.account = *account,
        Action::SetUserBalance(balance) => next.user.balance = *balance,
        Action::SetUserState(patch) => {
            merge_user(&mut next.user, &patch.user);
            merge_provider(&mut next.provider, &patch.provider);
        }
        Action::SetActiveProvider(provider) => next.provider.active_provider = provider.clone(),
        Action::RegisterProviders(providers) => {
            let mut registered = providers.clone();
            registered.append(&mut next.provider.providers);
            next.provider.providers = registered;
        }
        Action::SetAppLoading(loading) => next.loading = *loading,
        Action::ShowModal(modal) => next.show_modal = modal.clone(),
    }

    Arc::new(next)
}

fn set<T: Clone>(field: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

fn set_some<T: Clone>(field: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        *field = value.clone();
    }
}

fn merge_mgn(mgn: &mut MgnState, patch: &MgnPatch) {
    set_some(&mut mgn.address, &patch.address);
    set_some(&mut mgn.balance, &patch.balance);
    set_some(&mut mgn.locked_balance, &patch.locked_balance);
    set_some(&mut mgn.unlocked_balance, &patch.unlocked_balance);
}

fn merge_pool(pool: &mut PoolState, patch: &PoolPatch) {
    set(&mut pool.your_share, &patch.your_share);
    set(&mut pool.total_share, &patch.total_share);
    set(&mut pool.deposit_token, &patch.deposit_token);
    set(&mut pool.deposit_symbol, &patch.deposit_symbol);
    set_some(&mut pool.deposit_decimals, &patch.deposit_decimals);
    set(&mut pool.secondary_token, &patch.secondary_token);
    set(&mut pool.secondary_symbol, &patch.secondary_symbol);
    set_some(&mut pool.secondary_decimals, &patch.secondary_decimals);
    set_some(&mut pool.token_balance, &patch.token_balance);
}

fn merge_pools(pools: &mut DxMgnPoolSlice, patch: &DxMgnPoolPatch) {
    merge_pool(&mut pools.pool1, &patch.pool1);
    merge_pool(&mut pools.pool2, &patch.pool2);
}

// Pool 2 deposits what pool 1 holds as secondary, and the other way round.
fn mirror_token_info(pools: &mut DxMgnPoolSlice, info: &PoolTokenInfo) {
    pools.pool1.deposit_token = info.name.clone();
    pools.pool1.deposit_symbol = info.symbol.clone();
    pools.pool1.secondary_token = info.name2.clone();
    pools.pool1.secondary_symbol = info.symbol2.clone();
    pools.pool1.token_balance = info.balance;

    pools.pool2.deposit_token = info.name2.clone();
    pools.pool2.deposit_symbol = info.symbol2.clone();
    pools.pool2.secondary_token = info.name.clone();
    pools.pool2.secondary_symbol = info.symbol.clone();
    pools.pool2.token_balance = info.balance2;
}

fn merge_user(user: &mut UserState, patch: &UserPatch) {
    set_some(&mut user.account, &patch.account);
    set_some(&mut user.balance, &patch.balance);
}

fn merge_provider(provider: &mut ProviderState, patch: &ProviderPatch) {
    set_some(&mut provider.active_provider, &patch.active_provider);
    set_some(&mut provider.network, &patch.network);
    set(&mut provider.providers, &patch.providers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxmgn_domain::enums::Network;
    use dxmgn_domain::{Address, U256};
    use rust_decimal_macros::dec;

    fn token_info() -> PoolTokenInfo {
        PoolTokenInfo {
            name: "A".into(),
            symbol: "B".into(),
            balance: Some(U256::from(5u64)),
            name2: "C".into(),
            symbol2: "D".into(),
            balance2: Some(U256::from(7u64)),
        }
    }

    #[test]
    fn test_pool_token_info_is_mirrored() {
        let state = Arc::new(AppState::default());
        let next = reduce(&state, &Action::SetPoolTokenInfo(token_info()));
        let pools = &next.dx_mgn_pool;

        assert_eq!(pools.pool1.deposit_token, "A");
        assert_eq!(pools.pool1.secondary_token, "C");
        assert_eq!(pools.pool2.deposit_token, "C");
        assert_eq!(pools.pool2.secondary_token, "A");
        assert_eq!(pools.pool1.deposit_symbol, "B");
        assert_eq!(pools.pool2.deposit_symbol, "D");
        assert_eq!(pools.pool1.token_balance, Some(U256::from(5u64)));
        assert_eq!(pools.pool2.token_balance, Some(U256::from(7u64)));

        // Untouched fields and the previous tree survive.
        assert_eq!(pools.pool1.total_share, U256::zero());
        assert_eq!(state.dx_mgn_pool.pool1.deposit_token, "...");
    }

    #[test]
    fn test_set_input_amount_is_idempotent() {
        let state = Arc::new(AppState::default());
        let once = reduce(&state, &Action::SetInputAmount(dec!(42)));
        let twice = reduce(&once, &Action::SetInputAmount(dec!(42)));
        assert_eq!(once.input_amount, dec!(42));
        assert_eq!(twice.input_amount, dec!(42));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_register_providers_prepends() {
        let state = Arc::new(AppState::default());
        let first = reduce(&state, &Action::RegisterProviders(vec!["node".into()]));
        let second = reduce(
            &first,
            &Action::RegisterProviders(vec!["wallet".into(), "infura".into()]),
        );
        assert_eq!(second.provider.providers, vec!["wallet", "infura", "node"]);
    }

    #[test]
    fn test_patches_keep_unset_fields() {
        let state = Arc::new(AppState::default());
        let with_pool = reduce(
            &state,
            &Action::SetDxMgnPoolState(DxMgnPoolPatch {
                pool1: PoolPatch {
                    total_share: Some(U256::from(100u64)),
                    deposit_token: Some("Gnosis".into()),
                    ..PoolPatch::default()
                },
                pool2: PoolPatch::default(),
            }),
        );
        let updated = reduce(
            &with_pool,
            &Action::SetDxMgnPoolState(DxMgnPoolPatch {
                pool1: PoolPatch {
                    your_share: Some(U256::from(3u64)),
                    ..PoolPatch::default()
                },
                pool2: PoolPatch::default(),
            }),
        );
        let pool1 = &updated.dx_mgn_pool.pool1;
        assert_eq!(pool1.total_share, U256::from(100u64));
        assert_eq!(pool1.deposit_token, "Gnosis");
        assert_eq!(pool1.your_share, U256::from(3u64));
        assert_eq!(updated.dx_mgn_pool.pool2, PoolState::default());

        let mgn = reduce(
            &updated,
            &Action::SetMgnBalances(MgnPatch {
                balance: Some(U256::from(9u64)),
                ..MgnPatch::default()
            }),
        );
        assert_eq!(mgn.token_mgn.balance, Some(U256::from(9u64)));
        assert_eq!(mgn.token_mgn.address, None);
    }

    #[test]
    fn test_user_state_merges_user_and_provider() {
        let state = Arc::new(AppState::default());
        let state = reduce(&state, &Action::SetActiveProvider(Some("wallet".into())));
        let next = reduce(
            &state,
            &Action::SetUserState(crate::actions::UserStatePatch {
                user: UserPatch {
                    account: Some(Address::repeat_byte(1)),
                    balance: Some(U256::from(10u64)),
                },
                provider: ProviderPatch {
                    network: Some(Network::Main),
                    ..ProviderPatch::default()
                },
            }),
        );
        assert_eq!(next.user.account, Some(Address::repeat_byte(1)));
        assert_eq!(next.provider.network, Some(Network::Main));
        assert_eq!(next.provider.active_provider.as_deref(), Some("wallet"));

        let cleared = reduce(&next, &Action::SetUserAccount(None));
        assert_eq!(cleared.user.account, None);
        assert_eq!(cleared.user.balance, Some(U256::from(10u64)));
    }

    #[test]
    fn test_flags() {
        let state = Arc::new(AppState::default());
        let state = reduce(&state, &Action::SetAppLoading(true));
        let state = reduce(&state, &Action::ShowModal(Some("Deposit mined".into())));
        let state = reduce(&state, &Action::SetUserBalance(Some(U256::one())));
        assert!(state.loading);
        assert_eq!(state.show_modal.as_deref(), Some("Deposit mined"));
        assert_eq!(state.user.balance, Some(U256::one()));
    }
}

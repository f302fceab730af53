//! The state container.

use crate::actions::{Action, RawAction};
use crate::reducer::reduce;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Holds the current [`AppState`] and applies actions to it.
///
/// The tree lives in a `watch` channel: every dispatch swaps in a new
/// `Arc`, so readers see either the old tree or the new one.
pub struct Store {
    state: watch::Sender<Arc<AppState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    /// Creates a store holding `initial`.
    pub fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self { state }
    }

    /// Current tree.
    pub fn get_state(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    /// Reads a slice of the current tree.
    pub fn select<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        f(&self.state.borrow())
    }

    /// Applies `action` and returns the new tree.
    pub fn dispatch(&self, action: Action) -> Arc<AppState> {
        let kind = action.kind();
        let mut next = None;
        self.state.send_modify(|state| {
            let reduced = reduce(state, &action);
            *state = reduced.clone();
            next = Some(reduced);
        });
        debug!(kind, "Dispatched action");
        next.unwrap_or_else(|| self.get_state())
    }

    /// Applies a raw action. An unknown kind or a payload that does not
    /// fit leaves the tree untouched and returns the same `Arc`.
    pub fn dispatch_raw(&self, raw: &RawAction) -> Arc<AppState> {
        match Action::from_raw(raw) {
            Some(action) => self.dispatch(action),
            None => {
                warn!(kind = %raw.kind, "Ignoring unrecognized action");
                self.get_state()
            }
        }
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> StateSubscription {
        StateSubscription {
            rx: self.state.subscribe(),
        }
    }
}

/// Receives every new tree dispatched after subscribing.
pub struct StateSubscription {
    rx: watch::Receiver<Arc<AppState>>,
}

impl StateSubscription {
    /// Waits for the next tree. `None` once the store is dropped.
    pub async fn changed(&mut self) -> Option<Arc<AppState>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Latest tree, without waiting.
    pub fn current(&self) -> Arc<AppState> {
        self.rx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::SET_INPUT_AMOUNT;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_unknown_kind_returns_same_tree() {
        let store = Store::default();
        let before = store.get_state();
        let after = store.dispatch_raw(&RawAction::new("UNKNOWN_KIND", json!({ "x": 1 })));
        assert!(Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&before, &store.get_state()));
    }

    #[test]
    fn test_malformed_payload_is_identity() {
        let store = Store::default();
        let before = store.get_state();
        let after = store.dispatch_raw(&RawAction::new(SET_INPUT_AMOUNT, json!({ "nope": [] })));
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_dispatch_replaces_tree() {
        let store = Store::default();
        let before = store.get_state();
        let after = store.dispatch(Action::SetInputAmount(dec!(42)));
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(before.input_amount.is_zero());
        assert_eq!(store.select(|s| s.input_amount), dec!(42));

        let raw = store.dispatch_raw(&RawAction::new(SET_INPUT_AMOUNT, json!(42)));
        assert_eq!(raw.input_amount, dec!(42));
    }

    #[tokio::test]
    async fn test_subscribers_see_new_trees() {
        let store = Store::default();
        let mut sub = store.subscribe();
        store.dispatch(Action::SetAppLoading(true));
        let next = sub.changed().await.unwrap();
        assert!(next.loading);
        assert!(Arc::ptr_eq(&next, &sub.current()));

        drop(store);
        assert!(sub.changed().await.is_none());
    }
}

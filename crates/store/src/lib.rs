//! Client state store for the DxMgnPool client.
//!
//! This crate provides:
//! - `AppState`, the single state tree shown by the client
//! - Typed and raw actions, and the pure reducer that applies them
//! - `Store`, a watch-channel container with subscriptions
//! - `Dispatchers`, action creators that read through the chain aggregator
//!
//! ```rust
//! use dxmgn_store::prelude::*;
//!
//! let store = Store::default();
//! let state = store.dispatch(Action::SetAppLoading(true));
//! assert!(state.loading);
//! ```

/// Prelude module for convenient imports.
pub mod prelude;

/// Actions and raw action decoding.
pub mod actions;
/// Action creators.
pub mod dispatchers;
/// State transitions.
pub mod reducer;
/// The state tree.
pub mod state;
/// The state container.
pub mod store;

//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use dxmgn_store::prelude::*;
//! ```

// Actions
pub use crate::actions::{
    Action, DxMgnPoolPatch, MgnPatch, PoolPatch, PoolTokenInfo, ProviderPatch, RawAction,
    UserPatch, UserStatePatch,
};

// Dispatchers
pub use crate::dispatchers::{
    Dispatched, Dispatchers, RequestTicket, RequestVersions, StoreContext,
};

// Reducer
pub use crate::reducer::reduce;

// State
pub use crate::state::{
    AppState, DxMgnPoolSlice, MgnState, PoolState, ProviderState, UserState,
};

// Store
pub use crate::store::{StateSubscription, Store};

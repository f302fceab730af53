//! The application state tree.
//!
//! Field names serialize in upper snake case so snapshots and raw action
//! payloads share one vocabulary.

use dxmgn_domain::enums::Network;
use dxmgn_domain::value_objects::format_units;
use dxmgn_domain::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shown for token text that has not been loaded yet.
pub const PLACEHOLDER: &str = "...";
/// Shown instead of an account when no provider session is usable.
pub const CONNECTION_ERROR: &str = "CONNECTION ERROR";
/// Shown instead of a network name when none is known.
pub const NETWORK_NOT_SUPPORTED: &str = "NETWORK NOT SUPPORTED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UserState {
    pub account: Option<Address>,
    pub balance: Option<U256>,
}

impl UserState {
    pub fn account_label(&self) -> String {
        self.account
            .map(|a| format!("{a:#x}"))
            .unwrap_or_else(|| CONNECTION_ERROR.to_string())
    }

    pub fn balance_label(&self) -> String {
        self.balance
            .map(|b| format_units(b, 18))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ProviderState {
    pub active_provider: Option<String>,
    pub network: Option<Network>,
    /// Most recently registered first.
    pub providers: Vec<String>,
}

impl ProviderState {
    pub fn network_label(&self) -> String {
        match self.network {
            Some(network) if network != Network::Unknown => network.to_string(),
            _ => NETWORK_NOT_SUPPORTED.to_string(),
        }
    }
}

/// What the overview shows for one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PoolState {
    pub your_share: U256,
    pub total_share: U256,
    pub deposit_token: String,
    pub deposit_symbol: String,
    pub deposit_decimals: Option<u8>,
    pub secondary_token: String,
    pub secondary_symbol: String,
    pub secondary_decimals: Option<u8>,
    pub token_balance: Option<U256>,
}

impl Default for PoolState {
    fn default() -> Self {
        Self {
            your_share: U256::zero(),
            total_share: U256::zero(),
            deposit_token: PLACEHOLDER.to_string(),
            deposit_symbol: PLACEHOLDER.to_string(),
            deposit_decimals: None,
            secondary_token: PLACEHOLDER.to_string(),
            secondary_symbol: PLACEHOLDER.to_string(),
            secondary_decimals: None,
            token_balance: None,
        }
    }
}

impl PoolState {
    /// Token balance in whole deposit-token units.
    pub fn token_balance_label(&self) -> String {
        match self.token_balance {
            Some(balance) => format_units(balance, self.deposit_decimals.unwrap_or(18)),
            None => PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DxMgnPoolSlice {
    pub pool1: PoolState,
    pub pool2: PoolState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MgnState {
    pub address: Option<Address>,
    pub balance: Option<U256>,
    pub locked_balance: Option<U256>,
    pub unlocked_balance: Option<U256>,
}

/// The single source of truth for the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppState {
    pub user: UserState,
    pub provider: ProviderState,
    pub dx_mgn_pool: DxMgnPoolSlice,
    pub token_mgn: MgnState,
    pub show_modal: Option<String>,
    pub loading: bool,
    /// Amount typed by the user, in whole tokens.
    pub input_amount: Decimal,
}

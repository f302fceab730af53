//! Actions accepted by the store.

use dxmgn_domain::enums::Network;
use dxmgn_domain::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

pub const SET_INPUT_AMOUNT: &str = "SET_INPUT_AMOUNT";
pub const SET_MGN_BALANCES: &str = "SET_MGN_BALANCES";
pub const SET_POOL_TOKEN_INFO: &str = "SET_POOL_TOKEN_INFO";
pub const SET_DX_MGN_POOL_STATE: &str = "SET_DX_MGN_POOL_STATE";
pub const SET_USER_ACCOUNT: &str = "SET_USER_ACCOUNT";
pub const SET_USER_BALANCE: &str = "SET_USER_BALANCE";
pub const SET_USER_STATE: &str = "SET_USER_STATE";
pub const SET_ACTIVE_PROVIDER: &str = "SET_ACTIVE_PROVIDER";
pub const REGISTER_PROVIDERS: &str = "REGISTER_PROVIDERS";
pub const SET_APP_LOADING: &str = "SET_APP_LOADING";
pub const SHOW_MODAL: &str = "SHOW_MODAL";

/// Partial update of the MGN balances. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MgnPatch {
    pub address: Option<Address>,
    pub balance: Option<U256>,
    pub locked_balance: Option<U256>,
    pub unlocked_balance: Option<U256>,
}

/// Partial update of one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PoolPatch {
    pub your_share: Option<U256>,
    pub total_share: Option<U256>,
    pub deposit_token: Option<String>,
    pub deposit_symbol: Option<String>,
    pub deposit_decimals: Option<u8>,
    pub secondary_token: Option<String>,
    pub secondary_symbol: Option<String>,
    pub secondary_decimals: Option<u8>,
    pub token_balance: Option<U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DxMgnPoolPatch {
    pub pool1: PoolPatch,
    pub pool2: PoolPatch,
}

/// Names, symbols and balances of pool 1's deposit token (`name`) and
/// secondary token (`name2`). Pool 2 receives them crosswise. A balance is
/// `None` when no account was connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTokenInfo {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub balance: Option<U256>,
    pub name2: String,
    pub symbol2: String,
    #[serde(default)]
    pub balance2: Option<U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UserPatch {
    pub account: Option<Address>,
    pub balance: Option<U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ProviderPatch {
    pub active_provider: Option<String>,
    pub network: Option<Network>,
    pub providers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UserStatePatch {
    pub user: UserPatch,
    pub provider: ProviderPatch,
}

/// Every state transition the store knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetInputAmount(Decimal),
    SetMgnBalances(MgnPatch),
    SetPoolTokenInfo(PoolTokenInfo),
    SetDxMgnPoolState(DxMgnPoolPatch),
    SetUserAccount(Option<Address>),
    SetUserBalance(Option<U256>),
    SetUserState(UserStatePatch),
    SetActiveProvider(Option<String>),
    /// Prepends providers to the registered list.
    RegisterProviders(Vec<String>),
    SetAppLoading(bool),
    ShowModal(Option<String>),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetInputAmount(_) => SET_INPUT_AMOUNT,
            Action::SetMgnBalances(_) => SET_MGN_BALANCES,
            Action::SetPoolTokenInfo(_) => SET_POOL_TOKEN_INFO,
            Action::SetDxMgnPoolState(_) => SET_DX_MGN_POOL_STATE,
            Action::SetUserAccount(_) => SET_USER_ACCOUNT,
            Action::SetUserBalance(_) => SET_USER_BALANCE,
            Action::SetUserState(_) => SET_USER_STATE,
            Action::SetActiveProvider(_) => SET_ACTIVE_PROVIDER,
            Action::RegisterProviders(_) => REGISTER_PROVIDERS,
            Action::SetAppLoading(_) => SET_APP_LOADING,
            Action::ShowModal(_) => SHOW_MODAL,
        }
    }

    /// Decodes a raw action. `None` for an unknown kind or a payload that
    /// does not fit the kind.
    pub fn from_raw(raw: &RawAction) -> Option<Action> {
        let action = match raw.kind.as_str() {
            SET_INPUT_AMOUNT => Action::SetInputAmount(payload(raw)?),
            SET_MGN_BALANCES => Action::SetMgnBalances(payload(raw)?),
            SET_POOL_TOKEN_INFO => Action::SetPoolTokenInfo(payload(raw)?),
            SET_DX_MGN_POOL_STATE => Action::SetDxMgnPoolState(payload(raw)?),
            SET_USER_ACCOUNT => Action::SetUserAccount(payload(raw)?),
            SET_USER_BALANCE => Action::SetUserBalance(payload(raw)?),
            SET_USER_STATE => Action::SetUserState(payload(raw)?),
            SET_ACTIVE_PROVIDER => Action::SetActiveProvider(payload(raw)?),
            REGISTER_PROVIDERS => Action::RegisterProviders(payload(raw)?),
            SET_APP_LOADING => Action::SetAppLoading(payload(raw)?),
            SHOW_MODAL => Action::ShowModal(payload(raw)?),
            _ => return None,
        };
        Some(action)
    }
}

fn payload<T: DeserializeOwned>(raw: &RawAction) -> Option<T> {
    serde_json::from_value(raw.payload.clone()).ok()
}

/// An untyped action, as received from outside the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RawAction {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

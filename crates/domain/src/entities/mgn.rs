use crate::Address;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// MGN reward-token balances of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MgnBalances {
    pub address: Address,
    pub balance: U256,
    pub locked: U256,
    pub unlocked: U256,
}

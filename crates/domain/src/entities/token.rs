use crate::Address;
use crate::value_objects::amount::{ETHER_DECIMALS, format_units};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TOKEN_NAME: &str = "Unknown token name";
pub const UNKNOWN_TOKEN_SYMBOL: &str = "Unknown token symbol";

pub const DEPOSIT_TOKEN_TITLE: &str = "Deposit Token";
pub const SECONDARY_TOKEN_TITLE: &str = "Secondary Token";

/// Metadata and caller balance of one ERC20 token. The balance is `None`
/// when no account was available to read it for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    pub title: String,
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub balance: Option<U256>,
}

impl TokenInfo {
    /// Builds a `TokenInfo` from raw contract reads, substituting defaults
    /// for an empty name, an empty symbol or zero decimals.
    pub fn from_reads(
        title: impl Into<String>,
        address: Address,
        name: Option<String>,
        symbol: Option<String>,
        decimals: Option<u8>,
        balance: Option<U256>,
    ) -> Self {
        Self {
            title: title.into(),
            address,
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_TOKEN_NAME.to_string()),
            symbol: symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UNKNOWN_TOKEN_SYMBOL.to_string()),
            decimals: decimals.filter(|d| *d != 0).unwrap_or(ETHER_DECIMALS),
            balance,
        }
    }

    pub fn formatted_balance(&self) -> Option<String> {
        self.balance.map(|b| format_units(b, self.decimals))
    }
}

/// The two tokens pool 1 accepts, in fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTokens {
    pub deposit: TokenInfo,
    pub secondary: TokenInfo,
}

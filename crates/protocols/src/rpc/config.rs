//! Provider configuration.

use primitive_types::U256;

/// Default gas limit attached to transactions.
pub const DEFAULT_GAS_LIMIT: u64 = 4_000_000;

/// Default gas price in wei (5 gwei).
pub const DEFAULT_GAS_PRICE_WEI: u64 = 5_000_000_000;

/// Configuration for the JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// HTTP endpoint of the node.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Interval between receipt polls in milliseconds.
    pub receipt_poll_interval_ms: u64,
    /// Maximum wait for a receipt in seconds.
    pub receipt_timeout_secs: u64,
    /// Gas limit for submitted transactions.
    pub gas_limit: u64,
    /// Gas price for submitted transactions.
    pub gas_price: U256,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            timeout_secs: 30,
            receipt_poll_interval_ms: 1_000,
            receipt_timeout_secs: 300,
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: U256::from(DEFAULT_GAS_PRICE_WEI),
        }
    }
}

impl RpcConfig {
    /// Creates a configuration for the given endpoint with default limits.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

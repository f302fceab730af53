//! Network constants and startup configuration.
//!
//! Everything that depends on the network (WETH and GNO addresses, the
//! WebSocket endpoint) is resolved once into a [`NetworkConfig`] when the
//! client is built, instead of being looked up on every call.

use crate::error::ApiError;
use crate::sync::WatcherConfig;
use dxmgn_domain::Address;
use dxmgn_domain::enums::Network;
use dxmgn_protocols::rpc::RpcConfig;
use primitive_types::H160;
use serde::Serialize;
use std::time::Duration;

pub use dxmgn_protocols::rpc::{
    DEFAULT_GAS_LIMIT as GAS_LIMIT, DEFAULT_GAS_PRICE_WEI as GAS_PRICE,
};

/// Storage key of the verification consent settings.
pub const VERIFICATION_SETTINGS_KEY: &str = "VERIFICATION_SETTINGS";
/// Storage key of the cookie consent settings.
pub const COOKIE_SETTINGS_KEY: &str = "COOKIE_SETTINGS";

/// A WETH balance at or above `amount * WETH_BUFFER_PERCENT / 100` is
/// considered enough to deposit `amount` without wrapping.
pub const WETH_BUFFER_PERCENT: u64 = 104;

/// Numeric network ids and the networks they name.
pub const NETWORK_BY_ID: [(u64, Network); 5] = [
    (1, Network::Main),
    (2, Network::Morden),
    (3, Network::Ropsten),
    (4, Network::Rinkeby),
    (42, Network::Kovan),
];

pub const MAINNET_WETH: Address = H160([
    0xc0, 0x2a, 0xaa, 0x39, 0xb2, 0x23, 0xfe, 0x8d, 0x0a, 0x0e, 0x5c, 0x4f, 0x27, 0xea, 0xd9, 0x08,
    0x3c, 0x75, 0x6c, 0xc2,
]);
pub const RINKEBY_WETH: Address = H160([
    0xc7, 0x78, 0x41, 0x7e, 0x06, 0x31, 0x41, 0x13, 0x9f, 0xce, 0x01, 0x09, 0x82, 0x78, 0x01, 0x40,
    0xaa, 0x0c, 0xd5, 0xab,
]);
pub const MAINNET_GNO: Address = H160([
    0x68, 0x10, 0xe7, 0x76, 0x88, 0x0c, 0x02, 0x93, 0x3d, 0x47, 0xdb, 0x1b, 0x9f, 0xc0, 0x59, 0x08,
    0xe5, 0x38, 0x6b, 0x96,
]);
pub const RINKEBY_GNO: Address = H160([
    0xd0, 0xda, 0xb4, 0xe6, 0x40, 0xd9, 0x5e, 0x9e, 0x8a, 0x47, 0x54, 0x55, 0x98, 0xc3, 0x3e, 0x31,
    0xbd, 0xb5, 0x3c, 0x7c,
]);

/// WebSocket endpoint of a local development node.
pub const LOCAL_WEBSOCKET_URL: &str = "ws://localhost:8545/ws";

/// Environment variable names read by [`AppConfig::from_env`].
pub const ENV_RPC_URL: &str = "DXMGN_RPC_URL";
pub const ENV_COORDINATOR: &str = "DXMGN_COORDINATOR";
pub const ENV_NETWORK_ID: &str = "DXMGN_NETWORK_ID";
pub const ENV_INFURA_PROJECT_ID: &str = "INFURA_PROJECT_ID";
pub const ENV_RPC_TIMEOUT_SECS: &str = "DXMGN_RPC_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_SECS: &str = "DXMGN_POLL_INTERVAL_SECS";

/// Infura WebSocket endpoint for a network, `None` for an unknown network.
pub fn websocket_url(network: Network, infura_project_id: &str) -> Option<String> {
    let host = match network {
        Network::Main => "mainnet",
        Network::Morden => "morden",
        Network::Ropsten => "ropsten",
        Network::Rinkeby => "rinkeby",
        Network::Kovan => "kovan",
        Network::Unknown => return None,
    };
    Some(format!("wss://{host}.infura.io/ws/v3/{infura_project_id}"))
}

/// Contract addresses and endpoints for the connected network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    /// Network the session is attached to.
    pub network: Network,
    /// Wrapped ether token.
    pub weth: Address,
    /// GNO token, used by the false-allowance check.
    pub gno: Address,
    /// Percentage of the deposit amount WETH must cover to skip wrapping.
    pub weth_buffer_percent: u64,
    /// WebSocket endpoint, when one is known.
    pub websocket_url: Option<String>,
}

impl NetworkConfig {
    /// Resolves the constants for `network`. Every network other than
    /// mainnet uses the Rinkeby token deployments.
    pub fn for_network(network: Network) -> Self {
        let (weth, gno) = match network {
            Network::Main => (MAINNET_WETH, MAINNET_GNO),
            _ => (RINKEBY_WETH, RINKEBY_GNO),
        };
        Self {
            network,
            weth,
            gno,
            weth_buffer_percent: WETH_BUFFER_PERCENT,
            websocket_url: None,
        }
    }

    /// Sets the WebSocket endpoint from an Infura project id.
    #[must_use]
    pub fn with_infura(mut self, project_id: &str) -> Self {
        self.websocket_url = websocket_url(self.network, project_id);
        self
    }
}

/// Startup configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON-RPC provider settings.
    pub rpc: RpcConfig,
    /// Coordinator contract registering both pools.
    pub coordinator: Option<Address>,
    /// Network id override; queried from the node when absent.
    pub network_id: Option<u64>,
    /// Infura project id for WebSocket endpoints.
    pub infura_project_id: Option<String>,
    /// Provider watcher settings.
    pub watcher: WatcherConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            coordinator: None,
            network_id: None,
            infura_project_id: None,
            watcher: WatcherConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_RPC_URL) {
            config.rpc.url = url;
        }
        if let Some(secs) = lookup(ENV_RPC_TIMEOUT_SECS) {
            config.rpc.timeout_secs = parse_var(ENV_RPC_TIMEOUT_SECS, &secs)?;
        }
        if let Some(coordinator) = lookup(ENV_COORDINATOR) {
            config.coordinator = Some(parse_address(ENV_COORDINATOR, &coordinator)?);
        }
        if let Some(id) = lookup(ENV_NETWORK_ID) {
            config.network_id = Some(parse_var(ENV_NETWORK_ID, &id)?);
        }
        if let Some(secs) = lookup(ENV_POLL_INTERVAL_SECS) {
            config.watcher.poll_interval =
                Duration::from_secs(parse_var(ENV_POLL_INTERVAL_SECS, &secs)?);
        }
        config.infura_project_id = lookup(ENV_INFURA_PROJECT_ID).filter(|id| !id.is_empty());

        Ok(config)
    }

    /// Coordinator address, or an error naming the variable to set.
    pub fn require_coordinator(&self) -> Result<Address, ApiError> {
        self.coordinator
            .ok_or_else(|| ApiError::Config(format!("{ENV_COORDINATOR} is not set")))
    }

    /// Network constants for `network`, with the WebSocket endpoint filled
    /// in when an Infura project id is configured.
    pub fn network_config(&self, network: Network) -> NetworkConfig {
        let config = NetworkConfig::for_network(network);
        match &self.infura_project_id {
            Some(id) => config.with_infura(id),
            None => config,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::Config(format!("invalid {key}: {value}")))
}

/// Parses a `0x`-prefixed (or bare) 20-byte hex address.
pub fn parse_address(key: &str, value: &str) -> Result<Address, ApiError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|_| ApiError::Config(format!("invalid {key}: {value}")))?;
    Ok(H160(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_network_by_id_matches_network_ids() {
        for (id, network) in NETWORK_BY_ID {
            assert_eq!(Network::from_id(id), network);
            assert_eq!(network.id(), Some(id));
        }
    }

    #[test]
    fn test_weth_and_gno_per_network() {
        let main = NetworkConfig::for_network(Network::Main);
        assert_eq!(
            format!("{:#x}", main.weth),
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
        );
        assert_eq!(main.gno, MAINNET_GNO);

        let rinkeby = NetworkConfig::for_network(Network::Rinkeby);
        assert_eq!(
            format!("{:#x}", rinkeby.weth),
            "0xc778417e063141139fce010982780140aa0cd5ab"
        );
        assert_eq!(
            format!("{:#x}", rinkeby.gno),
            "0xd0dab4e640d95e9e8a47545598c33e31bdb53c7c"
        );
        assert_eq!(NetworkConfig::for_network(Network::Kovan).weth, RINKEBY_WETH);
    }

    #[test]
    fn test_websocket_urls() {
        assert_eq!(
            websocket_url(Network::Rinkeby, "abc").as_deref(),
            Some("wss://rinkeby.infura.io/ws/v3/abc")
        );
        assert!(websocket_url(Network::Unknown, "abc").is_none());
        let config = NetworkConfig::for_network(Network::Main).with_infura("k");
        assert_eq!(
            config.websocket_url.as_deref(),
            Some("wss://mainnet.infura.io/ws/v3/k")
        );
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_RPC_URL, "http://node:8545"),
            (ENV_COORDINATOR, "0x1111111111111111111111111111111111111111"),
            (ENV_NETWORK_ID, "4"),
            (ENV_RPC_TIMEOUT_SECS, "5"),
            (ENV_POLL_INTERVAL_SECS, "2"),
        ]);
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.rpc.url, "http://node:8545");
        assert_eq!(config.rpc.timeout_secs, 5);
        assert_eq!(config.network_id, Some(4));
        assert_eq!(config.coordinator, Some(Address::repeat_byte(0x11)));
        assert_eq!(config.watcher.poll_interval, Duration::from_secs(2));
        assert!(config.infura_project_id.is_none());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = AppConfig::from_lookup(|k| (k == ENV_COORDINATOR).then(|| "0x12".to_string()))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(m) if m.contains(ENV_COORDINATOR)));

        let err = AppConfig::from_lookup(|k| (k == ENV_NETWORK_ID).then(|| "rinkeby".to_string()))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        assert!(AppConfig::default().require_coordinator().is_err());
    }
}

//! Chain aggregator.
//!
//! High-level reads and writes composed from several contract calls.
//! Independent calls are joined with `tokio::try_join!`, so the first
//! failure fails the whole operation; dependent steps run in order.

mod deposit;
mod pool;
mod tokens;
mod types;

pub use types::*;

use crate::config::{AppConfig, NetworkConfig};
use crate::error::ApiError;
use dxmgn_domain::enums::Network;
use dxmgn_domain::{Address, U256};
use dxmgn_protocols::contracts::{DxMgnContracts, Erc20Contracts};
use dxmgn_protocols::rpc::{BlockTag, RpcProvider};
use dxmgn_protocols::{PoolContracts, TokenContracts, Web3Provider};
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the DxMgnPool contracts.
///
/// Holds the provider session, the contract backends and the network
/// constants resolved at construction. Cheap to share behind an `Arc`.
pub struct DxMgnPoolApi {
    /// Provider session.
    web3: Arc<dyn Web3Provider>,
    /// ERC20 and WETH calls.
    tokens: Arc<dyn TokenContracts>,
    /// Coordinator, pool and MGN calls.
    pools: Arc<dyn PoolContracts>,
    /// Network constants.
    network: NetworkConfig,
}

impl DxMgnPoolApi {
    /// Creates a client over explicit backends.
    pub fn new(
        web3: Arc<dyn Web3Provider>,
        tokens: Arc<dyn TokenContracts>,
        pools: Arc<dyn PoolContracts>,
        network: NetworkConfig,
    ) -> Self {
        Self {
            web3,
            tokens,
            pools,
            network,
        }
    }

    /// Creates a client over one backend implementing every boundary.
    pub fn with_backend<B>(backend: Arc<B>, network: NetworkConfig) -> Self
    where
        B: Web3Provider + TokenContracts + PoolContracts + 'static,
    {
        Self::new(backend.clone(), backend.clone(), backend, network)
    }

    /// Connects to the JSON-RPC node named in `config` and resolves the
    /// network once.
    pub async fn connect(config: &AppConfig) -> Result<Self, ApiError> {
        let coordinator = config.require_coordinator()?;
        let provider = Arc::new(RpcProvider::new(config.rpc.clone())?);

        let network = match config.network_id {
            Some(id) => Network::from_id(id),
            None => provider.network().await?,
        };

        info!(
            url = %config.rpc.url,
            network = %network,
            coordinator = %format!("{coordinator:#x}"),
            "Connected to provider"
        );

        let tokens = Arc::new(Erc20Contracts::new(provider.clone()));
        let pools = Arc::new(DxMgnContracts::new(provider.clone(), coordinator));
        Ok(Self::new(
            provider,
            tokens,
            pools,
            config.network_config(network),
        ))
    }

    /// Network constants this client was built with.
    pub fn network_config(&self) -> &NetworkConfig {
        &self.network
    }

    pub async fn current_account(&self) -> Result<Address, ApiError> {
        Ok(self.web3.current_account().await?)
    }

    pub async fn current_network(&self) -> Result<Network, ApiError> {
        Ok(self.web3.network().await?)
    }

    pub async fn current_network_id(&self) -> Result<u64, ApiError> {
        Ok(self.web3.network_id().await?)
    }

    /// Ether balance of `account`, or of the current account.
    pub async fn current_balance(&self, account: Option<Address>) -> Result<U256, ApiError> {
        let account = self.fill_default_account(account).await?;
        Ok(self.web3.balance(account).await?)
    }

    /// Returns `account` when given, the provider's current account otherwise.
    pub async fn fill_default_account(&self, account: Option<Address>) -> Result<Address, ApiError> {
        match account {
            Some(account) => Ok(account),
            None => self.current_account().await,
        }
    }

    /// Like [`Self::fill_default_account`], but a provider without an
    /// account yields `None` instead of an error.
    pub async fn optional_account(
        &self,
        account: Option<Address>,
    ) -> Result<Option<Address>, ApiError> {
        match self.fill_default_account(account).await {
            Ok(account) => Ok(Some(account)),
            Err(e) if e.is_no_account() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Timestamp of a block, in seconds.
    pub async fn block_time(&self, block: BlockTag) -> Result<u64, ApiError> {
        let info = self.web3.block_info(block).await?;
        Ok(info.timestamp_secs())
    }

    pub async fn account_and_timestamp(&self) -> Result<AccountSnapshot, ApiError> {
        let (account, timestamp) = tokio::try_join!(
            self.current_account(),
            self.block_time(BlockTag::Latest)
        )?;
        Ok(AccountSnapshot { account, timestamp })
    }

    /// Reads account, timestamp and network together. Supplied values are
    /// used as-is instead of being queried.
    pub async fn refresh_state(
        &self,
        account: Option<Address>,
        timestamp: Option<u64>,
    ) -> Result<ChainSnapshot, ApiError> {
        let timestamp = async {
            match timestamp {
                Some(timestamp) => Ok(timestamp),
                None => self.block_time(BlockTag::Latest).await,
            }
        };
        let (account, timestamp, network) = tokio::try_join!(
            self.fill_default_account(account),
            timestamp,
            self.current_network()
        )?;
        debug!(
            account = %format!("{account:#x}"),
            timestamp,
            network = %network,
            "Refreshed chain state"
        );
        Ok(ChainSnapshot {
            account,
            timestamp,
            network,
        })
    }

    /// Reads the current account, its ether balance and the network.
    pub async fn user_state(&self) -> Result<UserSnapshot, ApiError> {
        let account_and_balance = async {
            let account = self.current_account().await?;
            let balance = self.web3.balance(account).await?;
            Ok::<_, ApiError>((account, balance))
        };
        let ((account, balance), network) =
            tokio::try_join!(account_and_balance, self.current_network())?;
        Ok(UserSnapshot {
            account,
            balance,
            network,
        })
    }
}

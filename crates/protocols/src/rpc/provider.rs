//! HTTP JSON-RPC provider.

use super::{
    BlockInfo, BlockTag, Bytes, CallRequest, JsonRpcRequest, JsonRpcResponse, RpcConfig,
    TransactionRequest, TxReceipt,
};
use crate::Web3Provider;
use crate::error::ChainError;
use async_trait::async_trait;
use primitive_types::{H160, H256, U256};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Empty positional parameter list.
const NO_PARAMS: [u8; 0] = [];

/// JSON-RPC client for an Ethereum node.
///
/// Transactions are submitted with `eth_sendTransaction`, so signing is done
/// by the node or the wallet behind it.
pub struct RpcProvider {
    /// HTTP client.
    client: reqwest::Client,
    /// Configuration.
    config: RpcConfig,
    /// Next request id.
    next_id: AtomicU64,
}

impl RpcProvider {
    /// Creates a new provider.
    pub fn new(config: RpcConfig) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Sends a request, returning `None` when the node answers `null`.
    pub async fn request_optional<P, R>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>, ChainError>
    where
        P: Serialize + Send,
        R: DeserializeOwned + Send,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        debug!(id, method, "Sending RPC request");

        let response: JsonRpcResponse<R> = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            warn!(method, code = err.code, message = %err.message, "RPC error");
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(response.result)
    }

    /// Sends a request that must produce a result.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, ChainError>
    where
        P: Serialize + Send,
        R: DeserializeOwned + Send,
    {
        self.request_optional(method, params)
            .await?
            .ok_or_else(|| ChainError::EmptyResult(method.to_string()))
    }

    pub async fn accounts(&self) -> Result<Vec<H160>, ChainError> {
        self.request("eth_accounts", NO_PARAMS).await
    }

    pub async fn net_version(&self) -> Result<u64, ChainError> {
        let version: String = self.request("net_version", NO_PARAMS).await?;
        version
            .trim()
            .parse()
            .map_err(|_| ChainError::Decode(format!("invalid net_version: {version}")))
    }

    pub async fn block_number(&self) -> Result<u64, ChainError> {
        let number: U256 = self.request("eth_blockNumber", NO_PARAMS).await?;
        Ok(number.low_u64())
    }

    pub async fn get_balance(&self, account: H160, block: BlockTag) -> Result<U256, ChainError> {
        self.request("eth_getBalance", (account, block)).await
    }

    pub async fn get_block(&self, block: BlockTag) -> Result<BlockInfo, ChainError> {
        self.request("eth_getBlockByNumber", (block, false)).await
    }

    /// Executes a read-only contract call against the latest block.
    pub async fn call(&self, to: H160, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let request = CallRequest {
            to,
            data: Bytes(data),
        };
        let result: Bytes = self.request("eth_call", (request, BlockTag::Latest)).await?;
        Ok(result.0)
    }

    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<H256, ChainError> {
        self.request("eth_sendTransaction", [tx]).await
    }

    pub async fn get_transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TxReceipt>, ChainError> {
        self.request_optional("eth_getTransactionReceipt", [hash])
            .await
    }

    /// Builds a contract transaction with the configured gas settings.
    pub fn build_transaction(
        &self,
        from: H160,
        to: H160,
        data: Vec<u8>,
        value: Option<U256>,
    ) -> TransactionRequest {
        TransactionRequest {
            from,
            to: Some(to),
            data: Bytes(data),
            value,
            gas: Some(U256::from(self.config.gas_limit)),
            gas_price: Some(self.config.gas_price),
        }
    }

    /// Submits a transaction and waits until it is mined.
    pub async fn send_and_confirm(&self, tx: &TransactionRequest) -> Result<TxReceipt, ChainError> {
        let hash = self.send_transaction(tx).await?;
        info!(
            hash = %format!("{hash:#x}"),
            from = %format!("{:#x}", tx.from),
            "Transaction submitted"
        );

        let started = Instant::now();
        let timeout = Duration::from_secs(self.config.receipt_timeout_secs);
        let mut ticker =
            tokio::time::interval(Duration::from_millis(self.config.receipt_poll_interval_ms));

        loop {
            ticker.tick().await;

            if let Some(receipt) = self.get_transaction_receipt(hash).await? {
                if !receipt.is_success() {
                    warn!(hash = %format!("{hash:#x}"), "Transaction reverted");
                    return Err(ChainError::Reverted(hash));
                }
                info!(
                    hash = %format!("{hash:#x}"),
                    block = ?receipt.block_number,
                    "Transaction confirmed"
                );
                return Ok(receipt);
            }

            if started.elapsed() >= timeout {
                return Err(ChainError::ReceiptTimeout {
                    hash,
                    waited_secs: self.config.receipt_timeout_secs,
                });
            }
        }
    }
}

#[async_trait]
impl Web3Provider for RpcProvider {
    async fn current_account(&self) -> Result<H160, ChainError> {
        self.accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(ChainError::NoAccount)
    }

    async fn network_id(&self) -> Result<u64, ChainError> {
        self.net_version().await
    }

    async fn balance(&self, account: H160) -> Result<U256, ChainError> {
        self.get_balance(account, BlockTag::Latest).await
    }

    async fn block_info(&self, block: BlockTag) -> Result<BlockInfo, ChainError> {
        self.get_block(block).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_transaction_uses_gas_settings() {
        let provider = RpcProvider::new(RpcConfig::default()).unwrap();
        let tx = provider.build_transaction(
            H160::repeat_byte(1),
            H160::repeat_byte(2),
            vec![0xd0, 0xe3, 0x0d, 0xb0],
            Some(U256::from(10u64)),
        );
        assert_eq!(tx.gas, Some(U256::from(4_000_000u64)));
        assert_eq!(tx.gas_price, Some(U256::from(5_000_000_000u64)));
        assert_eq!(tx.value, Some(U256::from(10u64)));
        assert_eq!(tx.to, Some(H160::repeat_byte(2)));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let config = RpcConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..RpcConfig::default()
        };
        let provider = RpcProvider::new(config).unwrap();
        let err = provider.current_account().await.unwrap_err();
        assert!(matches!(err, ChainError::Transport(_)));
    }
}

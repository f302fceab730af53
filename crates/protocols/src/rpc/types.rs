//! JSON-RPC wire types.

use primitive_types::{H160, H256, U256};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Hex-encoded byte string (`0x…`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(&self.0)))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(stripped).map(Bytes).map_err(de::Error::custom)
    }
}

/// Block selector for state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Earliest,
    Number(u64),
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockTag::Latest => serializer.serialize_str("latest"),
            BlockTag::Pending => serializer.serialize_str("pending"),
            BlockTag::Earliest => serializer.serialize_str("earliest"),
            BlockTag::Number(n) => serializer.serialize_str(&format!("0x{n:x}")),
        }
    }
}

/// Read-only call parameters for `eth_call`.
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub to: H160,
    pub data: Bytes,
}

/// Transaction parameters for `eth_sendTransaction`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: H160,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<H160>,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
}

/// Header fields of a block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockInfo {
    pub number: Option<U256>,
    pub hash: Option<H256>,
    pub timestamp: U256,
}

impl BlockInfo {
    /// Block timestamp in seconds since the epoch.
    pub fn timestamp_secs(&self) -> u64 {
        self.timestamp.low_u64()
    }
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: H256,
    pub block_number: Option<U256>,
    pub gas_used: Option<U256>,
    /// `1` on success, `0` on revert. Absent on pre-Byzantium chains.
    pub status: Option<U256>,
}

impl TxReceipt {
    pub fn is_success(&self) -> bool {
        self.status.is_none_or(|s| !s.is_zero())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_serde() {
        let bytes = Bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_string(&bytes).unwrap();
        assert_eq!(json, "\"0xdeadbeef\"");
        let back: Bytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bytes);
        let empty: Bytes = serde_json::from_str("\"0x\"").unwrap();
        assert!(empty.0.is_empty());
    }

    #[test]
    fn test_block_tag_serialization() {
        assert_eq!(serde_json::to_string(&BlockTag::Latest).unwrap(), "\"latest\"");
        assert_eq!(
            serde_json::to_string(&BlockTag::Number(255)).unwrap(),
            "\"0xff\""
        );
    }

    #[test]
    fn test_transaction_request_omits_empty_fields() {
        let tx = TransactionRequest {
            from: H160::repeat_byte(1),
            to: Some(H160::repeat_byte(2)),
            data: Bytes(vec![0xd0, 0xe3, 0x0d, 0xb0]),
            ..Default::default()
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json.get("value").is_none());
        assert!(json.get("gasPrice").is_none());
        assert_eq!(json["data"], "0xd0e30db0");
    }

    #[test]
    fn test_receipt_status() {
        let ok: TxReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": format!("0x{}", "11".repeat(32)),
            "blockNumber": "0x10",
            "gasUsed": "0x5208",
            "status": "0x1",
        }))
        .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.block_number, Some(U256::from(16u64)));

        let reverted: TxReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": format!("0x{}", "22".repeat(32)),
            "blockNumber": "0x11",
            "gasUsed": null,
            "status": "0x0",
        }))
        .unwrap();
        assert!(!reverted.is_success());
    }
}

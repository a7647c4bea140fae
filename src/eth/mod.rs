//! Ethereum JSON-RPC client
//!
//! Provides the small slice of the JSON-RPC surface the gateway needs:
//! read-only contract calls for request forwarding, plus the account and
//! transaction methods used by the deployment helpers.

pub mod abi;
pub mod artifact;

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from talking to the Ethereum node
#[derive(Debug, Error)]
pub enum EthError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed RPC response: {0}")]
    Decode(String),
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Client for a single Ethereum JSON-RPC endpoint
#[derive(Debug, Clone)]
pub struct EthClient {
    client: Client,
    url: String,
}

impl EthClient {
    /// Create a new client for the given endpoint URL
    pub fn new(url: &str) -> Result<Self, EthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// The endpoint URL this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a single JSON-RPC request and unwrap the result
    async fn request(&self, method: &str, params: Value) -> Result<Value, EthError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        debug!("JSON-RPC request: {}", method);

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("JSON-RPC HTTP error from {}: {}", self.url, status);
            return Err(EthError::Decode(format!("HTTP error: {}", status)));
        }

        let body: RpcResponse = response.json().await?;

        if let Some(err) = body.error {
            return Err(EthError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        body.result
            .ok_or_else(|| EthError::Decode("neither result nor error in response".to_string()))
    }

    /// Unwrap a result that must be a string
    async fn request_str(&self, method: &str, params: Value) -> Result<String, EthError> {
        match self.request(method, params).await? {
            Value::String(s) => Ok(s),
            other => Err(EthError::Decode(format!(
                "expected string result, got {}",
                other
            ))),
        }
    }

    /// Query the chain id of the connected node
    pub async fn chain_id(&self) -> Result<u64, EthError> {
        let result = self.request_str("eth_chainId", json!([])).await?;
        parse_quantity(&result)
    }

    /// List the accounts the node controls (unlocked dev accounts)
    pub async fn accounts(&self) -> Result<Vec<String>, EthError> {
        match self.request("eth_accounts", json!([])).await? {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s),
                    other => Err(EthError::Decode(format!(
                        "expected account string, got {}",
                        other
                    ))),
                })
                .collect(),
            other => Err(EthError::Decode(format!(
                "expected account list, got {}",
                other
            ))),
        }
    }

    /// Execute a read-only contract call against the latest block
    pub async fn call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, EthError> {
        let params = json!([{"to": to, "data": to_hex(data)}, "latest"]);
        let result = self.request_str("eth_call", params).await?;
        from_hex(&result)
    }

    /// Submit a transaction from an unlocked account, returning the tx hash
    ///
    /// `to` is `None` for contract creation.
    pub async fn send_transaction(
        &self,
        from: &str,
        to: Option<&str>,
        data: &[u8],
    ) -> Result<String, EthError> {
        let mut tx = json!({"from": from, "data": to_hex(data)});
        if let Some(to) = to {
            tx["to"] = json!(to);
        }
        self.request_str("eth_sendTransaction", json!([tx])).await
    }

    /// Look up the receipt for a transaction hash, if it is mined yet
    pub async fn transaction_receipt(&self, hash: &str) -> Result<Option<Value>, EthError> {
        match self.request("eth_getTransactionReceipt", json!([hash])).await? {
            Value::Null => Ok(None),
            receipt => Ok(Some(receipt)),
        }
    }

    /// Poll for the receipt of a transaction until it is mined
    pub async fn wait_for_receipt(&self, hash: &str) -> Result<Value, EthError> {
        for _ in 0..50 {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Err(EthError::Decode(format!(
            "transaction {} not mined within timeout",
            hash
        )))
    }
}

/// Hex-encode binary data with the 0x prefix used on the wire
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Decode a hex string, accepting an optional 0x prefix
pub fn from_hex(data: &str) -> Result<Vec<u8>, EthError> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(stripped).map_err(|e| EthError::Decode(format!("invalid hex payload: {}", e)))
}

/// Parse a JSON-RPC quantity ("0x..." hex number)
pub fn parse_quantity(data: &str) -> Result<u64, EthError> {
    let stripped = data
        .strip_prefix("0x")
        .ok_or_else(|| EthError::Decode(format!("quantity without 0x prefix: {}", data)))?;
    u64::from_str_radix(stripped, 16)
        .map_err(|e| EthError::Decode(format!("invalid quantity {}: {}", data, e)))
}

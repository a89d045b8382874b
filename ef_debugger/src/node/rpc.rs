//!
//! The JSON-RPC node client.
//!

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;
use web3::types::Address;
use web3::types::Bytes;
use web3::types::H256;
use web3::types::U256;

use super::Node;
use super::Receipt;
use crate::error::Error;

///
/// The JSON-RPC request.
///
#[derive(Debug, Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

///
/// The JSON-RPC response.
///
#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    result: Value,
    error: Option<ResponseError>,
}

///
/// The JSON-RPC error object.
///
#[derive(Debug, Deserialize)]
struct ResponseError {
    code: i64,
    message: String,
}

///
/// The node reachable over HTTP JSON-RPC.
///
#[derive(Debug)]
pub struct RpcNode {
    /// The HTTP client.
    client: reqwest::blocking::Client,
    /// The endpoint URL.
    url: String,
    /// The next request id.
    next_id: AtomicU64,
}

impl RpcNode {
    /// The transport timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(60);

    /// The block tag of every state query.
    const LATEST: &'static str = "latest";

    ///
    /// Connects to the node, probing it with `web3_clientVersion`.
    ///
    pub fn connect(url: &str) -> crate::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::TIMEOUT)
            .no_proxy()
            .build()
            .map_err(|error| Error::environment("connect", error))?;
        let node = Self {
            client,
            url: url.to_owned(),
            next_id: AtomicU64::new(1),
        };
        let _version: String = node.call("web3_clientVersion", json!([]))?;
        Ok(node)
    }

    ///
    /// The endpoint URL.
    ///
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    ///
    /// Performs a call, deserializing its result.
    ///
    pub fn call<T>(&self, method: &str, params: Value) -> crate::Result<T>
    where
        T: DeserializeOwned,
    {
        let request = Request {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let body =
            serde_json::to_string(&request).map_err(|error| Error::environment(method, error))?;

        let response = self
            .client
            .post(self.url.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|error| Error::environment(method, error))?;

        let response: Response = serde_json::from_str(response.as_str())
            .map_err(|error| Error::environment(method, format!("invalid response: {error}")))?;
        if let Some(error) = response.error {
            return Err(Error::environment(
                method,
                format!("{} (code {})", error.message, error.code),
            ));
        }
        serde_json::from_value(response.result)
            .map_err(|error| Error::environment(method, format!("invalid result: {error}")))
    }

    ///
    /// Performs an administrative call, ignoring its result payload.
    ///
    fn admin(&self, method: &str, params: Value) -> crate::Result<()> {
        let _: Value = self.call(method, params)?;
        Ok(())
    }
}

impl Node for RpcNode {
    fn set_code(&self, address: Address, code: &Bytes) -> crate::Result<()> {
        self.admin("anvil_setCode", json!([address, code]))
    }

    fn set_balance(&self, address: Address, balance: U256) -> crate::Result<()> {
        self.admin("anvil_setBalance", json!([address, balance]))
    }

    fn set_nonce(&self, address: Address, nonce: U256) -> crate::Result<()> {
        self.admin("anvil_setNonce", json!([address, nonce]))
    }

    fn set_storage_at(&self, address: Address, key: H256, value: H256) -> crate::Result<()> {
        self.admin("anvil_setStorageAt", json!([address, key, value]))
    }

    fn set_chain_id(&self, chain_id: u64) -> crate::Result<()> {
        self.admin("anvil_setChainId", json!([chain_id]))
    }

    fn set_coinbase(&self, coinbase: Address) -> crate::Result<()> {
        self.admin("anvil_setCoinbase", json!([coinbase]))
    }

    fn set_next_block_base_fee(&self, base_fee: U256) -> crate::Result<()> {
        self.admin("anvil_setNextBlockBaseFeePerGas", json!([base_fee]))
    }

    fn set_block_gas_limit(&self, gas_limit: U256) -> crate::Result<()> {
        self.admin("evm_setBlockGasLimit", json!([gas_limit]))
    }

    fn balance(&self, address: Address) -> crate::Result<U256> {
        self.call("eth_getBalance", json!([address, Self::LATEST]))
    }

    fn transaction_count(&self, address: Address) -> crate::Result<U256> {
        self.call("eth_getTransactionCount", json!([address, Self::LATEST]))
    }

    fn code(&self, address: Address) -> crate::Result<Bytes> {
        self.call("eth_getCode", json!([address, Self::LATEST]))
    }

    fn storage_at(&self, address: Address, key: H256) -> crate::Result<H256> {
        self.call("eth_getStorageAt", json!([address, key, Self::LATEST]))
    }

    fn send_raw_transaction(&self, encoded: &[u8]) -> crate::Result<H256> {
        self.call(
            "eth_sendRawTransaction",
            json!([Bytes(encoded.to_vec())]),
        )
    }

    fn transaction_receipt(&self, hash: H256) -> crate::Result<Option<Receipt>> {
        self.call("eth_getTransactionReceipt", json!([hash]))
    }
}

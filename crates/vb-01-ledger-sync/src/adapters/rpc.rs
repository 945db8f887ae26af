//! # JSON-RPC Ledger
//!
//! `LedgerClient` over an Ethereum JSON-RPC endpoint. Reads go through
//! `eth_call`; `finalizeElection` is sent with `eth_sendTransaction` from a
//! node-managed sender account.

use super::abi;
use crate::config::RpcLedgerConfig;
use crate::domain::entities::{ElectionId, LedgerElection};
use crate::domain::errors::LedgerError;
use crate::ports::outbound::{LedgerClient, LedgerNetwork, TransactionId};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

const ELECTION_COUNT: &str = "electionCount()";
const GET_ELECTION_INFO: &str = "getElectionInfo(uint256)";
const GET_ELECTION_RESULTS: &str = "getElectionResults(uint256)";
const FINALIZE_ELECTION: &str = "finalizeElection(uint256)";

/// Ledger client speaking Ethereum JSON-RPC.
pub struct EthRpcLedger {
    http: reqwest::Client,
    url: String,
    contract: String,
    sender: Option<String>,
    next_id: AtomicU64,
}

impl EthRpcLedger {
    /// Build a client from configuration. Requires `rpc_url`.
    pub fn new(config: &RpcLedgerConfig) -> Result<Self, LedgerError> {
        let url = config
            .rpc_url
            .clone()
            .ok_or_else(|| LedgerError::Transport("no RPC URL configured".into()))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            url,
            contract: config.contract_address.clone(),
            sender: config.sender.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "Ledger RPC request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| LedgerError::Decode(e.to_string()))?;
        parse_rpc_response(payload)
    }

    async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>, LedgerError> {
        let result = self
            .request(
                "eth_call",
                json!([
                    { "to": self.contract, "data": format!("0x{}", hex::encode(data)) },
                    "latest"
                ]),
            )
            .await?;
        decode_hex_bytes(&result)
    }
}

#[async_trait]
impl LedgerClient for EthRpcLedger {
    async fn election_count(&self) -> Result<u64, LedgerError> {
        let data = self.call(abi::encode_call(ELECTION_COUNT, &[])).await?;
        abi::read_u64(&data, 0)
    }

    async fn election_info(&self, id: ElectionId) -> Result<LedgerElection, LedgerError> {
        let count = self.election_count().await?;
        if id >= count {
            return Err(LedgerError::ElectionNotFound { id, count });
        }
        let data = self.call(abi::encode_call(GET_ELECTION_INFO, &[id])).await?;
        abi::decode_election_info(&data)
    }

    async fn election_results(&self, id: ElectionId) -> Result<Vec<u64>, LedgerError> {
        let data = self
            .call(abi::encode_call(GET_ELECTION_RESULTS, &[id]))
            .await?;
        abi::decode_results(&data)
    }

    async fn finalize(&self, id: ElectionId) -> Result<TransactionId, LedgerError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| LedgerError::Rejected("no sender account configured".into()))?;
        let data = abi::encode_call(FINALIZE_ELECTION, &[id]);
        let result = self
            .request(
                "eth_sendTransaction",
                json!([{
                    "from": sender,
                    "to": self.contract,
                    "data": format!("0x{}", hex::encode(data)),
                }]),
            )
            .await?;
        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| LedgerError::Decode("transaction hash is not a string".into()))
    }

    async fn network(&self) -> Result<LedgerNetwork, LedgerError> {
        let version = self.request("net_version", json!([])).await?;
        let version = version
            .as_str()
            .ok_or_else(|| LedgerError::Decode("net_version is not a string".into()))?;
        Ok(LedgerNetwork {
            contract_address: self.contract.clone(),
            network_name: network_name(version),
        })
    }
}

/// Extract `result` from a JSON-RPC response envelope.
pub fn parse_rpc_response(payload: Value) -> Result<Value, LedgerError> {
    if let Some(error) = payload.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(LedgerError::Rejected(message.to_owned()));
    }
    payload
        .get("result")
        .cloned()
        .ok_or_else(|| LedgerError::Decode("response has neither result nor error".into()))
}

/// Decode a `0x`-prefixed hex string into bytes.
pub fn decode_hex_bytes(value: &Value) -> Result<Vec<u8>, LedgerError> {
    let text = value
        .as_str()
        .ok_or_else(|| LedgerError::Decode("eth_call result is not a string".into()))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| LedgerError::Decode(e.to_string()))
}

/// Friendly name for a `net_version` id.
pub fn network_name(version: &str) -> String {
    match version {
        "1" => "Mainnet".to_owned(),
        "5" => "Goerli".to_owned(),
        "17000" => "Holesky".to_owned(),
        "11155111" => "Sepolia".to_owned(),
        "1337" | "31337" => "Local".to_owned(),
        other => format!("Unknown ({other})"),
    }
}

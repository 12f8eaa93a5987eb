use anyhow::Context;
use common::abi::{self, Address, TokenId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FetchError;

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: (CallParams<'a>, &'static str),
    id: u64,
}

#[derive(Serialize)]
struct CallParams<'a> {
    to: &'a Address,
    data: &'a str,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Read-only client for one contract on one node.
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
    contract: Address,
}

impl RpcClient {
    pub fn new(url: &str, contract: Address, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build rpc http client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            contract,
        })
    }

    /// Single `eth_call` against the latest block. Returns the raw `0x` hex result.
    pub async fn call(&self, data: &str) -> Result<String, FetchError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_call",
            params: (
                CallParams {
                    to: &self.contract,
                    data,
                },
                "latest",
            ),
            id: 1,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let envelope: JsonRpcResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Protocol(e.to_string()))?;

        match (envelope.result, envelope.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(FetchError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (None, None) => Err(FetchError::Protocol(
                "response has neither result nor error".into(),
            )),
        }
    }

    /// `name()` of the collection. `None` on failure or empty name.
    pub async fn collection_name(&self) -> Option<String> {
        let raw = self.read("name()", &abi::encode_call(abi::NAME, &[])).await?;
        non_empty(abi::decode_string(&raw))
    }

    /// `totalSupply()` of the collection.
    pub async fn total_supply(&self) -> Option<TokenId> {
        let raw = self
            .read("totalSupply()", &abi::encode_call(abi::TOTAL_SUPPLY, &[]))
            .await?;
        let supply = abi::decode_uint(&raw);
        if supply.is_none() {
            tracing::warn!("totalSupply() returned no value: {}", raw);
        }
        supply
    }

    /// `tokenURI(token_id)`. `None` on failure or when no string comes back.
    pub async fn token_uri(&self, token_id: &TokenId) -> Option<String> {
        let data = abi::encode_call(abi::TOKEN_URI, &[token_id.to_word()]);
        let raw = self.read("tokenURI(uint256)", &data).await?;
        non_empty(abi::decode_string(&raw))
    }

    async fn read(&self, function: &str, data: &str) -> Option<String> {
        match self.call(data).await {
            Ok(raw) => Some(raw),
            Err(e) if e.is_timeout() => {
                tracing::error!("{} on {} timed out: {}", function, self.contract, e);
                None
            }
            Err(e) => {
                tracing::error!("{} on {} failed: {}", function, self.contract, e);
                None
            }
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

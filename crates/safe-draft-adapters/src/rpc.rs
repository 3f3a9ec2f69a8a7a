//! Minimal JSON-RPC client for read-only chain calls.

use alloy::primitives::U256;
use serde::Deserialize;

use safe_draft_core::errors::{PortError, LOG_TARGET};
use safe_draft_core::ports::ChainReadPort;
use safe_draft_core::EstimateGasCall;

fn transport(context: &'static str, err: reqwest::Error) -> PortError {
    tracing::debug!(target: LOG_TARGET, %err, "{context}");
    PortError::Transport(err.to_string())
}

#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl ChainReadPort for JsonRpcClient {
    async fn estimate_gas(&self, call: EstimateGasCall) -> Result<U256, PortError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_estimateGas",
            "params": [{
                "from": call.from,
                "to": call.to,
                "data": call.data,
                "type": format!("0x{:x}", call.operation.as_u8()),
            }],
        });
        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("eth_estimateGas request failed", e))?
            .error_for_status()
            .map_err(|e| transport("eth_estimateGas request rejected", e))?;
        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| PortError::Validation(format!("rpc response parse failed: {e}")))?;

        if let Some(err) = body.error {
            return Err(PortError::Transport(format!(
                "eth_estimateGas failed ({}): {}",
                err.code, err.message
            )));
        }
        let hex = body
            .result
            .ok_or_else(|| PortError::Validation("rpc response missing result".to_owned()))?;
        hex.parse::<U256>()
            .map_err(|e| PortError::Validation(format!("invalid gas quantity '{hex}': {e}")))
    }
}

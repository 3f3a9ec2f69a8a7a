//! Safe gateway HTTP client for nonce and safeTxGas recommendations.

use alloy::primitives::{Address, U256};
use serde::Deserialize;

use safe_draft_core::errors::{PortError, LOG_TARGET};
use safe_draft_core::ports::RecommendationPort;
use safe_draft_core::SafeTransaction;

fn transport(context: &'static str, err: reqwest::Error) -> PortError {
    tracing::debug!(target: LOG_TARGET, %err, "{context}");
    PortError::Transport(err.to_string())
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    chain_id: u64,
    safe_address: Address,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoncesResponse {
    recommended_nonce: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstimationResponse {
    safe_tx_gas: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>, chain_id: u64, safe_address: Address) -> Self {
        Self {
            base_url: base_url.into(),
            chain_id,
            safe_address,
            http: reqwest::Client::new(),
        }
    }

    fn safe_url(&self, suffix: &str) -> String {
        format!(
            "{}/v1/chains/{}/safes/{}/{suffix}",
            self.base_url, self.chain_id, self.safe_address
        )
    }
}

impl RecommendationPort for GatewayClient {
    async fn recommended_nonce(&self) -> Result<Option<u64>, PortError> {
        let response = self
            .http
            .get(self.safe_url("nonces"))
            .send()
            .await
            .map_err(|e| transport("nonces request failed", e))?
            .error_for_status()
            .map_err(|e| transport("nonces request rejected", e))?;
        let body: NoncesResponse = response
            .json()
            .await
            .map_err(|e| PortError::Validation(format!("nonces response parse failed: {e}")))?;
        Ok(Some(body.recommended_nonce))
    }

    async fn recommended_safe_tx_gas(
        &self,
        draft: &SafeTransaction,
    ) -> Result<Option<U256>, PortError> {
        let body = serde_json::json!({
            "to": draft.to,
            "value": draft.value.to_string(),
            "data": draft.data,
            "operation": draft.operation.as_u8(),
        });
        let response = self
            .http
            .post(self.safe_url("multisig-transactions/estimations"))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("estimation request failed", e))?
            .error_for_status()
            .map_err(|e| transport("estimation request rejected", e))?;
        let body: EstimationResponse = response
            .json()
            .await
            .map_err(|e| PortError::Validation(format!("estimation response parse failed: {e}")))?;
        let gas = body
            .safe_tx_gas
            .parse::<U256>()
            .map_err(|e| PortError::Validation(format!("invalid safeTxGas '{}': {e}", body.safe_tx_gas)))?;
        Ok(Some(gas))
    }
}

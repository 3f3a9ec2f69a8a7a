use alloy::primitives::Address;

use safe_draft_core::errors::PortError;
use safe_draft_core::ports::TxServicePort;
use safe_draft_core::{OperationKind, SafeTransaction, TxParams};

/// Local transaction-construction service: validates raw parameters and
/// materializes an unsigned draft.
#[derive(Debug, Clone, Default)]
pub struct TxBuilder;

impl TxServicePort for TxBuilder {
    async fn create_tx(
        &self,
        params: TxParams,
        nonce: Option<u64>,
    ) -> Result<SafeTransaction, PortError> {
        if params.to == Address::ZERO {
            return Err(PortError::Validation(
                "transaction destination must not be the zero address".to_owned(),
            ));
        }
        if params.operation == OperationKind::DelegateCall && params.data.is_empty() {
            return Err(PortError::Validation(
                "delegate call without calldata".to_owned(),
            ));
        }
        Ok(SafeTransaction::from_params(params, nonce.unwrap_or(0)))
    }
}

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};

use crate::domain::{EstimateGasCall, SafeInfo, SafeTransaction, TxParams};
use crate::errors::PortError;
use crate::flows::FlowCall;

/// Transaction-construction service: turns raw parameters into a well-formed
/// unsigned draft. Without an explicit nonce the service picks its own default;
/// the coordinator reconciles it afterwards.
pub trait TxServicePort: Send + Sync {
    fn create_tx(
        &self,
        params: TxParams,
        nonce: Option<u64>,
    ) -> impl Future<Output = Result<SafeTransaction, PortError>> + Send;
}

/// Nonce/gas recommendation services backed by chain or indexer state.
/// Both values are advisory only.
pub trait RecommendationPort: Send + Sync {
    fn recommended_nonce(&self) -> impl Future<Output = Result<Option<u64>, PortError>> + Send;

    fn recommended_safe_tx_gas(
        &self,
        draft: &SafeTransaction,
    ) -> impl Future<Output = Result<Option<U256>, PortError>> + Send;
}

/// Migration service: may rewrite a draft against the current wallet/chain
/// context (e.g. prepending a required upgrade call). Identity transform when
/// not applicable.
pub trait MigrationPort: Send + Sync {
    fn migrate(
        &self,
        draft: SafeTransaction,
        safe: &SafeInfo,
    ) -> impl Future<Output = Result<SafeTransaction, PortError>> + Send;
}

/// Signer selection: may asynchronously switch the active signing identity.
/// The coordinator consumes no return value.
pub trait SignerSelectPort: Send + Sync {
    fn select_signer(
        &self,
        draft: Option<&SafeTransaction>,
        safe: &SafeInfo,
    ) -> impl Future<Output = Result<(), PortError>> + Send;
}

/// Calldata codec for the closed set of leaf-flow calls.
pub trait CallCodecPort: Send + Sync {
    fn encode_call(&self, call: &FlowCall) -> Result<Bytes, PortError>;
}

/// Encoder for the Safe `execTransaction` outer call, used by gas estimation.
pub trait ExecEncoderPort: Send + Sync {
    /// `sender` is the prospective executing owner; when set and not yet a
    /// signer, a pre-validated approved-hash signature is appended for it.
    fn encode_exec(
        &self,
        draft: &SafeTransaction,
        sender: Option<Address>,
    ) -> Result<Bytes, PortError>;
}

/// Read-only chain connection.
pub trait ChainReadPort: Send + Sync {
    fn estimate_gas(
        &self,
        call: EstimateGasCall,
    ) -> impl Future<Output = Result<U256, PortError>> + Send;
}

impl<T: TxServicePort> TxServicePort for Arc<T> {
    fn create_tx(
        &self,
        params: TxParams,
        nonce: Option<u64>,
    ) -> impl Future<Output = Result<SafeTransaction, PortError>> + Send {
        (**self).create_tx(params, nonce)
    }
}

impl<T: RecommendationPort> RecommendationPort for Arc<T> {
    fn recommended_nonce(&self) -> impl Future<Output = Result<Option<u64>, PortError>> + Send {
        (**self).recommended_nonce()
    }

    fn recommended_safe_tx_gas(
        &self,
        draft: &SafeTransaction,
    ) -> impl Future<Output = Result<Option<U256>, PortError>> + Send {
        (**self).recommended_safe_tx_gas(draft)
    }
}

impl<T: SignerSelectPort> SignerSelectPort for Arc<T> {
    fn select_signer(
        &self,
        draft: Option<&SafeTransaction>,
        safe: &SafeInfo,
    ) -> impl Future<Output = Result<(), PortError>> + Send {
        (**self).select_signer(draft, safe)
    }
}

impl<T: ChainReadPort> ChainReadPort for Arc<T> {
    fn estimate_gas(
        &self,
        call: EstimateGasCall,
    ) -> impl Future<Output = Result<U256, PortError>> + Send {
        (**self).estimate_gas(call)
    }
}

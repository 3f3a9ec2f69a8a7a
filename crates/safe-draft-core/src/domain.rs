use std::collections::BTreeMap;

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Execution mode of a Safe contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperationKind {
    #[default]
    Call,
    DelegateCall,
}

impl OperationKind {
    pub fn as_u8(self) -> u8 {
        match self {
            OperationKind::Call => 0,
            OperationKind::DelegateCall => 1,
        }
    }
}

/// Raw transaction parameters as produced by a leaf flow, before the
/// construction service turns them into a full draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationKind,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
}

impl Default for TxParams {
    fn default() -> Self {
        Self {
            to: Address::ZERO,
            value: U256::ZERO,
            data: Bytes::new(),
            operation: OperationKind::Call,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
        }
    }
}

/// The working multisig transaction.
///
/// Owned exclusively by the coordinator and always replaced whole, never
/// mutated in place, so dependent recomputations can compare by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationKind,
    pub nonce: u64,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    /// One signature per signer; the map keeps signers unique and ordered.
    pub signatures: BTreeMap<Address, Bytes>,
}

impl SafeTransaction {
    pub fn from_params(params: TxParams, nonce: u64) -> Self {
        Self {
            to: params.to,
            value: params.value,
            data: params.data,
            operation: params.operation,
            nonce,
            safe_tx_gas: params.safe_tx_gas,
            base_gas: params.base_gas,
            gas_price: params.gas_price,
            gas_token: params.gas_token,
            refund_receiver: params.refund_receiver,
            signatures: BTreeMap::new(),
        }
    }

    /// A signed draft is frozen: nonce and gas fields must never change again.
    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Adding further signatures is the only permitted change once signed.
    pub fn add_signature(&mut self, signer: Address, signature: Bytes) {
        self.signatures.insert(signer, signature);
    }

    pub fn params(&self) -> TxParams {
        TxParams {
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            operation: self.operation,
            safe_tx_gas: self.safe_tx_gas,
            base_gas: self.base_gas,
            gas_price: self.gas_price,
            gas_token: self.gas_token,
            refund_receiver: self.refund_receiver,
        }
    }
}

/// Indexed state of the Safe the drafts are prepared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeInfo {
    pub address: Address,
    pub chain_id: u64,
    /// Next on-chain nonce of the Safe itself (not of a draft).
    pub nonce: u64,
    pub threshold: u64,
    pub owners: Vec<Address>,
    /// Module contracts currently enabled on the Safe.
    pub modules: Vec<Address>,
    pub version: Option<String>,
    /// Whether the Safe still runs an L1 singleton on an L2 chain.
    pub l1_singleton: bool,
}

/// Parameters of an `eth_estimateGas` style read-only call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateGasCall {
    pub to: Address,
    pub from: Address,
    pub data: Bytes,
    pub operation: OperationKind,
}

//! Calldata codec for the contract calls the draft flows touch.
//!
//! All encoding goes through alloy `sol!` definitions; no hand-rolled ABI.

use std::collections::BTreeMap;

use alloy::primitives::{Address, Bytes};
use alloy::sol;
use alloy::sol_types::SolCall;

use safe_draft_core::errors::PortError;
use safe_draft_core::flows::FlowCall;
use safe_draft_core::ports::{CallCodecPort, ExecEncoderPort};
use safe_draft_core::SafeTransaction;

sol! {
    function transfer(address recipient, uint256 amount);
    function deleteAllowance(address delegate, address token);
    function addOwnerWithThreshold(address owner, uint256 _threshold);
    function removeOwner(address prevOwner, address owner, uint256 _threshold);
    function swapOwner(address prevOwner, address oldOwner, address newOwner);
    function changeThreshold(uint256 _threshold);
    function execTransaction(
        address to,
        uint256 value,
        bytes data,
        uint8 operation,
        uint256 safeTxGas,
        uint256 baseGas,
        uint256 gasPrice,
        address gasToken,
        address refundReceiver,
        bytes signatures
    );
    function migrateToL2(address l2Singleton);
    function multiSend(bytes transactions);
}

#[derive(Debug, Clone, Default)]
pub struct CallCodec;

impl CallCodecPort for CallCodec {
    fn encode_call(&self, call: &FlowCall) -> Result<Bytes, PortError> {
        let encoded = match call {
            FlowCall::Erc20Transfer { recipient, amount } => transferCall {
                recipient: *recipient,
                amount: *amount,
            }
            .abi_encode(),
            FlowCall::DeleteAllowance { beneficiary, token } => deleteAllowanceCall {
                delegate: *beneficiary,
                token: *token,
            }
            .abi_encode(),
            FlowCall::AddOwnerWithThreshold { owner, threshold } => addOwnerWithThresholdCall {
                owner: *owner,
                _threshold: *threshold,
            }
            .abi_encode(),
            FlowCall::RemoveOwner {
                prev_owner,
                owner,
                threshold,
            } => removeOwnerCall {
                prevOwner: *prev_owner,
                owner: *owner,
                _threshold: *threshold,
            }
            .abi_encode(),
            FlowCall::SwapOwner {
                prev_owner,
                old_owner,
                new_owner,
            } => swapOwnerCall {
                prevOwner: *prev_owner,
                oldOwner: *old_owner,
                newOwner: *new_owner,
            }
            .abi_encode(),
            FlowCall::ChangeThreshold { threshold } => changeThresholdCall {
                _threshold: *threshold,
            }
            .abi_encode(),
        };
        Ok(Bytes::from(encoded))
    }
}

impl ExecEncoderPort for CallCodec {
    fn encode_exec(
        &self,
        draft: &SafeTransaction,
        sender: Option<Address>,
    ) -> Result<Bytes, PortError> {
        let call = execTransactionCall {
            to: draft.to,
            value: draft.value,
            data: draft.data.clone(),
            operation: draft.operation.as_u8(),
            safeTxGas: draft.safe_tx_gas,
            baseGas: draft.base_gas,
            gasPrice: draft.gas_price,
            gasToken: draft.gas_token,
            refundReceiver: draft.refund_receiver,
            signatures: encode_signatures(draft, sender),
        };
        Ok(Bytes::from(call.abi_encode()))
    }
}

/// Concatenate collected signatures in ascending signer order, appending a
/// pre-validated approved-hash signature (r = signer, v = 1) for an executing
/// owner who has not signed yet.
pub fn encode_signatures(draft: &SafeTransaction, sender: Option<Address>) -> Bytes {
    let mut by_signer: BTreeMap<Address, Bytes> = draft.signatures.clone();
    if let Some(owner) = sender {
        if !by_signer.contains_key(&owner) {
            by_signer.insert(owner, pre_validated_signature(owner));
        }
    }

    let mut out = Vec::with_capacity(by_signer.len() * 65);
    for signature in by_signer.values() {
        out.extend_from_slice(signature);
    }
    Bytes::from(out)
}

/// 65-byte approved-hash signature: r carries the approving owner, s is
/// unused, v = 1.
fn pre_validated_signature(owner: Address) -> Bytes {
    let mut sig = vec![0u8; 65];
    sig[12..32].copy_from_slice(owner.as_slice());
    sig[64] = 1;
    Bytes::from(sig)
}

//! Leaf draft-request flows.
//!
//! Each user intent (transfer, spending-limit revocation, settings change) is
//! one variant of a closed [`DraftRequest`] set. A request builds raw
//! [`TxParams`] against the current Safe context and hands them to the
//! coordinator; a failed precondition (module not deployed, owner unknown)
//! means "not applicable" and must leave the coordinator untouched.

use alloy::primitives::{address, Address, Bytes, U256};

use crate::coordinator::DraftCoordinator;
use crate::domain::{SafeInfo, TxParams};
use crate::errors::{PortError, LOG_TARGET};
use crate::ports::{
    CallCodecPort, MigrationPort, RecommendationPort, SignerSelectPort, TxServicePort,
};

/// Head sentinel of the Safe owner linked list.
pub const SENTINEL_OWNER: Address = address!("0000000000000000000000000000000000000001");

/// Canonical allowance-module deployments per chain.
pub const SPENDING_LIMIT_MODULES: &[(u64, Address)] = &[
    (1, address!("CFbFaC74C26F8647cBDb8c5caf80BB5b32E43134")),
    (56, address!("CFbFaC74C26F8647cBDb8c5caf80BB5b32E43134")),
    (100, address!("CFbFaC74C26F8647cBDb8c5caf80BB5b32E43134")),
    (137, address!("CFbFaC74C26F8647cBDb8c5caf80BB5b32E43134")),
    (42_161, address!("CFbFaC74C26F8647cBDb8c5caf80BB5b32E43134")),
    (43_114, address!("CFbFaC74C26F8647cBDb8c5caf80BB5b32E43134")),
];

/// The spending-limit module address usable for this Safe, i.e. the canonical
/// deployment for the chain intersected with the Safe's enabled modules.
pub fn deployed_spending_limit_module(chain_id: u64, enabled: &[Address]) -> Option<Address> {
    let canonical = SPENDING_LIMIT_MODULES
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, addr)| *addr)?;
    enabled.iter().copied().find(|module| *module == canonical)
}

/// Pointer to the owner preceding `owner` in the Safe's linked owner list.
pub fn previous_owner(owners: &[Address], owner: Address) -> Option<Address> {
    owners.iter().position(|o| *o == owner).map(|idx| {
        if idx == 0 {
            SENTINEL_OWNER
        } else {
            owners[idx - 1]
        }
    })
}

/// Concrete contract calls a flow may need encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowCall {
    Erc20Transfer {
        recipient: Address,
        amount: U256,
    },
    DeleteAllowance {
        beneficiary: Address,
        token: Address,
    },
    AddOwnerWithThreshold {
        owner: Address,
        threshold: U256,
    },
    RemoveOwner {
        prev_owner: Address,
        owner: Address,
        threshold: U256,
    },
    SwapOwner {
        prev_owner: Address,
        old_owner: Address,
        new_owner: Address,
    },
    ChangeThreshold {
        threshold: U256,
    },
}

/// Settings-change intents targeting the Safe contract itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    AddOwner { owner: Address, threshold: u64 },
    RemoveOwner { owner: Address, threshold: u64 },
    SwapOwner { old_owner: Address, new_owner: Address },
    ChangeThreshold { threshold: u64 },
}

/// Closed set of draft requests the UI flows can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftRequest {
    NativeTransfer {
        recipient: Address,
        amount: U256,
    },
    Erc20Transfer {
        token: Address,
        recipient: Address,
        amount: U256,
    },
    RemoveSpendingLimit {
        beneficiary: Address,
        token: Address,
    },
    SettingsChange(SettingsChange),
}

impl DraftRequest {
    /// Build raw transaction parameters for this request.
    ///
    /// `Ok(None)` means a local precondition failed and the request is not
    /// applicable on this Safe; nothing should be submitted.
    pub fn build<C: CallCodecPort>(
        &self,
        safe: &SafeInfo,
        codec: &C,
    ) -> Result<Option<TxParams>, PortError> {
        match self {
            DraftRequest::NativeTransfer { recipient, amount } => Ok(Some(TxParams {
                to: *recipient,
                value: *amount,
                data: Bytes::new(),
                ..TxParams::default()
            })),

            DraftRequest::Erc20Transfer {
                token,
                recipient,
                amount,
            } => {
                let data = codec.encode_call(&FlowCall::Erc20Transfer {
                    recipient: *recipient,
                    amount: *amount,
                })?;
                Ok(Some(TxParams {
                    to: *token,
                    data,
                    ..TxParams::default()
                }))
            }

            DraftRequest::RemoveSpendingLimit { beneficiary, token } => {
                let Some(module) = deployed_spending_limit_module(safe.chain_id, &safe.modules)
                else {
                    return Ok(None);
                };
                let data = codec.encode_call(&FlowCall::DeleteAllowance {
                    beneficiary: *beneficiary,
                    token: *token,
                })?;
                Ok(Some(TxParams {
                    to: module,
                    data,
                    ..TxParams::default()
                }))
            }

            DraftRequest::SettingsChange(change) => {
                let call = match change {
                    SettingsChange::AddOwner { owner, threshold } => {
                        FlowCall::AddOwnerWithThreshold {
                            owner: *owner,
                            threshold: U256::from(*threshold),
                        }
                    }
                    SettingsChange::RemoveOwner { owner, threshold } => {
                        let Some(prev_owner) = previous_owner(&safe.owners, *owner) else {
                            return Ok(None);
                        };
                        FlowCall::RemoveOwner {
                            prev_owner,
                            owner: *owner,
                            threshold: U256::from(*threshold),
                        }
                    }
                    SettingsChange::SwapOwner {
                        old_owner,
                        new_owner,
                    } => {
                        let Some(prev_owner) = previous_owner(&safe.owners, *old_owner) else {
                            return Ok(None);
                        };
                        FlowCall::SwapOwner {
                            prev_owner,
                            old_owner: *old_owner,
                            new_owner: *new_owner,
                        }
                    }
                    SettingsChange::ChangeThreshold { threshold } => FlowCall::ChangeThreshold {
                        threshold: U256::from(*threshold),
                    },
                };
                let data = codec.encode_call(&call)?;
                Ok(Some(TxParams {
                    to: safe.address,
                    data,
                    ..TxParams::default()
                }))
            }
        }
    }
}

/// Build a request and hand the result to the coordinator.
///
/// A precondition or encoding failure aborts silently: the coordinator's draft
/// and error state stay exactly as they were. Re-invoking with fresh inputs
/// supersedes any earlier submission, since the coordinator replaces its draft
/// whole.
pub async fn submit<C, T, R, M, S>(
    request: &DraftRequest,
    safe: &SafeInfo,
    codec: &C,
    coordinator: &DraftCoordinator<T, R, M, S>,
) where
    C: CallCodecPort,
    T: TxServicePort,
    R: RecommendationPort,
    M: MigrationPort,
    S: SignerSelectPort,
{
    let params = match request.build(safe, codec) {
        Ok(Some(params)) => params,
        Ok(None) => {
            tracing::debug!(target: LOG_TARGET, ?request, "draft request not applicable, skipped");
            return;
        }
        Err(err) => {
            tracing::debug!(target: LOG_TARGET, %err, "draft request encoding failed, skipped");
            return;
        }
    };
    coordinator.submit_params(params).await;
}

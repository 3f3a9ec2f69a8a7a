//! Gas ceiling estimation for the outer `execTransaction` call.
//!
//! Two chains get special treatment: Oasis Sapphire cannot be live-estimated,
//! so a fixed cost table keyed on (method selector, zero value, self target)
//! picks a constant; Gnosis Chain's estimator undershoots when safeTxGas is
//! set, so its raw estimate is inflated by a fixed percentage.

use alloy::primitives::{Address, Bytes, U256};

use crate::domain::{EstimateGasCall, SafeTransaction};
use crate::errors::{log_error, DraftError, ErrorCode};
use crate::ports::ChainReadPort;

/// Oasis Sapphire: live estimation is bypassed entirely.
pub const FIXED_ESTIMATE_CHAIN_ID: u64 = 23_294;

/// Gnosis Chain: estimates are corrected for a known estimator bias.
pub const ESTIMATOR_CORRECTION_CHAIN_ID: u64 = 100;

/// Correction applied on [`ESTIMATOR_CORRECTION_CHAIN_ID`], in percent.
pub const ESTIMATOR_CORRECTION_PERCENT: u64 = 30;

/// Generous ceiling for calls the fixed table does not recognize.
pub const FALLBACK_FIXED_ESTIMATE: u64 = 3_500_000;

pub const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
pub const TOKEN_SAFE_TRANSFER_SELECTOR: [u8; 4] = [0x42, 0x84, 0x2e, 0x0e];
pub const REMOVE_OWNER_SELECTOR: [u8; 4] = [0xf8, 0xdc, 0x5d, 0xd9];
pub const ADD_OWNER_SELECTOR: [u8; 4] = [0x0d, 0x58, 0x2f, 0x13];
pub const SWAP_OWNER_SELECTOR: [u8; 4] = [0xe3, 0x18, 0xb5, 0x2b];
pub const CHANGE_THRESHOLD_SELECTOR: [u8; 4] = [0x69, 0x4e, 0x80, 0xc3];

/// One row of the fixed cost table.
///
/// `selector: None` matches empty calldata. `zero_value` must equal the
/// call's value-is-zero predicate. `self_target` additionally requires the
/// destination to be the Safe itself.
#[derive(Debug, Clone, Copy)]
pub struct FixedCost {
    pub selector: Option<[u8; 4]>,
    pub zero_value: bool,
    pub self_target: bool,
    pub gas: u64,
}

pub const FIXED_COSTS: &[FixedCost] = &[
    // On-chain cancellation: empty self-call
    FixedCost { selector: None, zero_value: true, self_target: true, gas: 80_000 },
    // Native token transfer
    FixedCost { selector: None, zero_value: false, self_target: false, gas: 100_000 },
    // ERC-20 transfer
    FixedCost {
        selector: Some(ERC20_TRANSFER_SELECTOR),
        zero_value: true,
        self_target: false,
        gas: 150_000,
    },
    // NFT safeTransferFrom
    FixedCost {
        selector: Some(TOKEN_SAFE_TRANSFER_SELECTOR),
        zero_value: true,
        self_target: false,
        gas: 150_000,
    },
    // Owner management
    FixedCost {
        selector: Some(REMOVE_OWNER_SELECTOR),
        zero_value: true,
        self_target: true,
        gas: 70_000,
    },
    FixedCost {
        selector: Some(ADD_OWNER_SELECTOR),
        zero_value: true,
        self_target: true,
        gas: 130_000,
    },
    FixedCost {
        selector: Some(SWAP_OWNER_SELECTOR),
        zero_value: true,
        self_target: true,
        gas: 100_000,
    },
    FixedCost {
        selector: Some(CHANGE_THRESHOLD_SELECTOR),
        zero_value: true,
        self_target: true,
        gas: 70_000,
    },
];

/// Constant estimate for a call on the fixed-estimate chain.
pub fn fixed_gas_estimate(to: Address, value: U256, data: &[u8], safe_address: Address) -> u64 {
    let selector: Option<[u8; 4]> = if data.len() >= 4 {
        let mut s = [0u8; 4];
        s.copy_from_slice(&data[0..4]);
        Some(s)
    } else {
        None
    };

    for row in FIXED_COSTS {
        if row.selector != selector {
            continue;
        }
        if row.zero_value != value.is_zero() {
            continue;
        }
        if row.self_target && to != safe_address {
            continue;
        }
        return row.gas;
    }
    FALLBACK_FIXED_ESTIMATE
}

/// Inflate a raw node estimate on the correction chain when a non-zero
/// safeTxGas is embedded in the draft; identity everywhere else.
pub fn apply_estimator_correction(chain_id: u64, safe_tx_gas: U256, raw: U256) -> U256 {
    if chain_id == ESTIMATOR_CORRECTION_CHAIN_ID && !safe_tx_gas.is_zero() {
        raw * U256::from(100 + ESTIMATOR_CORRECTION_PERCENT) / U256::from(100)
    } else {
        raw
    }
}

/// Inputs for a gas ceiling estimate. `sender`, `draft` and `encoded_call`
/// are all required for a live estimate; if any is absent the helper is a
/// no-op.
#[derive(Debug, Clone)]
pub struct GasEstimateRequest<'a> {
    pub chain_id: u64,
    pub safe_address: Address,
    pub sender: Option<Address>,
    pub draft: Option<&'a SafeTransaction>,
    /// Encoded outer `execTransaction` call for the draft.
    pub encoded_call: Option<Bytes>,
}

/// Estimate the gas ceiling for executing a draft.
///
/// Returns `Ok(None)` when inputs are incomplete. Estimation failures are
/// logged and surfaced as [`DraftError::Estimation`], never swallowed.
pub async fn estimate_gas_limit<C: ChainReadPort>(
    chain: &C,
    request: GasEstimateRequest<'_>,
) -> Result<Option<U256>, DraftError> {
    let (Some(sender), Some(draft), Some(encoded_call)) =
        (request.sender, request.draft, request.encoded_call)
    else {
        return Ok(None);
    };

    if request.chain_id == FIXED_ESTIMATE_CHAIN_ID {
        let gas = fixed_gas_estimate(draft.to, draft.value, &draft.data, request.safe_address);
        return Ok(Some(U256::from(gas)));
    }

    let call = EstimateGasCall {
        to: request.safe_address,
        from: sender,
        data: encoded_call,
        operation: draft.operation,
    };
    match chain.estimate_gas(call).await {
        Ok(raw) => Ok(Some(apply_estimator_correction(
            request.chain_id,
            draft.safe_tx_gas,
            raw,
        ))),
        Err(err) => {
            log_error(ErrorCode::EstimateGas, &err.to_string());
            Err(DraftError::Estimation(err.to_string()))
        }
    }
}

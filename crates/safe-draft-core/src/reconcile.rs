//! Pure reconciliation rules for the draft's effective nonce and gas.
//!
//! Three nonce sources (user override, recommendation, embedded value) and two
//! gas sources collapse into one effective value. A signed draft is frozen to
//! its embedded values regardless of overrides or recommendations.

use alloy::primitives::U256;

use crate::domain::SafeTransaction;

/// Effective nonce: embedded if signed; else user override, else recommended,
/// else whatever the draft already carries (possibly nothing).
pub fn effective_nonce(
    draft: Option<&SafeTransaction>,
    user: Option<u64>,
    recommended: Option<u64>,
) -> Option<u64> {
    match draft {
        Some(tx) if tx.is_signed() => Some(tx.nonce),
        _ => user.or(recommended).or(draft.map(|tx| tx.nonce)),
    }
}

/// Effective safeTxGas, same precedence as [`effective_nonce`].
pub fn effective_safe_tx_gas(
    draft: Option<&SafeTransaction>,
    user: Option<U256>,
    recommended: Option<U256>,
) -> Option<U256> {
    match draft {
        Some(tx) if tx.is_signed() => Some(tx.safe_tx_gas),
        _ => user.or(recommended).or(draft.map(|tx| tx.safe_tx_gas)),
    }
}

/// A rebuild is due when the draft is unsigned and its embedded nonce or gas
/// no longer matches the effective values.
pub fn rebuild_needed(draft: &SafeTransaction, nonce: u64, safe_tx_gas: U256) -> bool {
    !draft.is_signed() && (draft.nonce != nonce || draft.safe_tx_gas != safe_tx_gas)
}

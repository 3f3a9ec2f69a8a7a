//! Signer selection: picks the connected wallet identity that should produce
//! the next signature for a draft.

use std::sync::{Mutex, MutexGuard};

use alloy::primitives::Address;

use safe_draft_core::errors::PortError;
use safe_draft_core::ports::SignerSelectPort;
use safe_draft_core::{SafeInfo, SafeTransaction};

#[derive(Debug, Default)]
pub struct WalletSignerSelector {
    connected: Mutex<Vec<Address>>,
    active: Mutex<Option<Address>>,
}

impl WalletSignerSelector {
    pub fn new(connected: Vec<Address>) -> Self {
        Self {
            connected: Mutex::new(connected),
            active: Mutex::new(None),
        }
    }

    pub fn set_connected(&self, accounts: Vec<Address>) {
        *lock_or_recover(&self.connected) = accounts;
    }

    pub fn active(&self) -> Option<Address> {
        *lock_or_recover(&self.active)
    }
}

impl SignerSelectPort for WalletSignerSelector {
    /// Prefer a connected owner that has not signed the draft yet; fall back
    /// to any connected owner; clear the selection when none qualifies.
    async fn select_signer(
        &self,
        draft: Option<&SafeTransaction>,
        safe: &SafeInfo,
    ) -> Result<(), PortError> {
        let connected = lock_or_recover(&self.connected).clone();
        let owners: Vec<Address> = connected
            .iter()
            .copied()
            .filter(|account| safe.owners.contains(account))
            .collect();

        let unsigned = owners.iter().copied().find(|owner| {
            draft
                .map(|tx| !tx.signatures.contains_key(owner))
                .unwrap_or(true)
        });
        *lock_or_recover(&self.active) = unsigned.or_else(|| owners.first().copied());
        Ok(())
    }
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

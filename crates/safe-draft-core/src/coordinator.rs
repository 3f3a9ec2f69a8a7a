//! Transaction draft coordinator.
//!
//! Single source of truth for the transaction being prepared. Reconciles user
//! overrides, recommendations and the embedded draft values into effective
//! nonce/gas, rebuilds the draft through the construction port when they
//! drift, and publishes every state change as a whole [`DraftSnapshot`] on a
//! watch channel.
//!
//! The embedding event loop drives recomputation explicitly: after changing
//! inputs, call [`DraftCoordinator::reconcile`]. Overlapping rebuilds are not
//! cancelled; whichever in-flight rebuild resolves last wins.

use std::sync::{Mutex, MutexGuard};

use alloy::primitives::{Address, Bytes, U256};
use tokio::sync::watch;

use crate::domain::{SafeInfo, SafeTransaction, TxParams};
use crate::errors::{log_error, DraftError, ErrorCode, LOG_TARGET};
use crate::ports::{MigrationPort, RecommendationPort, SignerSelectPort, TxServicePort};
use crate::reconcile::{effective_nonce, effective_safe_tx_gas, rebuild_needed};

/// Externally observable coordinator state, replaced whole on every change.
#[derive(Debug, Clone)]
pub struct DraftSnapshot {
    pub draft: Option<SafeTransaction>,
    pub effective_nonce: Option<u64>,
    pub effective_safe_tx_gas: Option<U256>,
    pub recommended_nonce: Option<u64>,
    pub nonce_needed: bool,
    pub origin: Option<String>,
    pub error: Option<DraftError>,
}

impl Default for DraftSnapshot {
    fn default() -> Self {
        Self {
            draft: None,
            effective_nonce: None,
            effective_safe_tx_gas: None,
            recommended_nonce: None,
            nonce_needed: true,
            origin: None,
            error: None,
        }
    }
}

#[derive(Debug)]
struct DraftState {
    draft: Option<SafeTransaction>,
    user_nonce: Option<u64>,
    user_safe_tx_gas: Option<U256>,
    recommended_nonce: Option<u64>,
    recommended_safe_tx_gas: Option<U256>,
    nonce_needed: bool,
    origin: Option<String>,
    error: Option<DraftError>,
}

impl Default for DraftState {
    fn default() -> Self {
        Self {
            draft: None,
            user_nonce: None,
            user_safe_tx_gas: None,
            recommended_nonce: None,
            recommended_safe_tx_gas: None,
            nonce_needed: true,
            origin: None,
            error: None,
        }
    }
}

pub struct DraftCoordinator<T, R, M, S>
where
    T: TxServicePort,
    R: RecommendationPort,
    M: MigrationPort,
    S: SignerSelectPort,
{
    tx_service: T,
    recommendations: R,
    migration: M,
    signer_select: S,
    context: Mutex<SafeInfo>,
    state: Mutex<DraftState>,
    snapshots: watch::Sender<DraftSnapshot>,
}

impl<T, R, M, S> DraftCoordinator<T, R, M, S>
where
    T: TxServicePort,
    R: RecommendationPort,
    M: MigrationPort,
    S: SignerSelectPort,
{
    pub fn new(tx_service: T, recommendations: R, migration: M, signer_select: S, safe: SafeInfo) -> Self {
        let (snapshots, _) = watch::channel(DraftSnapshot::default());
        Self {
            tx_service,
            recommendations,
            migration,
            signer_select,
            context: Mutex::new(safe),
            state: Mutex::new(DraftState::default()),
            snapshots,
        }
    }

    /// Observe coordinator state. Receivers always see the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DraftSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn current_draft(&self) -> Option<SafeTransaction> {
        self.state().draft.clone()
    }

    pub fn error(&self) -> Option<DraftError> {
        self.state().error.clone()
    }

    /// Replace the wallet/chain context the coordinator works against.
    pub fn set_context(&self, safe: SafeInfo) {
        *lock_or_recover(&self.context) = safe;
    }

    /// Replace the draft. The committed value is the migrated draft; signer
    /// re-selection runs against it independently.
    pub async fn set_draft(&self, next: Option<SafeTransaction>) {
        self.commit_draft(next).await;
    }

    /// Updater form of [`set_draft`](Self::set_draft): the closure receives
    /// the previous draft and returns the replacement.
    pub async fn set_draft_with<F>(&self, update: F)
    where
        F: FnOnce(Option<SafeTransaction>) -> Option<SafeTransaction>,
    {
        let prev = self.state().draft.clone();
        self.commit_draft(update(prev)).await;
    }

    /// Add a signature to the current draft. Permitted on signed drafts; the
    /// only mutation that is.
    pub async fn add_signature(&self, signer: Address, signature: Bytes) {
        self.set_draft_with(|prev| {
            prev.map(|mut tx| {
                tx.add_signature(signer, signature);
                tx
            })
        })
        .await;
    }

    /// Record an explicit user nonce override. No synchronous rebuild; the
    /// next [`reconcile`](Self::reconcile) applies the precedence rules.
    pub fn set_user_nonce(&self, nonce: Option<u64>) {
        let mut state = self.state();
        state.user_nonce = nonce;
        self.publish(&state);
    }

    /// Record an explicit user safeTxGas override.
    pub fn set_user_safe_tx_gas(&self, safe_tx_gas: Option<U256>) {
        let mut state = self.state();
        state.user_safe_tx_gas = safe_tx_gas;
        self.publish(&state);
    }

    /// Advisory flag: whether the current flow requires a nonce input.
    pub fn set_nonce_needed(&self, needed: bool) {
        let mut state = self.state();
        state.nonce_needed = needed;
        self.publish(&state);
    }

    /// Tag describing the external caller that requested this transaction.
    pub fn set_origin(&self, origin: Option<String>) {
        let mut state = self.state();
        state.origin = origin;
        self.publish(&state);
    }

    /// Record a draft error. Logged once per occurrence, repeats included.
    pub fn set_error(&self, error: DraftError) {
        log_error(error.code(), &error.to_string());
        let mut state = self.state();
        state.error = Some(error);
        self.publish(&state);
    }

    /// Build a draft from raw leaf-flow parameters and commit it. A
    /// construction failure surfaces as a draft error; the previous draft is
    /// kept.
    pub async fn submit_params(&self, params: TxParams) {
        match self.tx_service.create_tx(params, None).await {
            Ok(tx) => self.set_draft(Some(tx)).await,
            Err(err) => self.set_error(DraftError::Construction(err.to_string())),
        }
    }

    /// Refresh recommendations and rebuild the draft if its embedded nonce or
    /// gas no longer matches the effective values.
    ///
    /// Returns whether a rebuild committed. Signed drafts are never rebuilt.
    /// Concurrent calls are not serialized: a stale rebuild resolving after a
    /// newer one overwrites it (last write wins).
    pub async fn reconcile(&self) -> bool {
        let (draft, user_nonce, user_safe_tx_gas) = {
            let state = self.state();
            (state.draft.clone(), state.user_nonce, state.user_safe_tx_gas)
        };

        let recommended_nonce = match self.recommendations.recommended_nonce().await {
            Ok(nonce) => nonce,
            Err(err) => {
                tracing::debug!(target: LOG_TARGET, %err, "nonce recommendation unavailable");
                None
            }
        };
        let recommended_safe_tx_gas = match draft.as_ref() {
            Some(tx) => match self.recommendations.recommended_safe_tx_gas(tx).await {
                Ok(gas) => gas,
                Err(err) => {
                    tracing::debug!(target: LOG_TARGET, %err, "gas recommendation unavailable");
                    None
                }
            },
            None => None,
        };
        {
            let mut state = self.state();
            state.recommended_nonce = recommended_nonce;
            state.recommended_safe_tx_gas = recommended_safe_tx_gas;
            self.publish(&state);
        }

        let Some(current) = draft else {
            return false;
        };
        if current.is_signed() {
            return false;
        }

        let final_nonce = effective_nonce(Some(&current), user_nonce, recommended_nonce)
            .unwrap_or(current.nonce);
        let final_safe_tx_gas =
            effective_safe_tx_gas(Some(&current), user_safe_tx_gas, recommended_safe_tx_gas)
                .unwrap_or(current.safe_tx_gas);
        if !rebuild_needed(&current, final_nonce, final_safe_tx_gas) {
            return false;
        }

        {
            let mut state = self.state();
            state.error = None;
            self.publish(&state);
        }

        let mut params = current.params();
        params.safe_tx_gas = final_safe_tx_gas;
        match self.tx_service.create_tx(params, Some(final_nonce)).await {
            Ok(tx) => {
                let mut state = self.state();
                state.draft = Some(tx);
                self.publish(&state);
                true
            }
            Err(err) => {
                self.set_error(DraftError::Construction(err.to_string()));
                false
            }
        }
    }

    async fn commit_draft(&self, next: Option<SafeTransaction>) {
        let safe = lock_or_recover(&self.context).clone();

        let migrated = match next {
            Some(tx) => match self.migration.migrate(tx, &safe).await {
                Ok(tx) => Some(tx),
                Err(err) => {
                    log_error(ErrorCode::Migration, &err.to_string());
                    let mut state = self.state();
                    state.error = Some(DraftError::Construction(err.to_string()));
                    self.publish(&state);
                    return;
                }
            },
            None => None,
        };

        {
            let mut state = self.state();
            state.draft = migrated.clone();
            self.publish(&state);
        }

        // Outcome deliberately ignored; signer selection is best effort.
        if let Err(err) = self.signer_select.select_signer(migrated.as_ref(), &safe).await {
            tracing::debug!(target: LOG_TARGET, %err, "signer selection failed");
        }
    }

    fn publish(&self, state: &DraftState) {
        let snapshot = DraftSnapshot {
            draft: state.draft.clone(),
            effective_nonce: effective_nonce(
                state.draft.as_ref(),
                state.user_nonce,
                state.recommended_nonce,
            ),
            effective_safe_tx_gas: effective_safe_tx_gas(
                state.draft.as_ref(),
                state.user_safe_tx_gas,
                state.recommended_safe_tx_gas,
            ),
            recommended_nonce: state.recommended_nonce,
            nonce_needed: state.nonce_needed,
            origin: state.origin.clone(),
            error: state.error.clone(),
        };
        self.snapshots.send_replace(snapshot);
    }

    fn state(&self) -> MutexGuard<'_, DraftState> {
        lock_or_recover(&self.state)
    }
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

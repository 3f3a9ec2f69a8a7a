//! Safe-to-L2 migration rewriting.
//!
//! A Safe deployed on an L2 chain with the L1 singleton must switch to the L2
//! singleton before its first transaction executes. While the Safe is still at
//! nonce 0 and the draft is unsigned, the draft is rewritten into a
//! delegate-called `multiSend` that performs the migration first and the
//! original call second. In every other situation the draft passes through
//! untouched.

use alloy::primitives::{address, Address, Bytes, U256};
use alloy::sol_types::SolCall;
use semver::Version;

use safe_draft_core::errors::PortError;
use safe_draft_core::ports::MigrationPort;
use safe_draft_core::{OperationKind, SafeInfo, SafeTransaction};

use crate::codec::{migrateToL2Call, multiSendCall};

pub const MAINNET_CHAIN_ID: u64 = 1;

/// SafeToL2Migration contract (delegate-called).
pub const SAFE_TO_L2_MIGRATION: Address = address!("fF83F6335d8930cBad1c0D439A841f01888D9f69");

/// Canonical SafeL2 1.4.1 singleton.
pub const SAFE_L2_SINGLETON: Address = address!("29fcB43b46531BcA003ddC8FCB67FFE91900C762");

/// MultiSend 1.4.1 (supports delegate-call batches).
pub const MULTI_SEND: Address = address!("38869bf66a61cF6bDB996A6aE40D5853Fd43B526");

/// Contract versions below this have no migration path.
const MIN_MIGRATABLE_VERSION: Version = Version::new(1, 3, 0);

#[derive(Debug, Clone, Default)]
pub struct SafeToL2Migration;

impl SafeToL2Migration {
    fn applies(&self, draft: &SafeTransaction, safe: &SafeInfo) -> bool {
        if safe.chain_id == MAINNET_CHAIN_ID || !safe.l1_singleton {
            return false;
        }
        // Migration must be the Safe's very first executed transaction, and a
        // signed draft can no longer be rewritten.
        if safe.nonce != 0 || draft.is_signed() {
            return false;
        }
        match safe.version.as_deref().map(Version::parse) {
            Some(Ok(version)) => version >= MIN_MIGRATABLE_VERSION,
            _ => false,
        }
    }
}

impl MigrationPort for SafeToL2Migration {
    async fn migrate(
        &self,
        draft: SafeTransaction,
        safe: &SafeInfo,
    ) -> Result<SafeTransaction, PortError> {
        if !self.applies(&draft, safe) {
            return Ok(draft);
        }

        let migration_data = Bytes::from(
            migrateToL2Call {
                l2Singleton: SAFE_L2_SINGLETON,
            }
            .abi_encode(),
        );

        let mut transactions = Vec::new();
        transactions.extend(packed_multisend_tx(
            OperationKind::DelegateCall,
            SAFE_TO_L2_MIGRATION,
            U256::ZERO,
            &migration_data,
        ));
        transactions.extend(packed_multisend_tx(
            draft.operation,
            draft.to,
            draft.value,
            &draft.data,
        ));

        let data = Bytes::from(
            multiSendCall {
                transactions: Bytes::from(transactions),
            }
            .abi_encode(),
        );

        Ok(SafeTransaction {
            to: MULTI_SEND,
            value: U256::ZERO,
            data,
            operation: OperationKind::DelegateCall,
            ..draft
        })
    }
}

/// MultiSend packed encoding: operation (1 byte), to (20), value (32),
/// data length (32), data.
fn packed_multisend_tx(
    operation: OperationKind,
    to: Address,
    value: U256,
    data: &Bytes,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(85 + data.len());
    out.push(operation.as_u8());
    out.extend_from_slice(to.as_slice());
    out.extend_from_slice(&value.to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(data.len()).to_be_bytes::<32>());
    out.extend_from_slice(data);
    out
}

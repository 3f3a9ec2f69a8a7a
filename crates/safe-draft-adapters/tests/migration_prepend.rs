mod common;

use alloy::primitives::U256;
use alloy::sol_types::SolCall;

use common::{l2_safe_info, owner_a, recipient, signature_bytes, unsigned_draft};
use safe_draft_adapters::codec::{migrateToL2Call, multiSendCall};
use safe_draft_adapters::migration::{
    SafeToL2Migration, MULTI_SEND, SAFE_L2_SINGLETON, SAFE_TO_L2_MIGRATION,
};
use safe_draft_core::ports::MigrationPort;
use safe_draft_core::{OperationKind, SafeInfo, SafeTransaction};

async fn migrate(draft: SafeTransaction, safe: &SafeInfo) -> SafeTransaction {
    SafeToL2Migration
        .migrate(draft, safe)
        .await
        .expect("migration never errors")
}

#[tokio::test]
async fn eligible_draft_is_rewritten_into_a_multisend_batch() {
    let original = unsigned_draft();
    let rewritten = migrate(original.clone(), &l2_safe_info()).await;

    assert_eq!(rewritten.to, MULTI_SEND);
    assert_eq!(rewritten.value, U256::ZERO);
    assert_eq!(rewritten.operation, OperationKind::DelegateCall);
    // Nonce and gas fields carry over from the original draft.
    assert_eq!(rewritten.nonce, original.nonce);
    assert_eq!(rewritten.safe_tx_gas, original.safe_tx_gas);

    let call = multiSendCall::abi_decode(&rewritten.data, true).expect("multiSend calldata");
    let packed = call.transactions.as_ref();

    // First packed tx: delegate-called migration.
    assert_eq!(packed[0], 1);
    assert_eq!(&packed[1..21], SAFE_TO_L2_MIGRATION.as_slice());
    assert_eq!(&packed[21..53], &U256::ZERO.to_be_bytes::<32>());
    let migration_len = 4 + 32;
    assert_eq!(
        &packed[53..85],
        &U256::from(migration_len).to_be_bytes::<32>()
    );
    assert_eq!(&packed[85..89], &migrateToL2Call::SELECTOR);
    assert_eq!(&packed[101..121], SAFE_L2_SINGLETON.as_slice());

    // Second packed tx: the original call, verbatim.
    let second = &packed[85 + migration_len..];
    assert_eq!(second[0], 0);
    assert_eq!(&second[1..21], recipient().as_slice());
    assert_eq!(&second[21..53], &original.value.to_be_bytes::<32>());
    assert_eq!(&second[53..85], &U256::ZERO.to_be_bytes::<32>());
    assert_eq!(second.len(), 85);
}

#[tokio::test]
async fn mainnet_safes_pass_through() {
    let mut safe = l2_safe_info();
    safe.chain_id = 1;
    let draft = unsigned_draft();
    assert_eq!(migrate(draft.clone(), &safe).await, draft);
}

#[tokio::test]
async fn l2_singleton_safes_pass_through() {
    let mut safe = l2_safe_info();
    safe.l1_singleton = false;
    let draft = unsigned_draft();
    assert_eq!(migrate(draft.clone(), &safe).await, draft);
}

#[tokio::test]
async fn used_safes_pass_through() {
    let mut safe = l2_safe_info();
    safe.nonce = 3;
    let draft = unsigned_draft();
    assert_eq!(migrate(draft.clone(), &safe).await, draft);
}

#[tokio::test]
async fn signed_drafts_pass_through() {
    let mut draft = unsigned_draft();
    draft.add_signature(owner_a(), signature_bytes(0xAA));
    assert_eq!(migrate(draft.clone(), &l2_safe_info()).await, draft);
}

#[tokio::test]
async fn old_and_unknown_versions_pass_through() {
    let draft = unsigned_draft();

    let mut safe = l2_safe_info();
    safe.version = Some("1.2.0".to_owned());
    assert_eq!(migrate(draft.clone(), &safe).await, draft);

    safe.version = None;
    assert_eq!(migrate(draft.clone(), &safe).await, draft);
}

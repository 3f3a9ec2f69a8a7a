#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, U256};

use safe_draft_core::{SafeInfo, SafeTransaction, TxParams};

pub fn safe_address() -> Address {
    address!("000000000000000000000000000000000000BEEF")
}

pub fn owner_a() -> Address {
    address!("1000000000000000000000000000000000000001")
}

pub fn owner_b() -> Address {
    address!("2000000000000000000000000000000000000002")
}

pub fn recipient() -> Address {
    address!("000000000000000000000000000000000000CAFE")
}

pub fn l2_safe_info() -> SafeInfo {
    SafeInfo {
        address: safe_address(),
        chain_id: 100,
        nonce: 0,
        threshold: 2,
        owners: vec![owner_a(), owner_b()],
        modules: Vec::new(),
        version: Some("1.3.0".to_owned()),
        l1_singleton: true,
    }
}

pub fn unsigned_draft() -> SafeTransaction {
    SafeTransaction::from_params(
        TxParams {
            to: recipient(),
            value: U256::from(1_000u64),
            ..TxParams::default()
        },
        0,
    )
}

pub fn signature_bytes(seed: u8) -> Bytes {
    let mut v = vec![seed; 65];
    v[64] = 27;
    Bytes::from(v)
}

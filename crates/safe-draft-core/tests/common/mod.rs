#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, Bytes, U256};
use tokio::sync::oneshot;

use safe_draft_core::errors::PortError;
use safe_draft_core::flows::FlowCall;
use safe_draft_core::ports::{
    CallCodecPort, MigrationPort, RecommendationPort, SignerSelectPort, TxServicePort,
};
use safe_draft_core::{DraftCoordinator, SafeInfo, SafeTransaction, TxParams};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

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

pub fn allowance_module() -> Address {
    address!("CFbFaC74C26F8647cBDb8c5caf80BB5b32E43134")
}

pub fn safe_info() -> SafeInfo {
    SafeInfo {
        address: safe_address(),
        chain_id: 1,
        nonce: 0,
        threshold: 2,
        owners: vec![owner_a(), owner_b()],
        modules: vec![allowance_module()],
        version: Some("1.4.1".to_owned()),
        l1_singleton: false,
    }
}

pub fn unsigned_draft(nonce: u64, safe_tx_gas: u64) -> SafeTransaction {
    let params = TxParams {
        to: recipient(),
        value: U256::from(1_000u64),
        safe_tx_gas: U256::from(safe_tx_gas),
        ..TxParams::default()
    };
    SafeTransaction::from_params(params, nonce)
}

pub fn signature_bytes(seed: u8) -> Bytes {
    let mut v = vec![seed; 65];
    v[64] = 27;
    Bytes::from(v)
}

/// Construction-service stub. Echoes the requested parameters back as a
/// fresh unsigned draft; individual calls can be gated to control resolution
/// order, or forced to fail.
#[derive(Debug, Default)]
pub struct StubTxService {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

impl StubTxService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a gate for the next construction call; the call blocks until the
    /// returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().expect("gates lock").push_back(rx);
        tx
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TxServicePort for StubTxService {
    async fn create_tx(
        &self,
        params: TxParams,
        nonce: Option<u64>,
    ) -> Result<SafeTransaction, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().expect("gates lock").pop_front();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(PortError::Validation(
                "forced construction failure".to_owned(),
            ));
        }
        Ok(SafeTransaction::from_params(params, nonce.unwrap_or(0)))
    }
}

#[derive(Debug, Default)]
pub struct StubRecommendations {
    nonce: Mutex<Option<u64>>,
    safe_tx_gas: Mutex<Option<U256>>,
}

impl StubRecommendations {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_nonce(&self, nonce: Option<u64>) {
        *self.nonce.lock().expect("nonce lock") = nonce;
    }

    pub fn set_safe_tx_gas(&self, gas: Option<U256>) {
        *self.safe_tx_gas.lock().expect("gas lock") = gas;
    }
}

impl RecommendationPort for StubRecommendations {
    async fn recommended_nonce(&self) -> Result<Option<u64>, PortError> {
        Ok(*self.nonce.lock().expect("nonce lock"))
    }

    async fn recommended_safe_tx_gas(
        &self,
        _draft: &SafeTransaction,
    ) -> Result<Option<U256>, PortError> {
        Ok(*self.safe_tx_gas.lock().expect("gas lock"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentityMigration;

impl MigrationPort for IdentityMigration {
    async fn migrate(
        &self,
        draft: SafeTransaction,
        _safe: &SafeInfo,
    ) -> Result<SafeTransaction, PortError> {
        Ok(draft)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FailingMigration;

impl MigrationPort for FailingMigration {
    async fn migrate(
        &self,
        _draft: SafeTransaction,
        _safe: &SafeInfo,
    ) -> Result<SafeTransaction, PortError> {
        Err(PortError::Transport("migration check unavailable".to_owned()))
    }
}

#[derive(Debug, Default)]
pub struct RecordingSigner {
    pub calls: AtomicUsize,
    last_safe: Mutex<Option<Address>>,
}

impl RecordingSigner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_safe(&self) -> Option<Address> {
        *self.last_safe.lock().expect("last_safe lock")
    }
}

impl SignerSelectPort for RecordingSigner {
    async fn select_signer(
        &self,
        _draft: Option<&SafeTransaction>,
        safe: &SafeInfo,
    ) -> Result<(), PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_safe.lock().expect("last_safe lock") = Some(safe.address);
        Ok(())
    }
}

/// Deterministic codec stub: a fake four-byte tag per call kind, so flow
/// tests can assert which call was encoded without real ABI work.
#[derive(Debug, Default)]
pub struct StubCodec {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl StubCodec {
    pub fn tag(call: &FlowCall) -> u8 {
        match call {
            FlowCall::Erc20Transfer { .. } => 0x01,
            FlowCall::DeleteAllowance { .. } => 0x02,
            FlowCall::AddOwnerWithThreshold { .. } => 0x03,
            FlowCall::RemoveOwner { .. } => 0x04,
            FlowCall::SwapOwner { .. } => 0x05,
            FlowCall::ChangeThreshold { .. } => 0x06,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CallCodecPort for StubCodec {
    fn encode_call(&self, call: &FlowCall) -> Result<Bytes, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(PortError::Validation("forced encoding failure".to_owned()));
        }
        Ok(Bytes::from(vec![Self::tag(call); 4]))
    }
}

/// Captures formatted log output so tests can assert on emitted events.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer lock")).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer lock")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub type TestCoordinator = DraftCoordinator<
    Arc<StubTxService>,
    Arc<StubRecommendations>,
    IdentityMigration,
    Arc<RecordingSigner>,
>;

pub struct TestHarness {
    pub tx_service: Arc<StubTxService>,
    pub recommendations: Arc<StubRecommendations>,
    pub signer: Arc<RecordingSigner>,
    pub coordinator: Arc<TestCoordinator>,
}

pub fn harness() -> TestHarness {
    harness_with_safe(safe_info())
}

pub fn harness_with_safe(safe: SafeInfo) -> TestHarness {
    init_tracing();
    let tx_service = StubTxService::new();
    let recommendations = StubRecommendations::new();
    let signer = RecordingSigner::new();
    let coordinator = Arc::new(DraftCoordinator::new(
        tx_service.clone(),
        recommendations.clone(),
        IdentityMigration,
        signer.clone(),
        safe,
    ));
    TestHarness {
        tx_service,
        recommendations,
        signer,
        coordinator,
    }
}

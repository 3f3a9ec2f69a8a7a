pub mod coordinator;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod gas;
pub mod ports;
pub mod reconcile;

pub use coordinator::{DraftCoordinator, DraftSnapshot};
pub use domain::{EstimateGasCall, OperationKind, SafeInfo, SafeTransaction, TxParams};
pub use errors::{log_error, DraftError, ErrorCode, PortError, LOG_TARGET};
pub use flows::{DraftRequest, FlowCall, SettingsChange};
pub use gas::{estimate_gas_limit, GasEstimateRequest};
pub use ports::{
    CallCodecPort, ChainReadPort, ExecEncoderPort, MigrationPort, RecommendationPort,
    SignerSelectPort, TxServicePort,
};

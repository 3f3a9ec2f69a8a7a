pub mod codec;
pub mod gateway;
pub mod migration;
pub mod rpc;
pub mod signer;
pub mod tx_builder;

pub use codec::CallCodec;
pub use gateway::GatewayClient;
pub use migration::SafeToL2Migration;
pub use rpc::JsonRpcClient;
pub use signer::WalletSignerSelector;
pub use tx_builder::TxBuilder;

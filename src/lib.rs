pub mod blockchain;
pub mod config;
pub mod server;
pub mod toolkit;

pub use blockchain::{ApiKey, BlockchainError, RpcOutcome, StabilityClient};
pub use config::Config;
pub use server::StabilityMcpServer;
pub use toolkit::{Operation, StabilityToolkit, ToolDescriptor};

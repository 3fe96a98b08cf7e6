mod client;
mod error;
pub mod payload;
mod types;

pub use client::StabilityClient;
pub use error::{BlockchainError, Result};
pub use types::*;

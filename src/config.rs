use crate::blockchain::{ApiKey, BlockchainError, Result};
use std::env;

pub const DEFAULT_RPC_URL: &str = "https://rpc.stabilityprotocol.com";

pub const API_KEY_VAR: &str = "STABILITY_API_KEY";
pub const RPC_URL_VAR: &str = "STABILITY_RPC_URL";
pub const WRITE_WAIT_VAR: &str = "STABILITY_WRITE_WAIT";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub rpc_url: String,
    /// `wait` sent with contract writes that leave it unset.
    pub write_wait: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            write_wait: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = match get(API_KEY_VAR) {
            Some(key) => ApiKey::new(key.trim())?,
            None => ApiKey::default(),
        };

        let rpc_url = get(RPC_URL_VAR).unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let write_wait = match get(WRITE_WAIT_VAR) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                BlockchainError::Config(format!("{WRITE_WAIT_VAR} must be a boolean, got {raw:?}"))
            })?,
            None => true,
        };

        Ok(Self {
            api_key,
            rpc_url,
            write_wait,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

use super::error::{BlockchainError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Public key accepted by the RPC gateway with a reduced quota.
pub const DEFAULT_API_KEY: &str = "try-it-out";

/// Transaction id sent when the caller does not pick one.
pub const DEFAULT_TX_ID: u64 = 1;

/// Keys shorter than this are only redacted where they appear as the
/// `/zkt/<key>` path segment; elsewhere a match is most likely coincidence.
const MIN_BARE_REDACT_LEN: usize = 8;

/// Caller key interpolated into the `/zkt/<key>` endpoint path.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(BlockchainError::ValidationFailed(
                "api key must not be empty".into(),
            ));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_public(&self) -> bool {
        self.0 == DEFAULT_API_KEY
    }

    /// Masked form safe for logs and error strings.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() > 12 {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        } else {
            "***".to_string()
        }
    }

    /// Masks the key in `text`: always in `/zkt/<key>` path segments, and
    /// anywhere else once the key is long enough to be unambiguous.
    pub fn redact(&self, text: &str) -> String {
        let masked = self.masked();
        let text = text.replace(&format!("/zkt/{}", self.0), &format!("/zkt/{masked}"));
        if self.0.chars().count() >= MIN_BARE_REDACT_LEN {
            text.replace(&self.0, &masked)
        } else {
            text
        }
    }
}

impl Default for ApiKey {
    fn default() -> Self {
        Self(DEFAULT_API_KEY.to_string())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

/// Input of the read-only contract call.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractCall {
    pub to: String,
    pub abi: Vec<String>,
    pub method: String,
    pub arguments: Vec<Value>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Input of the state-changing contract call.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractWriteRequest {
    pub to: String,
    pub abi: Vec<String>,
    pub method: String,
    pub arguments: Vec<Value>,
    #[serde(default)]
    pub wait: Option<bool>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployRequest {
    pub code: String,
    #[serde(default)]
    pub arguments: Option<Vec<Value>>,
    #[serde(default)]
    pub wait: Option<bool>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// What one gateway call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcOutcome {
    /// Raw response body, whatever its status or content.
    Response(String),
    /// No body was obtained. The message has the key redacted.
    Failed(String),
}

impl RpcOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, RpcOutcome::Failed(_))
    }

    /// Flattens to the fail-soft text form: the body, or `Error: <message>`.
    pub fn into_text(self) -> String {
        match self {
            RpcOutcome::Response(body) => body,
            RpcOutcome::Failed(message) => format!("Error: {message}"),
        }
    }
}

/// JSON body posted to the gateway. Serializes to a bare object per variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RpcPayload {
    Post {
        arguments: String,
    },
    ContractRead {
        to: String,
        abi: Vec<String>,
        method: String,
        arguments: Vec<Value>,
        id: u64,
    },
    ContractWrite {
        to: String,
        abi: Vec<String>,
        method: String,
        arguments: Vec<Value>,
        id: u64,
        wait: bool,
    },
    Deploy {
        code: String,
        arguments: Vec<Value>,
        wait: bool,
        id: u64,
    },
}

impl RpcPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            RpcPayload::Post { .. } => "post",
            RpcPayload::ContractRead { .. } => "contract_read",
            RpcPayload::ContractWrite { .. } => "contract_write",
            RpcPayload::Deploy { .. } => "deploy",
        }
    }
}

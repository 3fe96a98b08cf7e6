use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct PostMessageParams {
    /// The message to post to the blockchain
    #[validate(length(min = 1))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct ReadContractParams {
    /// The contract address to read from
    #[validate(length(min = 1))]
    pub contract_address: String,
    /// The method name to call
    #[validate(length(min = 1))]
    pub method_name: String,
    /// Contract ABI as a JSON array of function signatures, or a single signature
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub abi: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct WriteContractParams {
    /// The contract address to write to
    #[validate(length(min = 1))]
    pub contract_address: String,
    /// The method name to call
    #[validate(length(min = 1))]
    pub method_name: String,
    /// Arguments for the method call, as a JSON array or a single value
    #[validate(length(min = 1))]
    pub method_args: String,
    /// Contract ABI as a JSON array of function signatures, or a single signature
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub abi: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct DeployContractParams {
    /// The Solidity contract code to deploy
    #[validate(length(min = 1))]
    pub solidity_code: String,
    /// Constructor arguments, as a JSON array or a single value
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub constructor_args: String,
}

/// Raw gateway message: `arguments` is posted as-is.
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct RawWriteParams {
    /// Message to post to blockchain
    #[validate(length(min = 1))]
    pub arguments: String,
}

/// Raw contract call. Shared by `stbl_read` and `stbl_write_contract`.
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct RawCallParams {
    /// Contract address to call
    #[validate(length(min = 1))]
    pub to: String,
    /// Function name to call
    #[validate(length(min = 1))]
    pub method: String,
    /// Function arguments
    #[serde(default)]
    pub arguments: Vec<Value>,
    /// Contract ABI (Application Binary Interface)
    #[serde(default)]
    pub abi: Vec<String>,
    /// Request ID for tracking
    #[serde(default)]
    #[schemars(with = "u64")]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct RawWriteContractParams {
    #[serde(flatten)]
    #[validate(nested)]
    pub call: RawCallParams,
    /// Wait for transaction confirmation
    #[serde(default)]
    #[schemars(with = "bool")]
    pub wait: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct RawDeployParams {
    /// Solidity contract source code
    #[validate(length(min = 1))]
    pub code: String,
    /// Constructor arguments
    #[serde(default)]
    pub arguments: Vec<Value>,
    /// Wait for deployment confirmation
    #[serde(default)]
    #[schemars(with = "bool")]
    pub wait: Option<bool>,
    /// Request ID for tracking
    #[serde(default)]
    #[schemars(with = "u64")]
    pub id: Option<u64>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `["function a()", ...]` or a bare signature. Blank means no ABI.
pub fn parse_abi(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(signature) => signature,
                other => other.to_string(),
            })
            .collect(),
        _ => vec![raw.to_string()],
    }
}

/// A JSON array is taken as the argument list; any other JSON value or bare
/// text becomes a single argument. Blank means no arguments.
pub fn parse_args(raw: &str) -> Vec<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(value) => vec![value],
        Err(_) => vec![Value::String(raw.to_string())],
    }
}

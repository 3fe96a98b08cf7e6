//! Builds the JSON bodies for the four gateway operations.
//!
//! Nothing here validates addresses, ABI signatures or argument types; the
//! gateway decides whether a request is well formed.

use super::types::{
    ContractCall, ContractWriteRequest, DeployRequest, RpcPayload, DEFAULT_TX_ID,
};

pub fn post(arguments: impl Into<String>) -> RpcPayload {
    RpcPayload::Post {
        arguments: arguments.into(),
    }
}

pub fn contract_read(call: &ContractCall) -> RpcPayload {
    RpcPayload::ContractRead {
        to: call.to.clone(),
        abi: call.abi.clone(),
        method: call.method.clone(),
        arguments: call.arguments.clone(),
        id: call.id.unwrap_or(DEFAULT_TX_ID),
    }
}

/// `default_wait` applies when the request leaves `wait` unset.
pub fn contract_write(req: &ContractWriteRequest, default_wait: bool) -> RpcPayload {
    RpcPayload::ContractWrite {
        to: req.to.clone(),
        abi: req.abi.clone(),
        method: req.method.clone(),
        arguments: req.arguments.clone(),
        id: req.id.unwrap_or(DEFAULT_TX_ID),
        wait: req.wait.unwrap_or(default_wait),
    }
}

pub fn deploy(req: &DeployRequest) -> RpcPayload {
    RpcPayload::Deploy {
        code: req.code.clone(),
        arguments: req.arguments.clone().unwrap_or_default(),
        wait: req.wait.unwrap_or(false),
        id: req.id.unwrap_or(DEFAULT_TX_ID),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json(payload: &RpcPayload) -> serde_json::Value {
        serde_json::to_value(payload).unwrap()
    }

    #[test]
    fn post_payload_carries_only_arguments() {
        assert_eq!(
            to_json(&post("Test message")),
            json!({ "arguments": "Test message" })
        );
    }

    #[test]
    fn contract_read_defaults_id() {
        let call: ContractCall = serde_json::from_value(json!({
            "to": "0x1234567890abcdef",
            "abi": ["function getMessage() public view returns (string)"],
            "method": "getMessage",
            "arguments": []
        }))
        .unwrap();

        assert_eq!(
            to_json(&contract_read(&call)),
            json!({
                "to": "0x1234567890abcdef",
                "abi": ["function getMessage() public view returns (string)"],
                "method": "getMessage",
                "arguments": [],
                "id": 1
            })
        );
    }

    #[test]
    fn contract_write_uses_configured_wait_default() {
        let req: ContractWriteRequest = serde_json::from_value(json!({
            "to": "0x1234567890abcdef",
            "abi": ["function setMessage(string memory _msg) public"],
            "method": "setMessage",
            "arguments": ["Hello Blockchain!"]
        }))
        .unwrap();

        assert_eq!(
            to_json(&contract_write(&req, true)),
            json!({
                "to": "0x1234567890abcdef",
                "abi": ["function setMessage(string memory _msg) public"],
                "method": "setMessage",
                "arguments": ["Hello Blockchain!"],
                "id": 1,
                "wait": true
            })
        );
        assert_eq!(to_json(&contract_write(&req, false))["wait"], json!(false));
    }

    #[test]
    fn contract_write_explicit_fields_win() {
        let req: ContractWriteRequest = serde_json::from_value(json!({
            "to": "0x1",
            "abi": [],
            "method": "set",
            "arguments": [42],
            "wait": false,
            "id": 7
        }))
        .unwrap();

        let payload = to_json(&contract_write(&req, true));
        assert_eq!(payload["wait"], json!(false));
        assert_eq!(payload["id"], json!(7));
    }

    #[test]
    fn deploy_defaults_arguments_wait_and_id() {
        let req: DeployRequest =
            serde_json::from_value(json!({ "code": "contract Test {}", "arguments": null }))
                .unwrap();

        assert_eq!(
            to_json(&deploy(&req)),
            json!({ "code": "contract Test {}", "arguments": [], "wait": false, "id": 1 })
        );
    }

    #[test]
    fn api_key_never_reaches_the_payload() {
        let req: DeployRequest = serde_json::from_value(json!({
            "code": "contract Test {}",
            "arguments": ["Hello", 42],
            "api_key": "secret"
        }))
        .unwrap();

        let payload = to_json(&deploy(&req));
        assert!(payload.get("api_key").is_none());
        assert_eq!(payload["arguments"], json!(["Hello", 42]));
    }
}

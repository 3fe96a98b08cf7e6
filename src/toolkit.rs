//! Named, described tools over the gateway operations.
//!
//! Each tool takes a single string: plain text for the message tool, a JSON
//! object for the contract tools. Results are always text.

use crate::blockchain::{
    BlockchainError, ContractCall, ContractWriteRequest, DeployRequest, Result, RpcOutcome,
    StabilityClient,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PostMessage,
    ContractRead,
    ContractWrite,
    DeployContract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub operation: Operation,
}

static TOOLS: [ToolDescriptor; 4] = [
    ToolDescriptor {
        name: "StabilityWriteTool",
        description: "Send a plain text message to the Stability blockchain using ZKT v1.",
        operation: Operation::PostMessage,
    },
    ToolDescriptor {
        name: "StabilityReadTool",
        description: "Read data from a Stability smart contract using ZKT v2 read request. \
                      JSON input must include: to, abi, method, arguments.",
        operation: Operation::ContractRead,
    },
    ToolDescriptor {
        name: "StabilityWriteContractTool",
        description: "Write data to a Stability smart contract using ZKT v2 write request. \
                      JSON input must include: to, abi, method, arguments, id, wait.",
        operation: Operation::ContractWrite,
    },
    ToolDescriptor {
        name: "StabilityDeployTool",
        description: "Deploy a Solidity smart contract to the Stability blockchain. \
                      JSON input must include: code, arguments.",
        operation: Operation::DeployContract,
    },
];

/// A parsed tool input, ready to be sent.
#[derive(Debug, Clone)]
pub enum ToolRequest {
    PostMessage(String),
    ContractRead(ContractCall),
    ContractWrite(ContractWriteRequest),
    DeployContract(DeployRequest),
}

impl ToolRequest {
    pub fn parse(operation: Operation, input: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| BlockchainError::InvalidInput(e.to_string());
        Ok(match operation {
            Operation::PostMessage => ToolRequest::PostMessage(input.to_string()),
            Operation::ContractRead => {
                ToolRequest::ContractRead(serde_json::from_str(input).map_err(invalid)?)
            }
            Operation::ContractWrite => {
                ToolRequest::ContractWrite(serde_json::from_str(input).map_err(invalid)?)
            }
            Operation::DeployContract => {
                ToolRequest::DeployContract(serde_json::from_str(input).map_err(invalid)?)
            }
        })
    }

    pub fn operation(&self) -> Operation {
        match self {
            ToolRequest::PostMessage(_) => Operation::PostMessage,
            ToolRequest::ContractRead(_) => Operation::ContractRead,
            ToolRequest::ContractWrite(_) => Operation::ContractWrite,
            ToolRequest::DeployContract(_) => Operation::DeployContract,
        }
    }
}

#[derive(Clone)]
pub struct StabilityToolkit {
    client: StabilityClient,
}

impl StabilityToolkit {
    pub fn new(client: StabilityClient) -> Self {
        Self { client }
    }

    /// Always the same four tools, in the same order.
    pub fn get_tools(&self) -> &'static [ToolDescriptor] {
        &TOOLS
    }

    pub fn find(&self, name: &str) -> Option<&'static ToolDescriptor> {
        TOOLS.iter().find(|tool| tool.name == name)
    }

    pub fn tool(&self, operation: Operation) -> &'static ToolDescriptor {
        match operation {
            Operation::PostMessage => &TOOLS[0],
            Operation::ContractRead => &TOOLS[1],
            Operation::ContractWrite => &TOOLS[2],
            Operation::DeployContract => &TOOLS[3],
        }
    }

    pub async fn invoke(&self, name: &str, input: &str) -> String {
        match self.find(name) {
            Some(tool) => self.run(tool.operation, input).await,
            None => format!("Error: unknown tool {name:?}"),
        }
    }

    pub async fn run(&self, operation: Operation, input: &str) -> String {
        match ToolRequest::parse(operation, input) {
            Ok(request) => self.execute(request).await.into_text(),
            Err(error) => {
                debug!(tool = self.tool(operation).name, %error, "rejected tool input");
                format!("Error: {error}")
            }
        }
    }

    /// Sends a parsed request, keeping transport failures apart from bodies.
    pub async fn execute(&self, request: ToolRequest) -> RpcOutcome {
        info!(tool = self.tool(request.operation()).name, "invoking tool");
        match &request {
            ToolRequest::PostMessage(message) => self.client.post_zkt_v1(message).await,
            ToolRequest::ContractRead(call) => self.client.call_contract_read(call).await,
            ToolRequest::ContractWrite(req) => self.client.call_contract_write(req).await,
            ToolRequest::DeployContract(req) => self.client.deploy_contract(req).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::ApiKey;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn toolkit(uri: &str) -> StabilityToolkit {
        let client = StabilityClient::new(uri.to_string(), ApiKey::default(), true).unwrap();
        StabilityToolkit::new(client)
    }

    #[test]
    fn tools_come_in_fixed_order() {
        let names: Vec<_> = toolkit("http://localhost")
            .get_tools()
            .iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(
            names,
            [
                "StabilityWriteTool",
                "StabilityReadTool",
                "StabilityWriteContractTool",
                "StabilityDeployTool"
            ]
        );
    }

    #[test]
    fn descriptions_mention_stability() {
        for tool in toolkit("http://localhost").get_tools() {
            assert!(tool.description.len() > 10);
            assert!(tool.description.contains("Stability"));
        }
    }

    #[test]
    fn lookup_by_operation_matches_lookup_by_name() {
        let toolkit = toolkit("http://localhost");
        for tool in toolkit.get_tools() {
            assert_eq!(toolkit.tool(tool.operation), tool);
            assert_eq!(toolkit.find(tool.name), Some(tool));
        }
        assert!(toolkit.find("stabilitywritetool").is_none());
    }

    #[tokio::test]
    async fn write_tool_sends_plain_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zkt/try-it-out"))
            .and(body_json(json!({ "arguments": "Test message" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("sent"))
            .expect(1)
            .mount(&server)
            .await;

        let result = toolkit(&server.uri())
            .invoke("StabilityWriteTool", "Test message")
            .await;
        assert_eq!(result, "sent");
    }

    #[tokio::test]
    async fn deploy_tool_parses_json_input() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_json(json!({
                "code": "contract Test {}",
                "arguments": ["hello"],
                "wait": false,
                "id": 1
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"success": true, "contractAddress": "0xabcdef"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let input = json!({ "code": "contract Test {}", "arguments": ["hello"] }).to_string();
        let result = toolkit(&server.uri())
            .invoke("StabilityDeployTool", &input)
            .await;
        assert!(result.contains("0xabcdef"));
    }

    #[tokio::test]
    async fn malformed_json_is_reported_without_sending() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = toolkit(&server.uri())
            .invoke("StabilityReadTool", "not json")
            .await;
        assert!(result.starts_with("Error: invalid tool input"));
    }

    #[tokio::test]
    async fn execute_keeps_transport_failures_distinct() {
        let outcome = toolkit("http://127.0.0.1:1")
            .execute(ToolRequest::PostMessage("hello".into()))
            .await;
        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let result = toolkit("http://localhost").invoke("Nope", "x").await;
        assert_eq!(result, "Error: unknown tool \"Nope\"");
    }
}

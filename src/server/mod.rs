mod params;

pub use params::{
    parse_abi, parse_args, DeployContractParams, PostMessageParams, RawCallParams,
    RawDeployParams, RawWriteContractParams, RawWriteParams, ReadContractParams,
    WriteContractParams,
};

use crate::blockchain::{ContractCall, ContractWriteRequest, DeployRequest, RpcOutcome};
use crate::toolkit::{Operation, StabilityToolkit, ToolRequest};
use rmcp::{
    model::*, service::RequestContext, ErrorData as McpError, RoleServer, ServerHandler,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, error, info, warn};
use validator::Validate;

/// Tools advertised over MCP. Each maps to exactly one toolkit operation.
///
/// The `stbl_*` tools take the gateway's own field names and report the raw
/// gateway body; the others take string arguments and report with ✅/❌.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McpTool {
    PostMessage,
    ReadContract,
    WriteContract,
    DeployContract,
    StblWrite,
    StblRead,
    StblWriteContract,
    StblDeploy,
}

/// Status lines wrapped around a gateway body.
#[derive(Debug, Clone, Copy)]
struct Labels {
    success: &'static str,
    failure: &'static str,
}

/// Why MCP arguments were rejected before anything was sent.
#[derive(Debug)]
enum ArgumentError {
    Missing,
    Invalid(String),
}

impl McpTool {
    pub const ALL: [McpTool; 8] = [
        McpTool::PostMessage,
        McpTool::ReadContract,
        McpTool::WriteContract,
        McpTool::DeployContract,
        McpTool::StblWrite,
        McpTool::StblRead,
        McpTool::StblWriteContract,
        McpTool::StblDeploy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            McpTool::PostMessage => "post_message",
            McpTool::ReadContract => "read_contract",
            McpTool::WriteContract => "write_contract",
            McpTool::DeployContract => "deploy_contract",
            McpTool::StblWrite => "stbl_write",
            McpTool::StblRead => "stbl_read",
            McpTool::StblWriteContract => "stbl_write_contract",
            McpTool::StblDeploy => "stbl_deploy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            McpTool::PostMessage => "Post a message to the Stability blockchain",
            McpTool::ReadContract => "Read data from a smart contract on Stability blockchain",
            McpTool::WriteContract => "Write data to a smart contract on Stability blockchain",
            McpTool::DeployContract => "Deploy a new smart contract to Stability blockchain",
            McpTool::StblWrite => "Post ZKTv1 message to Stability blockchain with zero gas fees",
            McpTool::StblRead => "Execute read-only contract calls on Stability blockchain",
            McpTool::StblWriteContract => {
                "Execute state-changing smart contract calls on Stability blockchain"
            }
            McpTool::StblDeploy => "Deploy a Solidity smart contract to Stability blockchain",
        }
    }

    pub fn operation(self) -> Operation {
        match self {
            McpTool::PostMessage | McpTool::StblWrite => Operation::PostMessage,
            McpTool::ReadContract | McpTool::StblRead => Operation::ContractRead,
            McpTool::WriteContract | McpTool::StblWriteContract => Operation::ContractWrite,
            McpTool::DeployContract | McpTool::StblDeploy => Operation::DeployContract,
        }
    }

    /// Fields that must be present and non-null. Mirrors the schema's `required`.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            McpTool::PostMessage => &["message"],
            McpTool::ReadContract => &["contract_address", "method_name"],
            McpTool::WriteContract => &["contract_address", "method_name", "method_args"],
            McpTool::DeployContract => &["solidity_code"],
            McpTool::StblWrite => &["arguments"],
            McpTool::StblRead | McpTool::StblWriteContract => &["to", "method"],
            McpTool::StblDeploy => &["code"],
        }
    }

    pub fn definition(self) -> Tool {
        let schema = match self {
            McpTool::PostMessage => schema_for::<PostMessageParams>(),
            McpTool::ReadContract => schema_for::<ReadContractParams>(),
            McpTool::WriteContract => schema_for::<WriteContractParams>(),
            McpTool::DeployContract => schema_for::<DeployContractParams>(),
            McpTool::StblWrite => schema_for::<RawWriteParams>(),
            McpTool::StblRead => schema_for::<RawCallParams>(),
            McpTool::StblWriteContract => schema_for::<RawWriteContractParams>(),
            McpTool::StblDeploy => schema_for::<RawDeployParams>(),
        };
        Tool::new(self.name(), self.description(), schema)
    }

    fn missing_arguments(self) -> &'static str {
        match self {
            McpTool::PostMessage => "'message' is required",
            McpTool::ReadContract => "'contract_address' and 'method_name' are required",
            McpTool::WriteContract => {
                "'contract_address', 'method_name', and 'method_args' are required"
            }
            McpTool::DeployContract => "'solidity_code' is required",
            McpTool::StblWrite => "'arguments' is required",
            McpTool::StblRead | McpTool::StblWriteContract => "'to' and 'method' are required",
            McpTool::StblDeploy => "'code' is required",
        }
    }

    /// `None` for the `stbl_*` tools, which report the bare body.
    fn labels(self) -> Option<Labels> {
        let (success, failure) = match self {
            McpTool::PostMessage => ("Message posted successfully!", "Failed to post message"),
            McpTool::ReadContract => ("Contract read successful!", "Failed to read contract"),
            McpTool::WriteContract => {
                ("Contract write successful!", "Failed to write to contract")
            }
            McpTool::DeployContract => {
                ("Contract deployed successfully!", "Failed to deploy contract")
            }
            McpTool::StblWrite
            | McpTool::StblRead
            | McpTool::StblWriteContract
            | McpTool::StblDeploy => return None,
        };
        Some(Labels { success, failure })
    }

    /// Turns MCP arguments into a toolkit request.
    fn request(self, args: JsonObject) -> Result<ToolRequest, ArgumentError> {
        let missing = self
            .required_fields()
            .iter()
            .any(|field| args.get(*field).map_or(true, Value::is_null));
        if missing {
            return Err(ArgumentError::Missing);
        }

        let args = Value::Object(args);
        Ok(match self {
            McpTool::PostMessage => {
                let p: PostMessageParams = parse_params(args)?;
                ToolRequest::PostMessage(p.message)
            }
            McpTool::ReadContract => {
                let p: ReadContractParams = parse_params(args)?;
                ToolRequest::ContractRead(ContractCall {
                    to: p.contract_address,
                    abi: parse_abi(&p.abi),
                    method: p.method_name,
                    arguments: Vec::new(),
                    id: None,
                    api_key: None,
                })
            }
            McpTool::WriteContract => {
                let p: WriteContractParams = parse_params(args)?;
                ToolRequest::ContractWrite(ContractWriteRequest {
                    to: p.contract_address,
                    abi: parse_abi(&p.abi),
                    method: p.method_name,
                    arguments: parse_args(&p.method_args),
                    wait: None,
                    id: None,
                    api_key: None,
                })
            }
            McpTool::DeployContract => {
                let p: DeployContractParams = parse_params(args)?;
                ToolRequest::DeployContract(DeployRequest {
                    code: p.solidity_code,
                    arguments: Some(parse_args(&p.constructor_args)),
                    wait: None,
                    id: None,
                    api_key: None,
                })
            }
            McpTool::StblWrite => {
                let p: RawWriteParams = parse_params(args)?;
                ToolRequest::PostMessage(p.arguments)
            }
            McpTool::StblRead => {
                let p: RawCallParams = parse_params(args)?;
                ToolRequest::ContractRead(ContractCall {
                    to: p.to,
                    abi: p.abi,
                    method: p.method,
                    arguments: p.arguments,
                    id: p.id,
                    api_key: None,
                })
            }
            McpTool::StblWriteContract => {
                let RawWriteContractParams { call, wait } = parse_params(args)?;
                ToolRequest::ContractWrite(ContractWriteRequest {
                    to: call.to,
                    abi: call.abi,
                    method: call.method,
                    arguments: call.arguments,
                    wait,
                    id: call.id,
                    api_key: None,
                })
            }
            McpTool::StblDeploy => {
                let p: RawDeployParams = parse_params(args)?;
                ToolRequest::DeployContract(DeployRequest {
                    code: p.code,
                    arguments: Some(p.arguments),
                    wait: p.wait,
                    id: p.id,
                    api_key: None,
                })
            }
        })
    }
}

/// Type mismatches are `Invalid`; empty required strings count as missing.
fn parse_params<T: DeserializeOwned + Validate>(args: Value) -> Result<T, ArgumentError> {
    let params: T =
        serde_json::from_value(args).map_err(|e| ArgumentError::Invalid(e.to_string()))?;
    params.validate().map_err(|_| ArgumentError::Missing)?;
    Ok(params)
}

fn schema_for<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => Arc::new(map),
        Ok(other) => {
            error!(schema = %other, "tool input schema is not an object; advertising an empty schema");
            Arc::new(JsonObject::new())
        }
        Err(e) => {
            error!(error = %e, "failed to serialize tool input schema; advertising an empty schema");
            Arc::new(JsonObject::new())
        }
    }
}

#[derive(Clone)]
pub struct StabilityMcpServer {
    toolkit: Arc<StabilityToolkit>,
    routes: Arc<HashMap<&'static str, McpTool>>,
    tools: Arc<Vec<Tool>>,
}

impl StabilityMcpServer {
    pub fn new(toolkit: StabilityToolkit) -> Self {
        let routes = McpTool::ALL.iter().map(|t| (t.name(), *t)).collect();
        let tools = McpTool::ALL.iter().map(|t| t.definition()).collect();
        Self {
            toolkit: Arc::new(toolkit),
            routes: Arc::new(routes),
            tools: Arc::new(tools),
        }
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.tools.as_ref().clone()
    }

    /// Exact-name lookup.
    pub fn resolve(&self, name: &str) -> Option<McpTool> {
        self.routes.get(name).copied()
    }

    /// Runs one tool call to completion. Every outcome, including bad input
    /// and transport failure, is reported as tool content rather than a
    /// protocol error.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        info!(tool = name, "tool called");

        let Some(tool) = self.resolve(name) else {
            warn!(tool = name, "unknown tool");
            return error_content(format!("❌ Unknown tool: {name}"));
        };

        let request = match tool.request(arguments.unwrap_or_default()) {
            Ok(request) => request,
            Err(ArgumentError::Missing) => {
                debug!(tool = name, "missing required arguments");
                return error_content(format!("❌ Error: {}", tool.missing_arguments()));
            }
            Err(ArgumentError::Invalid(detail)) => {
                debug!(tool = name, %detail, "rejected tool arguments");
                return error_content(format!("❌ Error: invalid arguments for {name}: {detail}"));
            }
        };

        let registry_tool = self.toolkit.tool(tool.operation()).name;
        match (self.toolkit.execute(request).await, tool.labels()) {
            (RpcOutcome::Response(body), Some(labels)) => CallToolResult::success(vec![
                Content::text(format!("✅ {}\n\n{body}", labels.success)),
            ]),
            (RpcOutcome::Response(body), None) => {
                CallToolResult::success(vec![Content::text(body)])
            }
            (RpcOutcome::Failed(reason), labels) => {
                error!(tool = name, registry_tool, error = %reason, "tool invocation failed");
                error_content(match labels {
                    Some(labels) => format!("❌ {}: {reason}", labels.failure),
                    None => format!("Error: {reason}"),
                })
            }
        }
    }
}

fn error_content(text: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text)])
}

impl ServerHandler for StabilityMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Stability blockchain tools. Use post_message to write a plain text message, \
                read_contract and write_contract to call deployed contracts, and \
                deploy_contract to publish Solidity code. The stbl_* tools take the \
                gateway's own fields and return its raw response. No gas is required."
                    .into(),
            ),
            protocol_version: Default::default(),
            server_info: Implementation {
                name: "stability-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(&request.name, request.arguments).await)
    }
}

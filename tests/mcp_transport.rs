//! Drives the server through a real rmcp client over an in-memory duplex pipe.

use rmcp::model::CallToolRequestParam;
use rmcp::ServiceExt;
use serde_json::json;
use stability_mcp::{ApiKey, StabilityClient, StabilityMcpServer, StabilityToolkit};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mcp_server(uri: &str) -> StabilityMcpServer {
    let client =
        StabilityClient::new(uri.to_string(), ApiKey::new("test-api-key").unwrap(), true).unwrap();
    StabilityMcpServer::new(StabilityToolkit::new(client))
}

#[tokio::test]
async fn client_lists_and_calls_tools_over_transport() -> anyhow::Result<()> {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zkt/test-api-key"))
        .and(body_json(json!({ "arguments": "over the wire" })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"hash": "0xfeed"}"#))
        .expect(1)
        .mount(&gateway)
        .await;

    let (server_transport, client_transport) = tokio::io::duplex(4096);
    let server = mcp_server(&gateway.uri());
    let server_handle = tokio::spawn(async move {
        let running = server.serve(server_transport).await?;
        running.waiting().await?;
        anyhow::Ok(())
    });

    let client = ().serve(client_transport).await?;

    let info = client.peer_info().expect("server info after handshake");
    assert_eq!(info.server_info.name, "stability-mcp");
    assert!(info.capabilities.tools.is_some());

    let tools = client.list_all_tools().await?;
    let names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
    assert_eq!(names.len(), 8);
    assert_eq!(names[0], "post_message");
    assert!(names.contains(&"stbl_deploy".to_string()));

    let arguments = json!({ "message": "over the wire" }).as_object().cloned();
    let result = client
        .call_tool(CallToolRequestParam {
            name: "post_message".into(),
            arguments,
        })
        .await?;
    assert_ne!(result.is_error, Some(true));
    let body = serde_json::to_value(&result)?;
    let text = body["content"][0]["text"].as_str().unwrap_or_default();
    assert!(text.starts_with("✅ Message posted successfully!"), "{text}");
    assert!(text.contains("0xfeed"));

    let result = client
        .call_tool(CallToolRequestParam {
            name: "transfer".into(),
            arguments: None,
        })
        .await?;
    assert_eq!(result.is_error, Some(true));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

/// Base connector trait for browser tool server connections
use crate::error::{Error, Result};
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, Tool, ToolResult};
use serde_json::Value;

/// Trait for tool server transports
///
/// Connectors handle the low-level communication with the browser tool
/// server. The high-level methods (initialize, list_tools, call_tool) have
/// default implementations on top of send_request.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    /// Send a raw JSON-RPC request and receive a response
    async fn send_request(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse>;

    /// Establish the connection to the tool server
    async fn connect(&mut self) -> Result<()>;

    /// Close the connection to the tool server
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if the connector is currently connected
    fn is_connected(&self) -> bool;

    /// Initialize the tool server session, returns server capabilities
    async fn initialize(&self) -> Result<Value> {
        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "webagent",
                "version": env!("CARGO_PKG_VERSION"),
            }
        });
        let request = JsonRpcRequest::new("initialize", Some(params));
        let response = self.send_request(request).await?;

        if let Some(result) = response.result {
            Ok(result)
        } else if let Some(error) = response.error {
            Err(Error::ConnectionError(error.message))
        } else {
            Err(Error::InternalError("No result or error in response".to_string()))
        }
    }

    /// List the browser tools the server advertises
    async fn list_tools(&self) -> Result<Vec<Tool>> {
        let request = JsonRpcRequest::new("tools/list", None);
        let response = self.send_request(request).await?;

        if let Some(result) = response.result {
            let tools = result
                .get("tools")
                .and_then(|v| serde_json::from_value::<Vec<Tool>>(v.clone()).ok())
                .ok_or_else(|| Error::InvalidRequest("Invalid tools response".to_string()))?;
            Ok(tools)
        } else if let Some(error) = response.error {
            Err(Error::ConnectionError(error.message))
        } else {
            Err(Error::InternalError("No result in response".to_string()))
        }
    }

    /// Invoke a browser tool
    async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<ToolResult> {
        let params = serde_json::json!({
            "name": tool_name,
            "arguments": arguments,
        });
        let request = JsonRpcRequest::new("tools/call", Some(params));
        let response = self.send_request(request).await?;

        if let Some(result) = response.result {
            serde_json::from_value::<ToolResult>(result)
                .map_err(|e| Error::InvalidRequest(format!("Invalid tool result: {}", e)))
        } else if let Some(error) = response.error {
            Err(Error::ConnectionError(error.message))
        } else {
            Err(Error::InternalError("No result in response".to_string()))
        }
    }
}

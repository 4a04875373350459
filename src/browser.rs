/// Client for the browser tool server.
///
/// Owns one connector, performs the initialize handshake, and caches the
/// advertised tools so the agent loop does not re-fetch them every step.

use crate::connectors::base::Connector;
use crate::error::{Error, Result};
use crate::protocol::{Tool, ToolResult};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct BrowserClient {
    connector: Arc<Mutex<Box<dyn Connector>>>,
    tools: Arc<DashMap<String, Tool>>,
    initialized: Arc<Mutex<bool>>,
}

impl BrowserClient {
    /// Create a client over a transport
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            connector: Arc::new(Mutex::new(connector)),
            tools: Arc::new(DashMap::new()),
            initialized: Arc::new(Mutex::new(false)),
        }
    }

    /// Connect to the tool server and perform the initialize handshake.
    ///
    /// The tool cache is warmed here; a failure to list tools is not fatal
    /// at this point and will surface on first use instead.
    pub async fn initialize(&self) -> Result<Value> {
        let mut connector = self.connector.lock().await;
        connector.connect().await?;
        let capabilities = connector.initialize().await?;
        *self.initialized.lock().await = true;

        if let Ok(tools) = connector.list_tools().await {
            self.cache_tools(tools);
        }

        tracing::debug!("browser tool server initialized");
        Ok(capabilities)
    }

    pub async fn is_initialized(&self) -> bool {
        *self.initialized.lock().await
    }

    /// Browser tools the server advertises, refreshing the cache if empty
    pub async fn list_tools(&self) -> Result<Vec<Tool>> {
        if self.tools.is_empty() {
            self.refresh_tools().await?;
        }
        Ok(self.tools.iter().map(|entry| entry.value().clone()).collect())
    }

    /// Re-fetch the tool list from the server
    pub async fn refresh_tools(&self) -> Result<()> {
        let connector = self.connector.lock().await;
        let tools = connector.list_tools().await?;
        drop(connector);
        self.cache_tools(tools);
        Ok(())
    }

    /// Invoke a browser tool by name
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        if !*self.initialized.lock().await {
            return Err(Error::ConnectionError("Client not initialized".to_string()));
        }
        if !self.tools.is_empty() && !self.tools.contains_key(name) {
            return Err(Error::ToolNotFound(name.to_string()));
        }

        tracing::debug!(tool = name, "calling browser tool");
        let connector = self.connector.lock().await;
        connector.call_tool(name, arguments).await
    }

    /// Disconnect from the tool server
    pub async fn shutdown(&self) -> Result<()> {
        let mut connector = self.connector.lock().await;
        connector.disconnect().await?;
        *self.initialized.lock().await = false;
        self.tools.clear();
        Ok(())
    }

    fn cache_tools(&self, tools: Vec<Tool>) {
        self.tools.clear();
        for tool in tools {
            self.tools.insert(tool.name.clone(), tool);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{JsonRpcRequest, JsonRpcResponse, ResultContent};
    use serde_json::json;

    /// Connector double answering from canned JSON-RPC results
    struct FakeConnector {
        connected: bool,
    }

    #[async_trait::async_trait]
    impl Connector for FakeConnector {
        async fn send_request(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
            let result = match request.method.as_str() {
                "initialize" => json!({"protocolVersion": "2024-11-05", "capabilities": {}}),
                "tools/list" => json!({"tools": [
                    {"name": "browser_navigate", "description": "Navigate to a URL"},
                    {"name": "browser_extract", "description": "Extract page content"}
                ]}),
                "tools/call" => json!({"content": [{"type": "text", "text": "ok"}]}),
                other => return Err(Error::InvalidRequest(other.to_string())),
            };
            Ok(JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id,
                result: Some(result),
                error: None,
            })
        }

        async fn connect(&mut self) -> Result<()> {
            self.connected = true;
            Ok(())
        }

        async fn disconnect(&mut self) -> Result<()> {
            self.connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    #[tokio::test]
    async fn test_initialize_caches_tools() {
        let client = BrowserClient::new(Box::new(FakeConnector { connected: false }));
        client.initialize().await.unwrap();
        assert!(client.is_initialized().await);

        let mut names: Vec<String> = client
            .list_tools()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["browser_extract", "browser_navigate"]);
    }

    #[tokio::test]
    async fn test_call_tool_requires_initialize() {
        let client = BrowserClient::new(Box::new(FakeConnector { connected: false }));
        let err = client.call_tool("browser_navigate", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let client = BrowserClient::new(Box::new(FakeConnector { connected: false }));
        client.initialize().await.unwrap();
        let err = client.call_tool("browser_teleport", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_call_tool_returns_text() {
        let client = BrowserClient::new(Box::new(FakeConnector { connected: false }));
        client.initialize().await.unwrap();
        let result = client
            .call_tool("browser_navigate", json!({"url": "https://example.com"}))
            .await
            .unwrap();
        assert!(matches!(result.content[0], ResultContent::Text { .. }));
        assert_eq!(result.text(), "ok");
    }
}

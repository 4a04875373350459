/// Stdio connector - spawns the browser tool server as a subprocess
use super::base::Connector;
use crate::error::{Error, Result};
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Subprocess transport speaking newline-delimited JSON-RPC over stdin/stdout
pub struct StdioConnector {
    command: String,
    args: Vec<String>,
    env_vars: HashMap<String, String>,
    child: Arc<Mutex<Option<Child>>>,
    connected: Arc<Mutex<bool>>,
}

impl StdioConnector {
    /// Create a new stdio connector
    pub fn new(command: String, args: Vec<String>) -> Self {
        Self {
            command,
            args,
            env_vars: HashMap::new(),
            child: Arc::new(Mutex::new(None)),
            connected: Arc::new(Mutex::new(false)),
        }
    }

    /// Create a stdio connector from a shell command string
    /// Example: "npx @playwright/mcp --headless"
    pub fn from_command(command_str: &str) -> Result<Self> {
        let parts: Vec<&str> = command_str.split_whitespace().collect();
        let (command, args) = parts
            .split_first()
            .ok_or_else(|| Error::InvalidRequest("Empty tool server command".to_string()))?;
        Ok(Self::new(
            command.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        ))
    }

    /// Environment variables passed to the subprocess (browser launch flags
    /// for containerized execution go through here)
    pub fn with_env(mut self, env_vars: HashMap<String, String>) -> Self {
        self.env_vars = env_vars;
        self
    }

    /// Add a single environment variable
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }
}

#[async_trait::async_trait]
impl Connector for StdioConnector {
    async fn send_request(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        if !*self.connected.lock().await {
            return Err(Error::ConnectionError("Not connected".to_string()));
        }

        let mut child_lock = self.child.lock().await;
        let child = child_lock
            .as_mut()
            .ok_or_else(|| Error::ConnectionError("No tool server running".to_string()))?;

        let json_str = serde_json::to_string(&request)
            .map_err(|e| Error::ConnectionError(e.to_string()))?;

        if let Some(stdin) = child.stdin.as_mut() {
            writeln!(stdin, "{}", json_str)
                .map_err(|e| Error::ConnectionError(e.to_string()))?;
        } else {
            return Err(Error::ConnectionError("No stdin available".to_string()));
        }

        if let Some(stdout) = child.stdout.as_mut() {
            let mut reader = BufReader::new(stdout);
            let mut response_line = String::new();
            reader
                .read_line(&mut response_line)
                .map_err(|e| Error::ConnectionError(e.to_string()))?;

            serde_json::from_str(&response_line)
                .map_err(|e| Error::ConnectionError(e.to_string()))
        } else {
            Err(Error::ConnectionError("No stdout available".to_string()))
        }
    }

    async fn connect(&mut self) -> Result<()> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            // the tool server logs on stderr; it is not part of the protocol stream
            .stderr(Stdio::null());

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        let child = cmd
            .spawn()
            .map_err(|e| Error::ConnectionError(format!("Failed to spawn tool server: {}", e)))?;

        *self.child.lock().await = Some(child);
        *self.connected.lock().await = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.lock().await.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        *self.connected.lock().await = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        futures::executor::block_on(async { *self.connected.lock().await })
    }
}

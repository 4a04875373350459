use crate::browser::BrowserClient;
use crate::connectors::StdioConnector;
use crate::error::{Error, Result};
use crate::protocol::Tool;
use std::fmt;
use std::sync::Arc;

/// LLM interface for the agent loop
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Call the LLM with the conversation so far and the available tools
    async fn call(&self, messages: Vec<ChatMessage>, tools: Vec<Tool>) -> Result<LlmResponse>;
}

/// A message in the agent's conversation with the LLM
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub tool_calls: Vec<ToolInvocation>,
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant(text: impl Into<String>, tool_calls: Vec<ToolInvocation>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool_result(call_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: text.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }
}

/// A tool call requested by the LLM
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// One step of LLM output
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub tool_calls: Vec<ToolInvocation>,
    pub stop_reason: StopReason,
}

/// Reason the LLM stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
}

/// Transcript of one agent run.
///
/// Records are loosely structured log lines in the dialect the result
/// extractor understands; the rendered string is the only form consumed
/// downstream.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    records: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw record
    pub fn push(&mut self, record: impl Into<String>) {
        self.records.push(record.into());
    }

    /// Append an INFO-level record attributed to a source
    pub fn info(&mut self, source: &str, message: impl AsRef<str>) {
        self.records.push(format!("INFO [{}] {}", source, message.as_ref()));
    }

    /// Append a fenced page-extraction record
    pub fn extraction(&mut self, payload: &str) {
        self.records.push(format!(
            "INFO [controller] Extracted from page\n```json\n{}\n```",
            payload
        ));
    }

    /// Append the terminal record of a successful run
    pub fn done(&mut self, content: &str) {
        self.records.push(format!(
            "INFO [agent] ActionResult(is_done=True, success=True, extracted_content='{}')",
            content
        ));
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[String] {
        &self.records
    }
}

impl fmt::Display for RunLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.records.join("\n"))
    }
}

/// Narrow capability interface for running one browser task
#[async_trait::async_trait]
pub trait TaskRunner: Send + Sync {
    /// Execute the task and return the raw run log
    async fn run(&self, task: &str) -> Result<RunLog>;
}

/// Agent loop configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Upper bound on LLM round-trips per run
    pub max_steps: usize,
    /// Launch the browser without a visible window
    pub headless: bool,
    /// Disable the browser sandbox, required in most containers
    pub no_sandbox: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 20,
            headless: true,
            no_sandbox: true,
        }
    }
}

pub const DEFAULT_TOOL_SERVER_COMMAND: &str = "npx @playwright/mcp";

/// Environment variable the tool server reads extra browser flags from
const BROWSER_LAUNCH_ARGS_VAR: &str = "BROWSER_LAUNCH_ARGS";

/// Chromium flags for restricted/containerized execution
const CHROMIUM_LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-software-rasterizer",
    "--disable-extensions",
];

const AGENT_SYSTEM_PROMPT: &str = "\
You are a browser automation agent. You control a real web browser through \
the tools provided. Work step by step: navigate, interact with pages, and \
read their content until the task is complete. When you have the answer, \
stop calling tools and reply with the final result as plain text.";

/// LLM-driven browser agent.
///
/// Spawns a browser tool server per run, loops the LLM over its tools, and
/// records every step into a RunLog.
pub struct BrowserAgent {
    llm: Arc<dyn LlmProvider>,
    config: AgentConfig,
    command: String,
}

impl BrowserAgent {
    pub fn new(llm: Arc<dyn LlmProvider>, config: AgentConfig) -> Self {
        Self {
            llm,
            config,
            command: DEFAULT_TOOL_SERVER_COMMAND.to_string(),
        }
    }

    /// Override the tool server launch command
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    fn spawn_connector(&self) -> Result<StdioConnector> {
        let mut command = self.command.clone();
        if self.config.headless {
            command.push_str(" --headless");
        }
        let mut connector = StdioConnector::from_command(&command)?;
        if self.config.no_sandbox {
            connector =
                connector.with_env_var(BROWSER_LAUNCH_ARGS_VAR, CHROMIUM_LAUNCH_ARGS.join(" "));
        }
        Ok(connector)
    }

    /// Drive the agent loop against an already-initialized client.
    ///
    /// A run that exhausts max_steps returns its log without a terminal
    /// ActionResult record; the extractor's fallback covers that case.
    pub async fn run_with_client(&self, client: &BrowserClient, task: &str) -> Result<RunLog> {
        let mut log = RunLog::new();
        log.info("agent", format!("🚀 Starting task: {}", task));

        let tools = client.list_tools().await?;
        let mut conversation = vec![
            ChatMessage::system(AGENT_SYSTEM_PROMPT),
            ChatMessage::user(task),
        ];

        for step in 1..=self.config.max_steps {
            let response = self.llm.call(conversation.clone(), tools.clone()).await?;

            if response.stop_reason == StopReason::MaxTokens {
                log.info("agent", "⚠️ Model output was truncated");
            }

            if response.tool_calls.is_empty() {
                let answer = response.text.trim().to_string();
                log.info("agent", format!("Result: {}", answer));
                log.done(&answer);
                return Ok(log);
            }

            conversation.push(ChatMessage::assistant(
                response.text.clone(),
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                log.info(
                    "agent",
                    format!("📍 Step {}: {}({})", step, call.name, call.arguments),
                );

                let result = client.call_tool(&call.name, call.arguments.clone()).await?;
                let text = result.text();

                if looks_like_json(&text) {
                    log.extraction(text.trim());
                } else {
                    log.info("controller", format!("↳ {}", preview(&text)));
                }

                conversation.push(ChatMessage::tool_result(call.id.clone(), text));
            }
        }

        log.info("agent", "❌ Max steps reached without a final answer");
        Ok(log)
    }
}

#[async_trait::async_trait]
impl TaskRunner for BrowserAgent {
    async fn run(&self, task: &str) -> Result<RunLog> {
        let run = async {
            let connector = self.spawn_connector()?;
            let client = BrowserClient::new(Box::new(connector));
            client.initialize().await?;
            let result = self.run_with_client(&client, task).await;
            let _ = client.shutdown().await;
            result
        };

        run.await.map_err(|e| Error::AgentError(e.to_string()))
    }
}

fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim();
    (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

/// First few hundred characters, for step records
fn preview(text: &str) -> String {
    const MAX: usize = 300;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{}…", cut)
    }
}

//! Web Agent - natural-language browser automation over HTTP
//!
//! This library provides a small web service that accepts a task prompt,
//! runs it through an LLM-driven browser-automation agent, and returns a
//! presentation-ready HTML answer.
//!
//! ## Features
//! - HTTP API for submitting tasks
//! - Browser automation driven through a tool-server subprocess
//! - Heuristic extraction of a readable answer from the agent's run log
//! - Best-effort HTML enhancement of results via an LLM call
//! - Simulation fallback for hosts that cannot launch a browser
//! - Configuration management
//! - Logging support
//! - .env file support for configuration

/// Load environment variables from .env file
/// Call this in your main() function before reading Settings
pub fn load_env() {
    dotenv::dotenv().ok();
}

pub mod protocol;
pub mod connectors;
pub mod browser;
pub mod agent;
pub mod adapters;
pub mod extract;
pub mod enhance;
pub mod server;
pub mod config;
pub mod logging;
pub mod error;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::adapters::{ChatProvider, OpenAiAdapter};
    pub use crate::agent::{AgentConfig, BrowserAgent, RunLog, TaskRunner};
    pub use crate::browser::BrowserClient;
    pub use crate::config::{ExecutionMode, Settings};
    pub use crate::error::{Error, Result};
    pub use crate::server::WebAgentServer;
}

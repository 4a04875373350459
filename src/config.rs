/// Configuration management
///
/// Settings are read once at startup; handlers receive them through server
/// state instead of re-reading the environment per request.
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// How tasks are executed.
///
/// Restricted hosts (Heroku dynos and similar) cannot launch a browser, so
/// results are simulated with a single LLM call instead of a real run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Run the real browser agent
    Full,
    /// Simulate results without a browser
    Restricted,
}

impl ExecutionMode {
    /// Restricted hosting is signalled by the presence of the DYNO variable
    pub fn from_dyno(dyno_present: bool) -> Self {
        if dyno_present {
            ExecutionMode::Restricted
        } else {
            ExecutionMode::Full
        }
    }
}

/// Runtime settings for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Port the HTTP server binds to
    pub port: u16,

    /// API key for the LLM service, required in both execution modes
    pub openai_api_key: Option<String>,

    /// Model driving the agent and the formatting calls
    pub model: String,

    /// Execution mode, resolved once at startup
    pub execution_mode: ExecutionMode,

    /// Verbose logging
    pub debug: bool,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let debug = std::env::var("DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            port,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("AGENT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            execution_mode: ExecutionMode::from_dyno(std::env::var("DYNO").is_ok()),
            debug,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            openai_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            execution_mode: ExecutionMode::Full,
            debug: false,
        }
    }
}

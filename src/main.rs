use std::sync::Arc;

use webagent::adapters::OpenAiAdapter;
use webagent::agent::{AgentConfig, BrowserAgent};
use webagent::config::Settings;
use webagent::error::Error;
use webagent::logging::{LogLevel, init_logging};
use webagent::server::WebAgentServer;

#[tokio::main]
async fn main() -> webagent::Result<()> {
    webagent::load_env();

    let settings = Settings::from_env();
    init_logging(LogLevel::from_debug_flag(settings.debug));

    let api_key = settings
        .openai_api_key
        .clone()
        .ok_or_else(|| Error::InternalError("OPENAI_API_KEY not set".to_string()))?;

    let adapter = Arc::new(OpenAiAdapter::new(api_key, settings.model.clone()));
    let runner = Arc::new(BrowserAgent::new(adapter.clone(), AgentConfig::default()));

    log::info!(
        "starting web agent on port {} in {:?} mode",
        settings.port,
        settings.execution_mode
    );

    let server = WebAgentServer::new(settings.execution_mode, runner, adapter);
    server.start(&format!("0.0.0.0:{}", settings.port)).await
}

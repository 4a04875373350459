use crate::adapters::ChatProvider;
use crate::agent::TaskRunner;
use crate::config::ExecutionMode;
use crate::enhance::{enhance_result, simulate_browser_task};
use crate::error::{Error, Result};
use crate::extract::extract_result_text;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mode: ExecutionMode,
    pub runner: Arc<dyn TaskRunner>,
    pub chat: Arc<dyn ChatProvider>,
}

/// Request body for the browser-agent API
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Web Agent HTTP server: a static index page plus the browser-agent API
pub struct WebAgentServer {
    state: AppState,
}

impl WebAgentServer {
    pub fn new(
        mode: ExecutionMode,
        runner: Arc<dyn TaskRunner>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            state: AppState { mode, runner, chat },
        }
    }

    /// Bind and serve until the process exits
    pub async fn start(&self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::ConnectionError(e.to_string()))?;

        log::info!("listening on {}", addr);

        axum::serve(listener, router(self.state.clone()))
            .await
            .map_err(|e| Error::ConnectionError(e.to_string()))?;

        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/api/browser-agent", post(handle_browser_agent))
        .with_state(state)
}

async fn handle_browser_agent(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest>,
) -> (StatusCode, Json<Value>) {
    let prompt = match req.prompt {
        Some(p) if !p.is_empty() => p,
        _ => return error_response(&Error::MissingPrompt),
    };

    match run_task(&state, &prompt).await {
        Ok(result) => (StatusCode::OK, Json(json!({"result": result}))),
        Err(e) => {
            log::error!("Error in browser agent: {}", e);
            error_response(&e)
        }
    }
}

fn error_response(error: &Error) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if status.is_client_error() {
        error.to_string()
    } else {
        format!("Server error: {}", error)
    };
    (status, Json(json!({"error": message})))
}

async fn run_task(state: &AppState, prompt: &str) -> Result<String> {
    // restricted hosts cannot launch a browser; simulate instead
    if state.mode == ExecutionMode::Restricted {
        return Ok(simulate_browser_task(state.chat.as_ref(), prompt).await);
    }

    let run_log = state.runner.run(prompt).await?;
    log::debug!("agent run log:\n{}", run_log);

    let raw_result = extract_result_text(&run_log.to_string());
    Ok(enhance_result(state.chat.as_ref(), prompt, &raw_result).await)
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

const INDEX_PAGE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Web Agent</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
            background: #f8f8f8;
            color: #333;
            min-height: 100vh;
        }

        .header {
            background: white;
            padding: 20px;
            border-bottom: 1px solid #eee;
        }

        .header h1 {
            font-size: 24px;
            font-weight: 600;
        }

        .header p {
            font-size: 14px;
            color: #666;
            margin-top: 4px;
        }

        .container {
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
        }

        .panel {
            background: white;
            border: 1px solid #eee;
            padding: 20px;
            margin-bottom: 20px;
        }

        textarea {
            width: 100%;
            min-height: 90px;
            padding: 10px;
            border: 1px solid #ddd;
            font-size: 14px;
            font-family: inherit;
            resize: vertical;
        }

        textarea:focus {
            outline: none;
            border-color: #000;
        }

        .examples {
            margin-top: 10px;
            font-size: 13px;
            color: #666;
        }

        .examples span {
            cursor: pointer;
            text-decoration: underline;
            margin-right: 12px;
        }

        button {
            margin-top: 12px;
            padding: 10px 16px;
            border: 1px solid black;
            background: black;
            color: white;
            font-size: 14px;
            font-weight: 600;
            cursor: pointer;
        }

        button:hover { background: #333; }
        button:disabled { background: #999; border-color: #999; cursor: wait; }

        .searching-message { color: #666; }

        .error-message {
            background: #fff5f5;
            border-left: 2px solid #f56565;
            padding: 10px;
        }

        #output { font-size: 14px; line-height: 1.5; }
    </style>
</head>
<body>
    <div class="header">
        <h1>Web Agent</h1>
        <p>Describe a browsing task and the agent will do it for you.</p>
    </div>

    <div class="container">
        <div class="panel">
            <textarea id="promptInput" placeholder="e.g. Find the 3 cheapest flights from Berlin to Lisbon next weekend"></textarea>
            <div class="examples">
                Try:
                <span onclick="setPrompt('Find the 3 cheapest flights from Berlin to Lisbon next weekend')">cheapest flights</span>
                <span onclick="setPrompt('Compare prices for wireless headphones under $100')">price comparison</span>
            </div>
            <button id="submitBtn">Run Task</button>
        </div>

        <div class="panel">
            <div id="output">Results will appear here.</div>
        </div>
    </div>

    <script>
        const promptInput = document.getElementById('promptInput');
        const submitBtn = document.getElementById('submitBtn');
        const outputDiv = document.getElementById('output');

        function setPrompt(prompt) {
            promptInput.value = prompt;
            promptInput.focus();
        }

        submitBtn.addEventListener('click', async () => {
            const prompt = promptInput.value.trim();
            if (!prompt) {
                outputDiv.textContent = 'Please enter a prompt.';
                return;
            }

            submitBtn.disabled = true;
            outputDiv.innerHTML = '<div class="searching-message">Running your task, this can take a minute...</div>';

            try {
                const response = await fetch('/api/browser-agent', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ prompt }),
                });

                const data = await response.json();
                if (data.error) {
                    throw new Error(data.error);
                }

                outputDiv.innerHTML = data.result;
            } catch (error) {
                outputDiv.innerHTML = `<div class="error-message">Error: ${error.message}</div>`;
            } finally {
                submitBtn.disabled = false;
            }
        });
    </script>
</body>
</html>
"#;

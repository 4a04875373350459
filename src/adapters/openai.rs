/// OpenAI adapter over the Chat Completions API.
///
/// Implements both LLM seams in the crate: `ChatProvider` for the one-shot
/// formatting calls and `LlmProvider` for the agent's tool-calling loop.
/// Tool calls are returned to the caller; the loop itself lives in
/// `agent::BrowserAgent`.

use crate::adapters::ChatProvider;
use crate::agent::{ChatMessage, LlmProvider, LlmResponse, Role, StopReason, ToolInvocation};
use crate::error::{Error, Result};
use crate::protocol::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Chat Completions request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
}

/// A message in wire format
#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

/// A tool call in wire format (arguments are a JSON-encoded string)
#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    type_field: String,
    function: WireFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

/// Chat Completions response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

/// OpenAI LLM provider
pub struct OpenAiAdapter {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// Create from environment variables
    /// Expects: OPENAI_API_KEY
    pub fn from_env(model: String) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::InternalError("OPENAI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| Error::ConnectionError(format!("OpenAI API error: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::LLMError(format!("OpenAI API error: {}", error_text)));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| Error::ConnectionError(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&response_text).map_err(|e| {
            Error::LLMError(format!(
                "Failed to parse OpenAI response: {} (body: {})",
                e, response_text
            ))
        })
    }

    /// Map a browser tool to the Chat Completions function format
    fn tool_spec(tool: &Tool) -> Value {
        let parameters = tool.input_schema.as_ref().map_or_else(
            || json!({"type": "object", "properties": {}}),
            |schema| {
                json!({
                    "type": schema.schema_type,
                    "properties": schema.properties,
                    "required": schema.required,
                })
            },
        );

        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": parameters,
            }
        })
    }

    fn wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "tool",
                };

                let tool_calls = if msg.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        msg.tool_calls
                            .iter()
                            .map(|call| WireToolCall {
                                id: call.id.clone(),
                                type_field: "function".to_string(),
                                function: WireFunction {
                                    name: call.name.clone(),
                                    arguments: call.arguments.to_string(),
                                },
                            })
                            .collect(),
                    )
                };

                // assistant messages that only carry tool calls have no content
                let content = if msg.content.is_empty() && tool_calls.is_some() {
                    None
                } else {
                    Some(msg.content.clone())
                };

                WireMessage {
                    role,
                    content,
                    tool_calls,
                    tool_call_id: msg.tool_call_id.clone(),
                }
            })
            .collect()
    }

    fn parse_tool_calls(calls: Vec<WireToolCall>) -> Vec<ToolInvocation> {
        calls
            .into_iter()
            .map(|call| {
                let arguments =
                    serde_json::from_str(&call.function.arguments).unwrap_or_else(|_| json!({}));
                ToolInvocation {
                    id: call.id,
                    name: call.function.name,
                    arguments,
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ChatProvider for OpenAiAdapter {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                WireMessage {
                    role: "system",
                    content: Some(system.to_string()),
                    tool_calls: None,
                    tool_call_id: None,
                },
                WireMessage {
                    role: "user",
                    content: Some(user.to_string()),
                    tool_calls: None,
                    tool_call_id: None,
                },
            ],
            tools: None,
        };

        let response = self.post(&request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::LLMError("Empty completion".to_string()))
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiAdapter {
    async fn call(&self, messages: Vec<ChatMessage>, tools: Vec<Tool>) -> Result<LlmResponse> {
        let wire_tools = if tools.is_empty() {
            None
        } else {
            Some(tools.iter().map(Self::tool_spec).collect())
        };

        let request = ChatRequest {
            model: self.model.clone(),
            messages: Self::wire_messages(&messages),
            tools: wire_tools,
        };

        let response = self.post(&request).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::LLMError("No choices in response".to_string()))?;

        let stop_reason = match choice.finish_reason.as_deref() {
            Some("tool_calls") => StopReason::ToolUse,
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        };

        Ok(LlmResponse {
            text: choice.message.content.unwrap_or_default(),
            tool_calls: Self::parse_tool_calls(choice.message.tool_calls.unwrap_or_default()),
            stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolInputSchema;
    use std::collections::HashMap;

    #[test]
    fn test_adapter_creation() {
        let adapter = OpenAiAdapter::new("test-key".to_string(), "gpt-4o".to_string());
        assert_eq!(adapter.model(), "gpt-4o");
    }

    #[test]
    fn test_tool_spec_with_schema() {
        let mut properties = HashMap::new();
        properties.insert("url".to_string(), json!({"type": "string"}));
        let tool = Tool {
            name: "browser_navigate".to_string(),
            description: Some("Navigate to a URL".to_string()),
            input_schema: Some(ToolInputSchema {
                schema_type: "object".to_string(),
                properties,
                required: Some(vec!["url".to_string()]),
            }),
        };

        let spec = OpenAiAdapter::tool_spec(&tool);
        assert_eq!(spec["type"], "function");
        assert_eq!(spec["function"]["name"], "browser_navigate");
        assert_eq!(spec["function"]["parameters"]["required"][0], "url");
    }

    #[test]
    fn test_tool_spec_without_schema() {
        let tool = Tool {
            name: "browser_snapshot".to_string(),
            description: None,
            input_schema: None,
        };
        let spec = OpenAiAdapter::tool_spec(&tool);
        assert_eq!(spec["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_wire_messages_for_tool_call_round() {
        let messages = vec![
            ChatMessage::assistant(
                "",
                vec![ToolInvocation {
                    id: "call_1".to_string(),
                    name: "browser_click".to_string(),
                    arguments: json!({"text": "Search"}),
                }],
            ),
            ChatMessage::tool_result("call_1", "clicked"),
        ];

        let wire = OpenAiAdapter::wire_messages(&messages);
        assert_eq!(wire[0].role, "assistant");
        assert!(wire[0].content.is_none());
        assert_eq!(wire[0].tool_calls.as_ref().unwrap()[0].function.name, "browser_click");
        assert_eq!(wire[1].role, "tool");
        assert_eq!(wire[1].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let body = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "browser_extract", "arguments": "{\"selector\": \"h1\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        let choice = parsed.choices.into_iter().next().unwrap();
        assert_eq!(choice.finish_reason.as_deref(), Some("tool_calls"));
        let calls = OpenAiAdapter::parse_tool_calls(choice.message.tool_calls.unwrap());
        assert_eq!(calls[0].name, "browser_extract");
        assert_eq!(calls[0].arguments["selector"], "h1");
    }

    #[test]
    fn test_parse_tool_calls_with_bad_arguments() {
        let calls = OpenAiAdapter::parse_tool_calls(vec![WireToolCall {
            id: "call_2".to_string(),
            type_field: "function".to_string(),
            function: WireFunction {
                name: "browser_click".to_string(),
                arguments: "not json".to_string(),
            },
        }]);
        assert_eq!(calls[0].arguments, json!({}));
    }
}

//! Reasoning client for OpenAI-compatible chat completions endpoints.
//!
//! Works against api.openai.com and local servers (vLLM, llama.cpp, Ollama)
//! that speak the same `/chat/completions` protocol with function tools.

use crate::config::FileReasoningConfig;
use crate::tools::JsonSchemaToolConverter;
use archivist_application::{ReasoningClient, ReasoningError, ToolSchemaPort};
use archivist_domain::{
    ContentBlock, ConversationState, ReasoningReply, StopReason, ToolDefinition, Turn,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// e.g. http://localhost:8000/v1
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl From<&FileReasoningConfig> for OpenAiClientConfig {
    fn from(config: &FileReasoningConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

pub struct OpenAiCompatibleClient {
    http: Client,
    cfg: OpenAiClientConfig,
    schema: JsonSchemaToolConverter,
}

impl OpenAiCompatibleClient {
    pub fn new(cfg: OpenAiClientConfig) -> Result<Self, ReasoningError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ReasoningError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            cfg,
            schema: JsonSchemaToolConverter,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, conversation: &ConversationState, tools: &[ToolDefinition]) -> Value {
        let mut body = json!({
            "model": self.cfg.model,
            "messages": to_messages(conversation),
            "temperature": self.cfg.temperature,
        });
        if let Some(max_tokens) = self.cfg.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if !tools.is_empty() {
            let functions: Vec<Value> = tools
                .iter()
                .map(|tool| {
                    let schema = self.schema.tool_to_schema(tool);
                    json!({
                        "type": "function",
                        "function": {
                            "name": schema["name"],
                            "description": schema["description"],
                            "parameters": schema["input_schema"],
                        }
                    })
                })
                .collect();
            body["tools"] = Value::Array(functions);
            body["tool_choice"] = json!("auto");
        }
        body
    }
}

/// Map the transcript onto chat messages.
///
/// Corrective notes go out as user messages; many servers reject a system
/// message after the first position.
fn to_messages(conversation: &ConversationState) -> Vec<Value> {
    conversation
        .turns()
        .iter()
        .map(|turn| match turn {
            Turn::System { content } => json!({ "role": "system", "content": content }),
            Turn::User { content } => json!({ "role": "user", "content": content }),
            Turn::Note { content } => json!({ "role": "user", "content": content }),
            Turn::Assistant {
                content,
                tool_calls,
            } => {
                let text = if content.is_empty() {
                    Value::Null
                } else {
                    json!(content)
                };
                let mut message = json!({ "role": "assistant", "content": text });
                if !tool_calls.is_empty() {
                    message["tool_calls"] = tool_calls
                        .iter()
                        .map(|call| {
                            json!({
                                "id": call.correlation_id,
                                "type": "function",
                                "function": {
                                    "name": call.tool_name,
                                    "arguments": serde_json::to_string(&call.arguments)
                                        .unwrap_or_else(|_| "{}".to_string()),
                                }
                            })
                        })
                        .collect();
                }
                message
            }
            Turn::Tool { result } => json!({
                "role": "tool",
                "tool_call_id": result.correlation_id,
                "content": result.render(),
            }),
        })
        .collect()
}

fn parse_arguments(raw: Option<&Value>) -> Result<HashMap<String, Value>, String> {
    let value = match raw {
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(HashMap::new()),
        Some(Value::String(s)) => {
            serde_json::from_str::<Value>(s).map_err(|e| format!("arguments are not JSON: {e}"))?
        }
        Some(other) => other.clone(),
        None => return Ok(HashMap::new()),
    };
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Null => Ok(HashMap::new()),
        _ => Err("arguments must be a JSON object".to_string()),
    }
}

/// Interpret a chat completions response body
fn parse_reply(v: &Value) -> Result<ReasoningReply, ReasoningError> {
    let choice = v
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| ReasoningError::Malformed("response has no choices".to_string()))?;
    let message = choice
        .get("message")
        .ok_or_else(|| ReasoningError::Malformed("choice has no message".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = message.get("content").and_then(|c| c.as_str())
        && !text.is_empty()
    {
        content.push(ContentBlock::text(text));
    }

    if let Some(calls) = message.get("tool_calls").and_then(|t| t.as_array()) {
        for call in calls {
            let id = call.get("id").and_then(|i| i.as_str()).unwrap_or_default();
            let function = call.get("function");
            let name = function
                .and_then(|f| f.get("name"))
                .and_then(|n| n.as_str())
                .unwrap_or_default();
            let input = parse_arguments(function.and_then(|f| f.get("arguments")))
                .map_err(|e| ReasoningError::Malformed(format!("tool call '{name}': {e}")))?;
            content.push(ContentBlock::tool_use(id, name, input));
        }
    }

    let stop_reason = choice
        .get("finish_reason")
        .and_then(|r| r.as_str())
        .map(|r| match r {
            "stop" => StopReason::EndTurn,
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        });

    Ok(ReasoningReply {
        content,
        stop_reason,
        model: v.get("model").and_then(|m| m.as_str()).map(String::from),
    })
}

#[async_trait]
impl ReasoningClient for OpenAiCompatibleClient {
    async fn complete(
        &self,
        conversation: &ConversationState,
        tools: &[ToolDefinition],
    ) -> Result<ReasoningReply, ReasoningError> {
        let url = self.endpoint();
        debug!(target = "reasoning_client", turns = conversation.len(), "POST {}", url);

        let mut req = self
            .http
            .post(&url)
            .header("content-type", "application/json");
        if let Some(key) = &self.cfg.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .json(&self.request_body(conversation, tools))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReasoningError::Timeout
                } else {
                    ReasoningError::Transport(format!("chat completions HTTP error: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(target = "reasoning_client", %status, body = %body, "chat completions error");
            return Err(ReasoningError::Transport(format!(
                "chat completions error: status={} body={}",
                status, body
            )));
        }

        let val: Value = resp
            .json()
            .await
            .map_err(|e| ReasoningError::Malformed(format!("response is not JSON: {e}")))?;
        parse_reply(&val)
    }
}

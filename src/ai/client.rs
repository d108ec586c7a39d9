//! AI 提供方 HTTP 客户端
//!
//! 只负责传输：按提供方的报文格式组装请求、映射 HTTP 错误、取出回复文本。
//! 不做重试，失败直接返回给调用方。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::provider::{ProviderCredentials, WireFormat, provider_spec};
use crate::config::AiConfig;
use crate::errors::{AssessError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// 一次补全请求
#[derive(Debug, Clone)]
pub struct AiPrompt {
    pub system: Option<String>,
    pub user: String,
}

impl AiPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
        }
    }
}

#[async_trait]
pub trait AiClient: Send + Sync {
    /// 返回模型回复的纯文本
    async fn complete(&self, credentials: &ProviderCredentials, prompt: &AiPrompt)
    -> Result<String>;
}

pub struct HttpAiClient {
    client: Client,
    max_tokens: u32,
}

impl HttpAiClient {
    pub fn new(timeout: Duration, max_tokens: u32) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, max_tokens })
    }

    pub fn from_config(config: &AiConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.request_timeout),
            config.max_tokens,
        )
    }
}

#[async_trait]
impl AiClient for HttpAiClient {
    async fn complete(
        &self,
        credentials: &ProviderCredentials,
        prompt: &AiPrompt,
    ) -> Result<String> {
        let spec = provider_spec(credentials.provider);
        let body = build_request_body(spec.wire_format, spec.default_model, prompt, self.max_tokens);

        let request = match spec.wire_format {
            WireFormat::ChatCompletions => self
                .client
                .post(spec.endpoint)
                .bearer_auth(&credentials.api_key),
            WireFormat::Messages => self
                .client
                .post(spec.endpoint)
                .header("x-api-key", &credentials.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            WireFormat::GenerateContent => self
                .client
                .post(spec.endpoint.replace("{model}", spec.default_model))
                .header("x-goog-api-key", &credentials.api_key),
        };

        debug!(
            "Sending AI request to {} (model: {})",
            credentials.provider, spec.default_model
        );
        let response = request.json(&body).send().await?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let detail = error_detail(&payload).unwrap_or_else(|| status.to_string());
            warn!("AI provider {} returned {}: {}", credentials.provider, status, detail);
            return Err(AssessError::ai_provider(format!(
                "{} request failed ({}): {}",
                credentials.provider,
                status.as_u16(),
                detail
            )));
        }

        extract_text(spec.wire_format, &payload)
    }
}

pub(crate) fn build_request_body(
    format: WireFormat,
    model: &str,
    prompt: &AiPrompt,
    max_tokens: u32,
) -> Value {
    match format {
        WireFormat::ChatCompletions => {
            let mut messages = Vec::new();
            if let Some(system) = &prompt.system {
                messages.push(json!({ "role": "system", "content": system }));
            }
            messages.push(json!({ "role": "user", "content": prompt.user }));
            json!({
                "model": model,
                "messages": messages,
                "max_tokens": max_tokens,
            })
        }
        WireFormat::Messages => {
            let mut body = json!({
                "model": model,
                "max_tokens": max_tokens,
                "messages": [{ "role": "user", "content": prompt.user }],
            });
            if let Some(system) = &prompt.system {
                body["system"] = json!(system);
            }
            body
        }
        WireFormat::GenerateContent => {
            let mut body = json!({
                "contents": [{ "role": "user", "parts": [{ "text": prompt.user }] }],
                "generationConfig": { "maxOutputTokens": max_tokens },
            });
            if let Some(system) = &prompt.system {
                body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
            }
            body
        }
    }
}

/// 从提供方响应中取出回复文本
pub(crate) fn extract_text(format: WireFormat, payload: &Value) -> Result<String> {
    let text = match format {
        WireFormat::ChatCompletions => payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string),
        WireFormat::Messages => {
            let parts: Vec<&str> = payload["content"]
                .as_array()
                .map(|blocks| {
                    blocks
                        .iter()
                        .filter(|b| b["type"] == "text")
                        .filter_map(|b| b["text"].as_str())
                        .collect()
                })
                .unwrap_or_default();
            (!parts.is_empty()).then(|| parts.concat())
        }
        WireFormat::GenerateContent => {
            let parts: Vec<&str> = payload["candidates"][0]["content"]["parts"]
                .as_array()
                .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
                .unwrap_or_default();
            (!parts.is_empty()).then(|| parts.concat())
        }
    };

    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AssessError::ai_response("AI provider returned an empty reply"))
}

fn error_detail(payload: &Value) -> Option<String> {
    payload["error"]["message"]
        .as_str()
        .or_else(|| payload["error"].as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> AiPrompt {
        AiPrompt::new("be brief", "hello")
    }

    #[test]
    fn test_chat_completions_body() {
        let body = build_request_body(WireFormat::ChatCompletions, "m", &prompt(), 100);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert_eq!(body["max_tokens"], 100);
    }

    #[test]
    fn test_messages_body_puts_system_at_top_level() {
        let body = build_request_body(WireFormat::Messages, "m", &prompt(), 100);
        assert_eq!(body["system"], "be brief");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_generate_content_body() {
        let body = build_request_body(WireFormat::GenerateContent, "m", &prompt(), 64);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 64);
    }

    #[test]
    fn test_extract_text_per_format() {
        let openai = json!({ "choices": [{ "message": { "content": "hi" } }] });
        assert_eq!(extract_text(WireFormat::ChatCompletions, &openai).unwrap(), "hi");

        let anthropic = json!({ "content": [
            { "type": "text", "text": "a" },
            { "type": "tool_use", "id": "x" },
            { "type": "text", "text": "b" }
        ] });
        assert_eq!(extract_text(WireFormat::Messages, &anthropic).unwrap(), "ab");

        let gemini = json!({ "candidates": [{ "content": { "parts": [{ "text": "g" }] } }] });
        assert_eq!(extract_text(WireFormat::GenerateContent, &gemini).unwrap(), "g");
    }

    #[test]
    fn test_extract_text_empty_is_error() {
        let err = extract_text(WireFormat::ChatCompletions, &json!({ "choices": [] })).unwrap_err();
        assert_eq!(err.code(), "E012");
    }

    #[test]
    fn test_error_detail() {
        let payload = json!({ "error": { "message": "invalid key" } });
        assert_eq!(error_detail(&payload).as_deref(), Some("invalid key"));
        assert_eq!(error_detail(&Value::Null), None);
    }
}

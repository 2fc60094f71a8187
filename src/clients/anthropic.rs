use crate::core::completion::CompletionClient;
use crate::core::config::CompletionConfig;
use crate::core::error::{AppError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API 客户端
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: &CompletionConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// 按配置创建；未配置密钥时返回 `ProxyDisabled`
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            AppError::ProxyDisabled(format!("环境变量 {} 未设置", config.api_key_env))
        })?;
        Self::new(config, api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

/// 取第一个文本块
fn first_text(status: u16, response: MessagesResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| AppError::Completion {
            status,
            message: "响应中没有文本内容".to_string(),
        })
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!("发送补全请求: model={}, {} 字符", self.model, prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Completion {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&text)?;
        first_text(status.as_u16(), parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 1000,
            messages: vec![Message {
                role: "user",
                content: "hola",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "max_tokens": 1000,
                "messages": [{"role": "user", "content": "hola"}]
            })
        );
    }

    #[test]
    fn picks_first_text_block() {
        let raw = r#"{"id":"msg_1","content":[{"type":"tool_use","id":"t"},{"type":"text","text":"respuesta"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_text(200, parsed).unwrap(), "respuesta");
    }

    #[test]
    fn empty_content_is_an_error() {
        let parsed: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        let err = first_text(200, parsed).unwrap_err();
        assert!(matches!(err, AppError::Completion { status: 200, .. }));
        assert!(err
            .detail()
            .starts_with("Error communicating with completion service"));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let config = CompletionConfig {
            base_url: "http://localhost:9999/".to_string(),
            ..CompletionConfig::default()
        };
        let client = AnthropicClient::new(&config, "key".to_string()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/messages");
        assert_eq!(client.name(), "anthropic");
    }
}

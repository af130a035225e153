// file: src/llm/mod.rs
// description: OpenAI-compatible chat completion client
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::config::LlmConfig;
use crate::error::{AppError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Backend capable of turning a message list into one assistant reply.
/// Lets the agent loop run against a scripted stand-in under test.
pub trait ChatBackend {
    fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[derive(Debug)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Config("OPENAI_API_KEY is not set".to_string()))?;

        Ok(Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

impl ChatBackend for ChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
        };

        debug!(
            "requesting chat completion ({} messages, model {})",
            messages.len(),
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Api {
                service: "llm",
                status,
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| AppError::Parse {
            service: "llm",
            message: e.to_string(),
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(AppError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        assert_eq!(ChatMessage::assistant("a").role, "assistant");
    }

    #[test]
    fn response_parses_first_choice() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello there"}, "finish_reason": "stop"}
            ],
            "usage": {"total_tokens": 12}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.choices[0].message.content, "Hello there");
    }

    #[test]
    fn request_serializes_messages() {
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "gpt-4o",
            messages: &messages,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn client_requires_api_key() {
        let config = LlmConfig {
            endpoint: "https://example.com".to_string(),
            model: "gpt-4o".to_string(),
            api_key: None,
        };
        let err = ChatClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}

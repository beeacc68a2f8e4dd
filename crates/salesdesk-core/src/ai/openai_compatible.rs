//! OpenAI-compatible backend implementation
//!
//! Talks to `POST {base_url}/v1/chat/completions`. Works with api.openai.com
//! and any server exposing the same API (vLLM, LocalAI, llama-server).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::parsing::excerpt;
use super::types::CompletionRequest;
use super::AIBackend;

/// OpenAI-compatible backend
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a backend whose requests give up after `timeout`
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key {
            Some(ref api_key) => builder.header("Authorization", format!("Bearer {}", api_key)),
            None => builder,
        }
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// Null when the model refuses or only calls tools
    #[serde(default)]
    content: Option<String>,
}

fn build_messages(request: &CompletionRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(ref system) = request.system {
        messages.push(ChatMessage {
            role: "system",
            content: system.clone(),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: request.user.clone(),
    });
    messages
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(request),
            temperature: request.temperature,
            stream: false,
        };

        debug!(
            task = request.task.as_str(),
            model = %self.model,
            temperature = request.temperature,
            "Sending chat completion"
        );

        let response = self
            .authorize(
                self.http_client
                    .post(format!("{}/v1/chat/completions", self.base_url)),
            )
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status,
                body: excerpt(&body),
            });
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream {
                status: 200,
                body: "No choices in completion response".into(),
            })?
            .message
            .content
            .unwrap_or_default();

        debug!(task = request.task.as_str(), response = %excerpt(&content), "Chat completion reply");
        Ok(content)
    }

    async fn health_check(&self) -> bool {
        let request = self
            .authorize(self.http_client.get(format!("{}/v1/models", self.base_url)));
        match request.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PromptId;
    use crate::test_utils::MockCompletionServer;

    fn backend(url: &str) -> OpenAICompatibleBackend {
        OpenAICompatibleBackend::new(url, "gpt-4o-mini", Duration::from_secs(5))
            .unwrap()
            .with_api_key("sk-test")
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend = backend("http://localhost:12434/");
        assert_eq!(backend.host(), "http://localhost:12434");
        assert_eq!(backend.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_with_model_keeps_key() {
        let other = backend("http://localhost:12434").with_model("gpt-4o");
        assert_eq!(other.model(), "gpt-4o");
        assert_eq!(other.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_chat_completion_request_serialization() {
        let request = CompletionRequest::new(PromptId::ExtractIntent, "Hello", 0.0)
            .with_system("Answer in JSON");
        let body = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: build_messages(&request),
            temperature: request.temperature,
            stream: false,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Hello");
        assert_eq!(json["temperature"].as_f64().unwrap(), 0.0);
    }

    #[test]
    fn test_response_with_null_content() {
        let json = r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockCompletionServer::with_replies(vec![
            r#"{"intent": "sales_report", "store": "Mumbai"}"#.to_string(),
        ])
        .await;
        let backend = backend(&server.url());

        let request = CompletionRequest::new(PromptId::ExtractIntent, "Sales in Mumbai?", 0.0);
        let reply = backend.complete(&request).await.unwrap();
        assert_eq!(reply, r#"{"intent": "sales_report", "store": "Mumbai"}"#);

        let seen = server.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].body["model"], "gpt-4o-mini");
        assert_eq!(seen[0].body["messages"][0]["content"], "Sales in Mumbai?");
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer sk-test"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let server = MockCompletionServer::failing(429).await;
        let backend = backend(&server.url());

        let request = CompletionRequest::new(PromptId::NarrateInsights, "data", 0.3);
        let err = backend.complete(&request).await.unwrap_err();
        match &err {
            Error::Upstream { status, body } => {
                assert_eq!(*status, 429);
                assert!(!body.is_empty());
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockCompletionServer::with_replies(vec![]).await;
        assert!(backend(&server.url()).health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = backend("http://127.0.0.1:1");
        assert!(!backend.health_check().await);

        let request = CompletionRequest::new(PromptId::ExtractIntent, "hi", 0.0);
        let err = backend.complete(&request).await.unwrap_err();
        assert!(err.is_upstream());
    }
}

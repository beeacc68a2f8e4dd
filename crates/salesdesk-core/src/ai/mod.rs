//! Pluggable completion backend abstraction
//!
//! # Architecture
//!
//! - `AIBackend` trait: single-turn text completion plus health/identity
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! The backend is chosen by `[ai].backend` in the config file or the
//! `AI_BACKEND` environment variable (openai, mock). The OpenAI backend
//! requires `OPENAI_API_KEY`.

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;

use crate::config::AiConfig;
use crate::error::{Error, Result};

/// Environment variable holding the completion API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Trait defining the interface for all completion backends
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Send one prompt and return the model's text reply
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    fn model(&self) -> &str;

    fn host(&self) -> &str;
}

/// Which backend implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    OpenAI,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Mock => "mock",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "openai_compatible" => Ok(Self::OpenAI),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown AI backend: {} (valid: openai, mock)", s)),
        }
    }
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI chat completions API (or any compatible server)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Canned responses for tests and offline demos
    Mock(MockBackend),
}

impl AIClient {
    /// Build the configured backend, reading the API key from the environment
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok();
        Self::from_config_with_key(config, api_key.as_deref())
    }

    /// Build the configured backend with an explicit API key
    ///
    /// A missing or blank key is fatal for the OpenAI backend.
    pub fn from_config_with_key(config: &AiConfig, api_key: Option<&str>) -> Result<Self> {
        match config.backend {
            BackendKind::Mock => Ok(Self::mock().with_model(&config.model)),
            BackendKind::OpenAI => {
                let key = api_key
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        Error::Config(format!(
                            "{} is not set (required for the openai backend)",
                            API_KEY_ENV
                        ))
                    })?;
                let backend = OpenAICompatibleBackend::new(
                    &config.base_url,
                    &config.model,
                    config.request_timeout,
                )?
                .with_api_key(key);
                Ok(AIClient::OpenAICompatible(backend))
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            AIClient::OpenAICompatible(_) => BackendKind::OpenAI,
            AIClient::Mock(_) => BackendKind::Mock,
        }
    }

    pub fn info(&self) -> BackendInfo {
        BackendInfo {
            backend: self.kind().as_str().to_string(),
            model: self.model().to_string(),
            host: self.host().to_string(),
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(request).await,
            AIClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("openai".parse::<BackendKind>().unwrap(), BackendKind::OpenAI);
        assert_eq!(
            "OpenAI_Compatible".parse::<BackendKind>().unwrap(),
            BackendKind::OpenAI
        );
        assert_eq!("mock".parse::<BackendKind>().unwrap(), BackendKind::Mock);
        assert!("ollama".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_openai_requires_api_key() {
        let config = AiConfig::default();
        let err = AIClient::from_config_with_key(&config, None).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(API_KEY_ENV));

        let err = AIClient::from_config_with_key(&config, Some("   ")).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_openai_client_from_config() {
        let config = AiConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..AiConfig::default()
        };
        let client = AIClient::from_config_with_key(&config, Some("sk-test")).unwrap();
        assert_eq!(client.kind(), BackendKind::OpenAI);
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.host(), "http://localhost:8080");
    }

    #[test]
    fn test_mock_client_needs_no_key() {
        let config = AiConfig {
            backend: BackendKind::Mock,
            ..AiConfig::default()
        };
        let client = AIClient::from_config_with_key(&config, None).unwrap();
        let info = client.info();
        assert_eq!(info.backend, "mock");
        assert_eq!(info.model, "gpt-4o-mini");
    }

    #[test]
    fn test_with_model() {
        let client = AIClient::mock().with_model("other-model");
        assert_eq!(client.model(), "other-model");
    }
}

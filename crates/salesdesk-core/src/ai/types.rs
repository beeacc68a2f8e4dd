//! Completion backend request/response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::Serialize;

use crate::prompts::PromptId;

/// One single-turn completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Which prompt produced this request
    pub task: PromptId,
    /// System instructions, sent as a separate message when present
    pub system: Option<String>,
    /// Rendered user message
    pub user: String,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(task: PromptId, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            task,
            system: None,
            user: user.into(),
            temperature,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Backend identity for status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    pub backend: String,
    pub model: String,
    pub host: String,
}

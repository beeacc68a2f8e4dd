//! Mock backend for testing
//!
//! Answers intent extraction with keyword matching and narration with a
//! canned summary, so the whole flow runs without network access. Failure
//! modes and fixed replies can be configured per task.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::error::{Error, Result};
use crate::intent::DEFAULT_DATE_RANGE_DAYS;
use crate::models::{Category, Store};
use crate::prompts::PromptId;

use super::types::CompletionRequest;
use super::AIBackend;

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    model: String,
    replies: HashMap<PromptId, String>,
    failures: HashMap<PromptId, u16>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            model: "mock".to_string(),
            replies: HashMap::new(),
            failures: HashMap::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Every call fails with a 503
    pub fn failing() -> Self {
        PromptId::all()
            .iter()
            .fold(Self::new(), |mock, &id| mock.failing_on(id, 503))
    }

    /// Fail calls for one task with the given HTTP status
    pub fn failing_on(mut self, task: PromptId, status: u16) -> Self {
        self.failures.insert(task, status);
        self
    }

    /// Always answer one task with `reply`
    pub fn with_reply(mut self, task: PromptId, reply: impl Into<String>) -> Self {
        self.replies.insert(task, reply.into());
        self
    }

    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Requests received so far (shared between clones)
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(&status) = self.failures.get(&request.task) {
            return Err(Error::Upstream {
                status,
                body: "mock backend failure".to_string(),
            });
        }
        if let Some(reply) = self.replies.get(&request.task) {
            return Ok(reply.clone());
        }

        let question = question_line(&request.user);
        Ok(match request.task {
            PromptId::ExtractIntent => mock_intent(question),
            PromptId::NarrateInsights => mock_narration(question),
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

/// The text after a `Question:` label, or the whole prompt if there is none
fn question_line(prompt: &str) -> &str {
    prompt
        .lines()
        .find_map(|line| line.trim().strip_prefix("Question:"))
        .map(str::trim)
        .unwrap_or(prompt)
}

/// Keyword-based stand-in for intent extraction
fn mock_intent(question: &str) -> String {
    let lower = question.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has = |w: &str| words.contains(&w);

    let intent = if has("category") || has("categories") {
        "category_analysis"
    } else if has("compare") || has("comparison") || has("vs") || has("stores") {
        "store_comparison"
    } else if has("sales") || has("revenue") || has("report") || has("sold") {
        "sales_report"
    } else {
        "unknown"
    };

    let store = words.iter().find_map(|w| w.parse::<Store>().ok());
    let category = words.iter().find_map(|w| w.parse::<Category>().ok());

    json!({
        "intent": intent,
        "store": store.map(|s| s.as_str()),
        "category": category.map(|c| c.as_str()),
        "date_range_days": mock_days(&words),
        "metric": "sales",
    })
    .to_string()
}

/// "last 30 days", "2 weeks", "last month"
fn mock_days(words: &[&str]) -> u32 {
    for pair in words.windows(2) {
        if let Ok(n) = pair[0].parse::<u32>() {
            if pair[1].starts_with("day") {
                return n;
            }
            if pair[1].starts_with("week") {
                return n.saturating_mul(7);
            }
            if pair[1].starts_with("month") {
                return n.saturating_mul(30);
            }
        }
    }
    if words.contains(&"month") {
        30
    } else if words.contains(&"today") || words.contains(&"yesterday") {
        1
    } else {
        DEFAULT_DATE_RANGE_DAYS
    }
}

fn mock_narration(question: &str) -> String {
    format!(
        "- Mock insights for \"{}\".\n- Figures come from the data shown above.\n- Configure a real backend for narrated analysis.",
        question
    )
}

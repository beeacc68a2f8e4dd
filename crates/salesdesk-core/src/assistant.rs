//! Question answering flow
//!
//! ```text
//! question ──► extract_intent (LLM, temp 0.0) ──► decode_descriptor
//!                                                       │
//!          insights ◄── narrate (LLM, temp 0.3) ◄── DataSource::fetch
//! ```
//!
//! Every step's failure is classified and turned into a user-facing reply;
//! [`Assistant::ask`] itself never fails.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ai::{AIBackend, AIClient, CompletionRequest};
use crate::config::{AiConfig, AssistantConfig};
use crate::error::{Error, Result};
use crate::intent::{decode_descriptor, QueryDescriptor};
use crate::models::{ChartSpec, ResultTable, Summary};
use crate::prompts::{PromptId, PromptLibrary};
use crate::query::QueryResult;
use crate::source::DataSource;

/// How a failed question is reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The completion service could not be reached or refused the request
    Upstream,
    /// The model's reply could not be turned into a query
    Decode,
    /// Anything else
    Internal,
}

impl FailureKind {
    pub fn classify(error: &Error) -> Self {
        match error {
            e if e.is_upstream() => Self::Upstream,
            Error::MalformedInput(_) | Error::Json(_) => Self::Decode,
            _ => Self::Internal,
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Upstream => "The AI service is unavailable right now. Please try again in a moment.",
            Self::Decode => {
                "Sorry, I could not understand the request. Try something like \"Show last 7 days sales for Mumbai store\"."
            }
            Self::Internal => "Something went wrong while answering. Please try again.",
        }
    }
}

/// Failure attached to a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFacingError {
    pub kind: FailureKind,
    pub message: String,
    /// Underlying error text, for logs and the verbose CLI
    pub detail: String,
}

impl UserFacingError {
    pub fn from_error(error: &Error) -> Self {
        let kind = FailureKind::classify(error);
        Self {
            kind,
            message: kind.user_message().to_string(),
            detail: error.to_string(),
        }
    }
}

/// Everything produced for one question
///
/// Fields are filled as far as the flow got; `error` says where it stopped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssistantReply {
    pub question: String,
    /// Model output for intent extraction, verbatim
    pub raw_intent: Option<String>,
    pub descriptor: Option<QueryDescriptor>,
    pub summary: Option<Summary>,
    pub table: Option<ResultTable>,
    pub chart: Option<ChartSpec>,
    pub insights: Option<String>,
    pub error: Option<UserFacingError>,
}

impl AssistantReply {
    fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            ..Self::default()
        }
    }

    fn failed(mut self, error: &Error) -> Self {
        let failure = UserFacingError::from_error(error);
        warn!(kind = ?failure.kind, error = %error, "Question could not be fully answered");
        self.error = Some(failure);
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The assistant: completion backend + data source + prompts
pub struct Assistant {
    ai: AIClient,
    source: DataSource,
    prompts: Mutex<PromptLibrary>,
    intent_temperature: f32,
    narration_temperature: f32,
}

impl Assistant {
    pub fn new(ai: AIClient, source: DataSource, prompts: PromptLibrary, config: &AiConfig) -> Self {
        Self {
            ai,
            source,
            prompts: Mutex::new(prompts),
            intent_temperature: config.intent_temperature,
            narration_temperature: config.narration_temperature,
        }
    }

    /// Build from loaded config, anchoring the data window on `today`
    ///
    /// Fails when the configured backend cannot be built (missing API key).
    pub fn from_config(config: &AssistantConfig, today: NaiveDate) -> Result<Self> {
        let ai = AIClient::from_config(&config.ai)?;
        let source = DataSource::new(config.data.source, config.data.dataset.clone(), today);
        info!(
            backend = ai.kind().as_str(),
            model = ai.model(),
            data_source = source.kind().as_str(),
            "Assistant ready"
        );
        Ok(Self::new(ai, source, PromptLibrary::new(), &config.ai))
    }

    pub fn ai(&self) -> &AIClient {
        &self.ai
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Answer a question end to end
    pub async fn ask(&self, question: &str) -> AssistantReply {
        let question = question.trim();
        let mut reply = AssistantReply::new(question);
        info!(question = %question, "Answering question");

        let raw = match self.extract_intent(question).await {
            Ok(raw) => raw,
            Err(e) => return reply.failed(&e),
        };
        reply.raw_intent = Some(raw.clone());

        let descriptor = match decode_descriptor(&raw) {
            Ok(d) => d,
            Err(e) => return reply.failed(&e),
        };
        debug!(
            intent = %descriptor.intent,
            store = ?descriptor.store,
            category = ?descriptor.category,
            days = descriptor.date_range_days,
            "Decoded query"
        );
        reply.descriptor = Some(descriptor.clone());

        let result = match self.source.fetch(&descriptor) {
            Ok(r) => r,
            Err(e) => return reply.failed(&e),
        };
        reply.chart = result.table.as_ref().map(ResultTable::chart);
        reply.table = result.table.clone();
        reply.summary = Some(result.summary.clone());

        match self.narrate(question, &result).await {
            Ok(insights) => reply.insights = Some(insights),
            Err(e) => return reply.failed(&e),
        }

        reply
    }

    /// Ask the model for a query descriptor; returns its raw text
    pub async fn extract_intent(&self, question: &str) -> Result<String> {
        let today = self.source.today().to_string();
        let vars = HashMap::from([("question", question), ("today", today.as_str())]);
        let request = self.build_request(PromptId::ExtractIntent, &vars, self.intent_temperature)?;
        let raw = self.ai.complete(&request).await?;
        debug!(response = %raw, "Intent extraction response");
        Ok(raw)
    }

    /// Ask the model to narrate a query result
    pub async fn narrate(&self, question: &str, result: &QueryResult) -> Result<String> {
        let data = serde_json::to_string_pretty(&result.summary)?;
        let vars = HashMap::from([("question", question), ("data", data.as_str())]);
        let request =
            self.build_request(PromptId::NarrateInsights, &vars, self.narration_temperature)?;
        let text = self.ai.complete(&request).await?;
        Ok(crate::ai::parsing::clean_narration(&text))
    }

    fn build_request(
        &self,
        id: PromptId,
        vars: &HashMap<&str, &str>,
        temperature: f32,
    ) -> Result<CompletionRequest> {
        let mut prompts = self
            .prompts
            .lock()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let prompt = prompts.get(id)?;

        let mut request = CompletionRequest::new(id, prompt.render_user(vars), temperature);
        if let Some(system) = prompt.system_section() {
            request = request.with_system(system);
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockBackend, BackendKind};
    use crate::dataset::DatasetConfig;
    use crate::intent::Intent;
    use crate::models::Store;
    use crate::query::INTENT_NOT_RECOGNIZED;
    use crate::source::{DataSourceKind, MockSnapshotSource};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn assistant(mock: MockBackend) -> Assistant {
        Assistant::new(
            AIClient::Mock(mock),
            DataSource::new(DataSourceKind::Synthetic, DatasetConfig::default(), today()),
            PromptLibrary::embedded_only(),
            &AiConfig {
                backend: BackendKind::Mock,
                ..AiConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_ask_sales_report_end_to_end() {
        let mock = MockBackend::new();
        let assistant = assistant(mock.clone());

        let reply = assistant.ask("Show last 7 days sales for Mumbai store").await;
        assert!(reply.is_success(), "{:?}", reply.error);

        let descriptor = reply.descriptor.unwrap();
        assert_eq!(descriptor.intent, Intent::SalesReport);
        assert_eq!(descriptor.store, Some(Store::Mumbai));
        assert!(matches!(reply.summary, Some(Summary::Totals { .. })));
        assert!(reply.table.is_none());
        assert!(reply.chart.is_none());
        assert!(reply.insights.unwrap().contains("Mock insights"));

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].task, PromptId::ExtractIntent);
        assert_eq!(requests[0].temperature, 0.0);
        assert!(requests[0].user.contains("2024-06-30"));
        assert!(requests[0].system.is_some());
        assert_eq!(requests[1].task, PromptId::NarrateInsights);
        assert_eq!(requests[1].temperature, 0.3);
        assert!(requests[1].user.contains("total_sales"));
    }

    #[tokio::test]
    async fn test_ask_grouped_intent_has_chart() {
        let assistant = assistant(MockBackend::new());
        let reply = assistant.ask("Sales by category for the last 30 days").await;

        let table = reply.table.unwrap();
        let chart = reply.chart.unwrap();
        assert_eq!(chart.labels.len(), table.rows.len());
        assert_eq!(chart.x_label, "Category");
    }

    #[tokio::test]
    async fn test_upstream_failure_on_extraction() {
        let assistant = assistant(MockBackend::failing());
        let reply = assistant.ask("Show sales").await;

        let error = reply.error.unwrap();
        assert_eq!(error.kind, FailureKind::Upstream);
        assert!(error.message.contains("unavailable"));
        assert!(reply.raw_intent.is_none());
        assert!(reply.summary.is_none());
    }

    #[tokio::test]
    async fn test_decode_failure_skips_data_and_narration() {
        let mock = MockBackend::new().with_reply(PromptId::ExtractIntent, "I think you want sales.");
        let assistant = assistant(mock.clone());

        let reply = assistant.ask("Show sales").await;
        assert_eq!(reply.error.unwrap().kind, FailureKind::Decode);
        assert_eq!(reply.raw_intent.as_deref(), Some("I think you want sales."));
        assert!(reply.summary.is_none());
        assert_eq!(mock.requests().len(), 1);
        assert!(!assistant.source().sales_store().unwrap().is_loaded());
    }

    #[tokio::test]
    async fn test_unknown_store_is_decode_failure() {
        let mock = MockBackend::new().with_reply(
            PromptId::ExtractIntent,
            r#"{"intent": "sales_report", "store": "Pune"}"#,
        );
        let reply = assistant(mock).ask("Sales in Pune").await;
        assert_eq!(reply.error.unwrap().kind, FailureKind::Decode);
    }

    #[tokio::test]
    async fn test_unrecognized_intent_still_narrates() {
        let mock = MockBackend::new();
        let assistant = assistant(mock.clone());

        let reply = assistant.ask("Tell me a joke").await;
        assert!(reply.is_success());
        assert_eq!(reply.summary, Some(Summary::message(INTENT_NOT_RECOGNIZED)));
        assert!(reply.insights.is_some());
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_narration_failure_keeps_data() {
        let mock = MockBackend::new().failing_on(PromptId::NarrateInsights, 429);
        let reply = assistant(mock).ask("Compare stores").await;

        assert_eq!(reply.error.as_ref().unwrap().kind, FailureKind::Upstream);
        assert!(reply.table.is_some());
        assert!(reply.insights.is_none());
    }

    #[tokio::test]
    async fn test_mock_source_snapshot() {
        let assistant = Assistant::new(
            AIClient::mock(),
            DataSource::Mock(MockSnapshotSource::with_seed(1, today())),
            PromptLibrary::embedded_only(),
            &AiConfig::default(),
        );
        let reply = assistant.ask("Sales report for Delhi").await;
        assert!(matches!(reply.summary, Some(Summary::Snapshot { .. })));
    }

    #[test]
    fn test_failure_classification() {
        let upstream = Error::Upstream {
            status: 401,
            body: "bad key".into(),
        };
        assert_eq!(FailureKind::classify(&upstream), FailureKind::Upstream);
        assert_eq!(
            FailureKind::classify(&Error::MalformedInput("x".into())),
            FailureKind::Decode
        );
        assert_eq!(
            FailureKind::classify(&Error::Config("x".into())),
            FailureKind::Internal
        );
    }
}

//! Integration tests for salesdesk-core
//!
//! These tests exercise the full question → intent → query → narration flow
//! through the public API.

use std::time::Duration;

use chrono::NaiveDate;
use salesdesk_core::{
    query::{cutoff_date, process},
    AIClient, AiConfig, Assistant, AssistantConfig, DataSource, DataSourceKind, Dataset,
    DatasetConfig, FailureKind, Intent, MockBackend, OpenAICompatibleBackend, PromptId,
    PromptLibrary, QueryDescriptor, Store, Summary,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn assistant_with(ai: AIClient) -> Assistant {
    Assistant::new(
        ai,
        DataSource::new(DataSourceKind::Synthetic, DatasetConfig::default(), today()),
        PromptLibrary::embedded_only(),
        &AiConfig::default(),
    )
}

// =============================================================================
// Dataset + Query
// =============================================================================

#[test]
fn test_default_dataset_shape() {
    let config = AssistantConfig::from_toml("").unwrap();
    let dataset = Dataset::generate(&config.data.dataset, today());

    assert_eq!(dataset.len(), 960);
    let stats = dataset.stats();
    assert_eq!(stats.first_date, Some(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()));
    assert_eq!(stats.last_date, Some(today()));
}

#[test]
fn test_same_seed_same_answers() {
    let a = Dataset::generate(&DatasetConfig::default(), today());
    let b = Dataset::generate(&DatasetConfig::default(), today());

    let descriptor = QueryDescriptor::new(Intent::StoreComparison).with_days(21);
    assert_eq!(
        process(&descriptor, &a, today()),
        process(&descriptor, &b, today())
    );
}

#[test]
fn test_every_intent_respects_window_and_scope() {
    let dataset = Dataset::generate(&DatasetConfig::default(), today());
    let cutoff = cutoff_date(today(), 10);

    let expected: u64 = dataset
        .records()
        .iter()
        .filter(|r| r.date >= cutoff && r.store == Store::Bangalore)
        .map(|r| r.sales)
        .sum();

    for intent in [
        Intent::SalesReport,
        Intent::CategoryAnalysis,
        Intent::StoreComparison,
    ] {
        let descriptor = QueryDescriptor::new(intent.clone())
            .with_store(Store::Bangalore)
            .with_days(10);
        let result = process(&descriptor, &dataset, today());
        let total = match result.summary {
            Summary::Totals { total_sales, .. } => total_sales,
            Summary::Grouped(map) => map.values().sum(),
            other => panic!("unexpected summary for {}: {:?}", intent, other),
        };
        assert_eq!(total, expected, "{}", intent);
    }
}

// =============================================================================
// Assistant flow
// =============================================================================

#[tokio::test]
async fn test_ask_store_comparison() {
    let assistant = assistant_with(AIClient::mock());
    let reply = assistant
        .ask("Compare stores over the last 14 days")
        .await;

    assert!(reply.is_success());
    let descriptor = reply.descriptor.as_ref().unwrap();
    assert_eq!(descriptor.intent, Intent::StoreComparison);
    assert_eq!(descriptor.date_range_days, 14);

    let chart = reply.chart.as_ref().unwrap();
    assert_eq!(chart.labels, vec!["Mumbai", "Delhi", "Bangalore", "Hyderabad"]);
    assert_eq!(
        chart.values.iter().sum::<u64>(),
        reply.table.as_ref().unwrap().total()
    );

    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["descriptor"]["intent"], "store_comparison");
    assert!(json["error"].is_null());
}

#[tokio::test]
async fn test_malformed_model_reply_is_reported() {
    let mock = MockBackend::new().with_reply(
        PromptId::ExtractIntent,
        r#"{"intent": "sales_report", "date_range_days": "a while"}"#,
    );
    let reply = assistant_with(AIClient::Mock(mock)).ask("Sales lately?").await;

    let error = reply.error.unwrap();
    assert_eq!(error.kind, FailureKind::Decode);
    assert!(error.detail.contains("date_range_days"));
}

#[tokio::test]
async fn test_unreachable_service_is_upstream_failure() {
    let backend = OpenAICompatibleBackend::new("http://127.0.0.1:1", "gpt-4o-mini", Duration::from_secs(2))
        .unwrap()
        .with_api_key("sk-test");
    let reply = assistant_with(AIClient::OpenAICompatible(backend))
        .ask("Show sales")
        .await;

    let error = reply.error.unwrap();
    assert_eq!(error.kind, FailureKind::Upstream);
    assert!(reply.raw_intent.is_none());
}

#[tokio::test]
async fn test_session_survives_failures() {
    let mock = MockBackend::new().failing_on(PromptId::NarrateInsights, 500);
    let assistant = assistant_with(AIClient::Mock(mock));

    let first = assistant.ask("Sales by category").await;
    let second = assistant.ask("Sales by category").await;

    for reply in [&first, &second] {
        assert_eq!(reply.error.as_ref().unwrap().kind, FailureKind::Upstream);
    }
    // Same cached dataset both times
    assert!(first.table.is_some());
    assert_eq!(first.table, second.table);
}

//! SalesDesk Core Library
//!
//! Shared functionality for the SalesDesk retail sales assistant:
//! - Seeded synthetic sales dataset (stores x categories x days)
//! - Query processing: windowed totals and group-bys
//! - Intent decoding and validation for model output
//! - Pluggable completion backends (OpenAI-compatible, mock)
//! - Prompt library for customizable prompts
//! - The question answering flow that ties them together

pub mod ai;
pub mod assistant;
pub mod config;
pub mod dataset;
pub mod error;
pub mod intent;
pub mod models;
pub mod prompts;
pub mod query;
pub mod source;

/// Test utilities including a mock completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, BackendInfo, BackendKind, MockBackend, OpenAICompatibleBackend};
pub use assistant::{Assistant, AssistantReply, FailureKind, UserFacingError};
pub use config::{AiConfig, AssistantConfig, DataConfig};
pub use dataset::{Dataset, DatasetConfig, DatasetStats, SalesStore};
pub use error::{Error, Result};
pub use intent::{decode_descriptor, Intent, QueryDescriptor};
pub use models::{Category, ChartSpec, Dimension, ResultTable, SalesRecord, Store, Summary};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use query::QueryResult;
pub use source::{DataSource, DataSourceKind};

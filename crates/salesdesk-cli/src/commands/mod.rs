//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ask` - Single question and reply rendering
//! - `chat` - Interactive question loop
//! - `serve` - Web server command
//! - `dataset` - Synthetic dataset summary and CSV export
//! - `prompts` - Prompt library management commands
//! - `ai` - Completion backend check

pub mod ai;
pub mod ask;
pub mod chat;
pub mod dataset;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use ai::*;
pub use ask::*;
pub use chat::*;
pub use dataset::*;
pub use prompts::*;
pub use serve::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use salesdesk_core::{Assistant, AssistantConfig};

/// Build the assistant from config, with a readable error for a missing key
pub fn build_assistant(config: &AssistantConfig, today: NaiveDate) -> Result<Assistant> {
    Assistant::from_config(config, today).context(
        "Could not set up the AI backend (set OPENAI_API_KEY, or AI_BACKEND=mock for offline use)",
    )
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

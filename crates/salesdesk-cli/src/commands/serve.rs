//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use salesdesk_core::{AIBackend, Assistant};

/// Comma-separated list of extra CORS origins
const ALLOWED_ORIGINS_ENV: &str = "SALESDESK_ALLOWED_ORIGINS";

pub async fn cmd_serve(
    assistant: Assistant,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting SalesDesk web server...");
    println!(
        "   AI backend: {} (model: {})",
        assistant.ai().kind().as_str(),
        assistant.ai().model()
    );
    println!("   Data source: {}", assistant.source().kind().as_str());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let allowed_origins = parse_origins(&std::env::var(ALLOWED_ORIGINS_ENV).unwrap_or_default());
    if !allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} ({})",
            allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = salesdesk_server::ServerConfig { allowed_origins };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    salesdesk_server::serve(assistant, host, port, static_dir_str, config).await?;

    Ok(())
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

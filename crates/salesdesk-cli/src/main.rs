//! SalesDesk CLI - AI sales assistant
//!
//! Usage:
//!   salesdesk ask "Show last 7 days sales for Mumbai store"
//!   salesdesk chat                 Interactive question loop
//!   salesdesk serve --port 3000    Start the dashboard
//!   salesdesk dataset --csv out.csv

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use salesdesk_core::AssistantConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = AssistantConfig::load(cli.config.as_deref())?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Ask { question, json } => {
            let assistant = commands::build_assistant(&config, today)?;
            commands::cmd_ask(&assistant, &question.join(" "), json).await
        }
        Commands::Chat => {
            let assistant = commands::build_assistant(&config, today)?;
            let stdin = std::io::stdin();
            commands::cmd_chat(&assistant, stdin.lock(), std::io::stdout()).await
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            let assistant = commands::build_assistant(&config, today)?;
            commands::cmd_serve(assistant, &host, port, static_dir.as_deref()).await
        }
        Commands::Dataset { csv } => commands::cmd_dataset(&config, today, csv.as_deref()),
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Ai { action } => match action {
            AiAction::Test { question } => {
                let assistant = commands::build_assistant(&config, today)?;
                commands::cmd_ai_test(&assistant, question.as_deref()).await
            }
        },
    }
}

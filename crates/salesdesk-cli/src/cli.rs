//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SalesDesk - Ask questions about retail sales in plain language
#[derive(Parser)]
#[command(name = "salesdesk")]
#[command(about = "AI sales assistant for a small retail chain", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to $SALESDESK_CONFIG, then the data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a single question
    Ask {
        /// The question, e.g. "Show last 7 days sales for Mumbai store"
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Print the full reply as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive question loop (type "exit" to quit)
    Chat,

    /// Start the dashboard web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Serve the dashboard from this directory instead of the embedded page
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show the synthetic dataset (optionally export it)
    Dataset {
        /// Write all records to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Manage prompt templates
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Completion backend commands
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List prompts and their override status
    List,

    /// Show a prompt's content
    Show {
        /// Prompt ID (extract_intent, narrate_insights)
        id: String,
    },

    /// Print the override directory
    Path,
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Check the backend and run a sample intent extraction
    Test {
        /// Question to extract an intent from
        #[arg(short, long)]
        question: Option<String>,
    },
}

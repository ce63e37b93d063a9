//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Recap - meeting summaries with bounded retries and a quality gate
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(about = "Generate, store, and serve meeting summaries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file overlaid on the bundled defaults
    #[arg(long, global = true, env = "RECAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind, overriding `server.bind`
        #[arg(long)]
        bind: Option<String>,

        /// Register a resource before serving, as RESOURCE_ID=OWNER (repeatable)
        #[arg(long = "seed", value_name = "RESOURCE_ID=OWNER")]
        seeds: Vec<String>,
    },

    /// Summarize one transcript and print the response envelope
    Summarize {
        /// Meeting to summarize
        #[arg(long)]
        resource_id: String,

        /// Transcript text
        #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
        content: Option<String>,

        /// File holding the transcript
        #[arg(long)]
        content_file: Option<PathBuf>,

        /// Generate without storing
        #[arg(long)]
        dry_run: bool,

        /// Requester identity
        #[arg(long, env = "RECAP_REQUESTER", default_value = "cli")]
        requester: String,
    },

    /// Print the stored summary for a meeting
    Show {
        /// Meeting to look up
        #[arg(long)]
        resource_id: String,

        /// Requester identity
        #[arg(long, env = "RECAP_REQUESTER", default_value = "cli")]
        requester: String,
    },

    /// Record the owner of a meeting
    Register {
        /// Meeting identifier
        #[arg(long)]
        resource_id: String,

        /// Owner identity
        #[arg(long)]
        owner: String,

        /// Optional meeting title
        #[arg(long)]
        title: Option<String>,
    },
}

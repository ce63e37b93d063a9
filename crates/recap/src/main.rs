//! Recap CLI binary.
//!
//! This binary provides command-line access to Recap:
//! - Serve the HTTP API
//! - Summarize a transcript from the command line
//! - Show or register stored meetings

use clap::Parser;
use recap::RecapConfig;
use recap::observability::{ObservabilityConfig, init_observability_with_config};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, handle_register_command, handle_serve_command, handle_show_command,
        handle_summarize_command,
    };

    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut observability = ObservabilityConfig::new("recap").with_json_logs(cli.json_logs);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability_with_config(observability)?;

    let config = match &cli.config {
        Some(path) => RecapConfig::from_file(path)?,
        None => RecapConfig::load()?,
    };

    // Execute the requested command
    match cli.command {
        Commands::Serve { bind, seeds } => {
            handle_serve_command(&config, bind, &seeds).await?;
        }

        Commands::Summarize {
            resource_id,
            content,
            content_file,
            dry_run,
            requester,
        } => {
            let succeeded = handle_summarize_command(
                &config,
                &resource_id,
                content,
                content_file,
                dry_run,
                &requester,
            )
            .await?;
            if !succeeded {
                std::process::exit(1);
            }
        }

        Commands::Show {
            resource_id,
            requester,
        } => {
            handle_show_command(&config, &resource_id, &requester).await?;
        }

        Commands::Register {
            resource_id,
            owner,
            title,
        } => {
            handle_register_command(&config, &resource_id, &owner, title.as_deref()).await?;
        }
    }

    Ok(())
}

//! One-shot command handlers.

use recap::{
    Backends, InternalError, RecapConfig, RecapResult, StorageBackend, SummaryRequest,
    build_summarizer, driver_from_config,
};
use std::path::PathBuf;

/// Handle the `summarize` command.
///
/// With the in-memory backend nothing survives between runs, so the
/// requester is registered as the meeting's owner first.
pub async fn handle_summarize_command(
    config: &RecapConfig,
    resource_id: &str,
    content: Option<String>,
    content_file: Option<PathBuf>,
    dry_run: bool,
    requester: &str,
) -> RecapResult<bool> {
    let content = match (content, content_file) {
        (Some(content), _) => content,
        (None, Some(path)) => tokio::fs::read_to_string(&path).await.map_err(|e| {
            InternalError::new(format!("Failed to read {}: {}", path.display(), e))
        })?,
        (None, None) => String::new(),
    };

    let backends = Backends::connect(&config.database).await?;
    if backends.backend() == StorageBackend::Memory {
        backends.register(resource_id, requester, None).await?;
    }

    let driver = driver_from_config(&config.completion)?;
    let summarizer = build_summarizer(config, driver, &backends);

    let request = SummaryRequest::new(resource_id, content, dry_run);
    let response = summarizer.handle(&request, Some(requester)).await;
    print_json(&response)?;
    Ok(response.is_success())
}

/// Handle the `show` command.
pub async fn handle_show_command(
    config: &RecapConfig,
    resource_id: &str,
    requester: &str,
) -> RecapResult<()> {
    let backends = Backends::connect(&config.database).await?;
    let driver = driver_from_config(&config.completion)?;
    let summarizer = build_summarizer(config, driver, &backends);

    let summary = summarizer
        .stored_summary(resource_id, Some(requester))
        .await?;
    print_json(&summary)
}

/// Handle the `register` command.
pub async fn handle_register_command(
    config: &RecapConfig,
    resource_id: &str,
    owner: &str,
    title: Option<&str>,
) -> RecapResult<()> {
    let backends = Backends::connect(&config.database).await?;
    if backends.backend() == StorageBackend::Memory {
        tracing::warn!("In-memory backend: the registration ends with this process");
    }
    backends.register(resource_id, owner, title).await?;
    println!("Registered {} for {}", resource_id, owner);
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> RecapResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| InternalError::new(format!("Failed to render JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

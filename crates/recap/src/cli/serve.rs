//! `serve` command handler.

use recap::{
    ApiState, Backends, ConfigError, RecapConfig, RecapResult, build_summarizer,
    driver_from_config, serve,
};
use std::sync::Arc;

/// Handle the `serve` command.
pub async fn handle_serve_command(
    config: &RecapConfig,
    bind: Option<String>,
    seeds: &[String],
) -> RecapResult<()> {
    tracing::info!("Starting Recap API");

    let backends = Backends::connect(&config.database).await?;
    for seed in seeds {
        let (resource_id, owner) = seed.split_once('=').ok_or_else(|| {
            ConfigError::new(format!("Seed '{}' is not RESOURCE_ID=OWNER", seed))
        })?;
        backends.register(resource_id, owner, None).await?;
    }

    let driver = driver_from_config(&config.completion)?;
    let summarizer = build_summarizer(config, driver, &backends);
    let state = ApiState::new(Arc::new(summarizer), &config.server.identity_header)?;

    let addr = bind.unwrap_or_else(|| config.server.bind.clone());
    tracing::info!("Recap API starting. Press Ctrl+C to stop.");
    serve(&addr, state).await
}

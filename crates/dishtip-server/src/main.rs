mod config;
mod error;
mod http;
mod server;
mod service;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dishtip_core::inference::OpenAiInference;
use dishtip_core::openai::OpenAiClient;
use dishtip_core::pipeline::Pipeline;
use dishtip_core::rate_limit::RateLimiter;

use config::Config;
use server::DishTipServer;
use service::RecommendationService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting dishtip server");

    let config = Config::from_env()?;
    info!(
        base_url = %config.openai.base_url,
        model = %config.model,
        max_words = config.pipeline.max_words,
        max_in_flight = config.pipeline.max_in_flight.get(),
        cache_capacity = config.pipeline.cache_capacity.get(),
        "configuration loaded"
    );

    let limiter = RateLimiter::from_env();
    if let Some(limiter) = &limiter {
        info!(rps = limiter.rps(), "inference rate limiting enabled");
    }

    let client = OpenAiClient::new(config.openai.clone())?;
    let inference = OpenAiInference::new(client, config.model.clone(), config.max_tokens)
        .with_rate_limiter(limiter);
    info!(model = %inference.model(), max_tokens = config.max_tokens, "inference client ready");
    let pipeline = Pipeline::from_config(Arc::new(inference), &config.pipeline);
    let service = Arc::new(RecommendationService::new(pipeline));

    if let Some(addr) = config.http_listen_addr.as_deref() {
        http::serve(addr, service).await?;
    } else {
        info!("MCP server ready, serving on stdio");
        let service = DishTipServer::new(service)
            .serve(stdio())
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, "MCP server error");
            })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}

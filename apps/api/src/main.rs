use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use screener::config::Config;
use screener::llm_client::{self, LlmClient};
use screener::matching::enhancement::EnhancementAdapter;
use screener::routes::build_router;
use screener::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener API v{}", env!("CARGO_PKG_VERSION"));

    // Enhancement is optional; without a key every match is heuristic-only.
    let enhancer = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!(
                "LLM enhancement enabled (model: {}, timeout: {:?})",
                llm_client::MODEL,
                config.enhancement_timeout
            );
            Some(EnhancementAdapter::new(
                Arc::new(llm),
                config.enhancement_timeout,
            ))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set, enhancement disabled");
            None
        }
    };

    let state = AppState::new(config.clone(), enhancer);

    // Forget clients that have gone quiet.
    let limiter = Arc::clone(&state.rate_limiter);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(limiter.window().max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            limiter.prune();
        }
    });

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// src/main.rs

use std::{sync::Arc, time::Duration};

use exam_room::{
    config::Config,
    engine::{
        leaderboard::Leaderboard,
        notifier::TracingNotifier,
        provider::{Catalog, CatalogProvider},
    },
    routes,
    services::attempts::AttemptService,
    state::AppState,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from .env (if present) and the environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "exam-room.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Load the exam catalog
    let catalog = match &config.exam_catalog {
        Some(path) => {
            tracing::info!("Loading exam catalog from {}", path.display());
            Catalog::load(path).await?
        }
        None => {
            tracing::info!("EXAM_CATALOG not set, using the bundled demo catalog");
            Catalog::demo()?
        }
    };

    let leaderboard = Arc::new(Leaderboard::new());
    for (exam_id, entries) in catalog.leaderboards {
        tracing::debug!("Seeding {} leaderboard rows for {}", entries.len(), exam_id);
        leaderboard.seed(&exam_id, entries).await;
    }
    let provider = Arc::new(CatalogProvider::new(catalog.exams)?);

    // Create AppState
    let attempts = AttemptService::new(
        provider,
        leaderboard,
        Arc::new(TracingNotifier),
        config.submit_policy,
    )
    .with_retention(Duration::from_secs(config.attempt_retention_seconds));
    tracing::info!(
        "Submit policy: {:?}, finished attempts kept for {}s",
        config.submit_policy,
        config.attempt_retention_seconds
    );

    let state = AppState {
        attempts,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
    }
}

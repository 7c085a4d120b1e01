//! Sentimeter Server
//!
//! Sentiment analysis API: classifies short feedback texts as positive or
//! negative, stores every prediction, and serves listing, filtering,
//! deletion and aggregate statistics over the stored feedback.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sentimeter_classifiers::SentimentAnalyzer;
use sentimeter_server::cli::{Cli, Commands};
use sentimeter_server::{build_app, AppState, ServerConfig};
use sentimeter_store::FeedbackStore;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_logs);

    let config = ServerConfig::load(&cli.config)?.apply_cli(&cli);
    info!("Configuration loaded");
    info!("Database: {}", config.database.redacted_url());

    match cli.command() {
        Commands::InitDb => init_db(&config).await,
        Commands::Serve { .. } => serve(config).await,
    }
}

async fn init_db(config: &ServerConfig) -> Result<()> {
    let store = FeedbackStore::connect(&config.database).await?;
    store.migrate().await?;
    store.close().await;

    info!("Database initialized");
    Ok(())
}

async fn serve(config: ServerConfig) -> Result<()> {
    info!("Starting Sentimeter server");

    let metrics_handle = init_metrics()?;

    // Model loading reads and maps files; keep it off the async workers
    let classifier_config = config.classifier.clone();
    let analyzer =
        tokio::task::spawn_blocking(move || SentimentAnalyzer::load(&classifier_config)).await??;
    info!("Classifier mode: {}", analyzer.mode());

    let store = FeedbackStore::connect(&config.database).await?;
    store.migrate().await?;

    let state = AppState::new(analyzer, store.clone()).with_metrics(metrics_handle);
    let app = build_app(state, &config.server.api_prefix);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Listening on http://{} (API under {})",
        addr, config.server.api_prefix
    );

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentimeter=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sentimeter=info,tower_http=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "sentimeter_predictions_total",
        "Predictions served, by sentiment and classifier mode"
    );
    metrics::describe_counter!(
        "sentimeter_fallback_total",
        "Times the keyword heuristic replaced the model, by reason"
    );
    metrics::describe_histogram!(
        "sentimeter_inference_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds"
    );
    metrics::describe_counter!(
        "sentimeter_store_errors_total",
        "Failed feedback store operations, by operation"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

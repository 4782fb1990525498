//! Gás do Povo Proxy
//!
//! Serves the lookup API, or runs a single lookup/classification from the
//! command line.

use anyhow::{Context, Result};
use clap::Parser;
use gasdopovo_classifier::ResponseClassifier;
use gasdopovo_proxy::cli::{Cli, Commands};
use gasdopovo_proxy::config::ProxyConfig;
use gasdopovo_proxy::proxy::{self, AppState};
use gasdopovo_proxy::routes;
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Read;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config = ProxyConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");

    match &cli.command {
        None | Some(Commands::Serve { .. }) => serve(config).await,
        Some(Commands::Query { cpf }) => query(config, cpf).await,
        Some(Commands::Classify { path }) => classify(config, path),
    }
}

async fn serve(config: ProxyConfig) -> Result<()> {
    info!("Starting Gás do Povo proxy");

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let state = AppState::new(config, Some(metrics_handle))?;
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn query(config: ProxyConfig, cpf: &str) -> Result<()> {
    let state = AppState::new(config, None)?;
    let outcome = proxy::execute_lookup(&state, cpf).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn classify(config: ProxyConfig, path: &str) -> Result<()> {
    let html = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
    };

    let classifier: ResponseClassifier = ResponseClassifier::new(config.markers)?;
    let detailed = classifier.classify_detailed(&html);
    info!(
        rule = detailed.rule.map_or("none", |r| r.name()),
        latency_us = detailed.latency_us,
        "Classified {}",
        path
    );

    println!("{}", serde_json::to_string_pretty(&detailed.outcome)?);
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
///
/// Logs go to stderr so `query` and `classify` output stays clean JSON.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("gasdopovo=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gasdopovo=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "gasdopovo_requests_total",
        "Total number of lookup requests received"
    );
    metrics::describe_counter!(
        "gasdopovo_outcomes_total",
        "Classified lookups by outcome status"
    );
    metrics::describe_counter!(
        "gasdopovo_upstream_errors_total",
        "Lookups that failed to reach the upstream"
    );
    metrics::describe_histogram!(
        "gasdopovo_upstream_latency_us",
        metrics::Unit::Microseconds,
        "Upstream round-trip latency in microseconds"
    );
    metrics::describe_histogram!(
        "gasdopovo_classify_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

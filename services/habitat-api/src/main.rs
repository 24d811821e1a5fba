//! Habitat API Server
//!
//! Serves gridded ocean layers, point predictions and habitat zones from a
//! directory of pre-processed files.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use habitat_api::config::{cors_layer, parse_cors_origins};
use habitat_api::state::AppState;

/// Habitat API Server
#[derive(Parser, Debug)]
#[command(name = "habitat-api")]
#[command(about = "Gridded ocean and habitat suitability data server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "HABITAT_LISTEN_ADDR")]
    listen: String,

    /// Directory holding metadata.json and the processed layers
    #[arg(short, long, default_value = "processed_data", env = "HABITAT_DATA_DIR")]
    data_dir: String,

    /// Allowed CORS origins, comma-separated ("*" for any)
    #[arg(long, default_value = "*", env = "CORS_ALLOW_ORIGINS")]
    cors_origins: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "HABITAT_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting habitat API server");

    let state = Arc::new(AppState::new(&args.data_dir, Some(prometheus_handle))?);

    let origins = parse_cors_origins(&args.cors_origins);
    let cors = cors_layer(&origins)?;
    info!(origins = ?origins, "CORS configured");

    // Build router
    let app = habitat_api::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!(address = %addr, data_dir = %args.data_dir, "Habitat API listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}

//! Linked-Data API server.
//!
//! Serves geological entities under alternate profiles with content
//! negotiation by profile.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use ld_api::routes::router;
use ld_api::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "ld-api")]
#[command(about = "Linked-data API for geological entities with content negotiation by profile")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8084", env = "LD_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of Tokio worker threads (defaults to number of CPU cores)
    #[arg(long, env = "LD_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Directory holding profiles.yaml, collections.yaml and collection data
    #[arg(long, default_value = "config/ld", env = "LD_CONFIG_DIR")]
    config_dir: String,

    /// Base URL for building links
    #[arg(long, default_value = "http://localhost:8084", env = "LD_BASE_URL")]
    base_url: String,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

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
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    info!(config_dir = %args.config_dir, "Starting linked-data API server");

    let state = match AppState::load(&args.config_dir, &args.base_url) {
        Ok(state) => Arc::new(state.with_metrics(prometheus_handle)),
        Err(e) => {
            error!("Failed to initialize application state: {:#}", e);
            return Err(e);
        }
    };

    let app = router(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Linked-data API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}

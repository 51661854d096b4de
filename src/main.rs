//! Insights API Server
//!
//! Run with: cargo run --bin insights
//!
//! # Configuration
//!
//! Settings come from `--config`, else the first of
//! `~/.config/insights/config.toml`, `/etc/insights/config.toml`,
//! `./config.toml`, else defaults. `INSIGHTS_*` environment variables
//! override the file, and command-line flags override both.
//!
//! `RUST_LOG` takes precedence over the configured log level.

use anyhow::Context;
use clap::Parser;
use insights::api::{serve, AppState};
use insights::config::{Config, LoggingConfig};
use insights::dashboard::Dashboard;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "insights")]
#[command(about = "Marketing analytics dashboard server", long_about = None)]
#[command(version)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Start with live updates switched on
    #[arg(long)]
    live: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting Insights API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        tick_interval_ms = config.simulation.tick_interval_ms,
        page_size = config.table.page_size,
        theme = %config.ui.theme,
        "Dashboard settings"
    );

    let dashboard = Arc::new(Dashboard::new(config.dashboard_settings()));
    if args.live || config.simulation.live_on_start {
        dashboard.set_live(true).await;
    }

    let state = AppState::new(
        Arc::clone(&dashboard),
        (&config.export).into(),
        config.api.clone(),
    );

    serve(state, &config.api).await?;

    Ok(())
}

/// Install the global subscriber: pretty for development, JSON for
/// production
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("insights={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

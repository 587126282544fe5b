//! NIFTY Box Spread Arbitrage Scanner
//!
//! Main entry point. Serves the dashboard: every page load fetches the
//! option chain, scans for box spreads and alerts on new opportunities.
//!
//! Modes:
//! - default: HTTP server on 0.0.0.0:10000
//! - `--once`: run a single cycle, log the ranked table and exit
//! - `--snapshot-file`: replay a saved NSE JSON response instead of the live feed
//!
//! Supports hot-reloading of the TOML config via SIGHUP:
//!   kill -HUP $(pgrep nifty-boxarb)

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use nifty_boxarb::alerts::AlertDispatcher;
use nifty_boxarb::chain::{FileSnapshotSource, NseClient, SnapshotSource};
use nifty_boxarb::config::{load_config, load_config_from_file};
use nifty_boxarb::market_hours::MarketHours;
use nifty_boxarb::service::BoxScanService;
use nifty_boxarb::toml_config::TomlConfig;
use nifty_boxarb::web;
use signal_hook::consts::SIGHUP;
use signal_hook_tokio::Signals;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Box spread arbitrage scanner for the NSE NIFTY option chain
#[derive(Parser)]
#[command(name = "nifty-boxarb")]
struct Args {
    /// Address to bind the dashboard on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind the dashboard on
    #[arg(short, long, env = "PORT", default_value_t = 10000)]
    port: u16,

    /// .env file to load instead of ./.env
    #[arg(long, env = "ENV_FILE")]
    env_file: Option<String>,

    /// TOML file with scanner thresholds and market hours
    #[arg(short, long, env = "BOXARB_CONFIG")]
    config: Option<PathBuf>,

    /// Read the option chain from a saved JSON snapshot
    #[arg(long, env = "SNAPSHOT_FILE")]
    snapshot_file: Option<PathBuf>,

    /// Scan regardless of the exchange session window
    #[arg(long)]
    ignore_market_hours: bool,

    /// Run one cycle, print the results and exit
    #[arg(long)]
    once: bool,
}

fn load_toml(args: &Args) -> Result<TomlConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let config = TomlConfig::load(path)?;
            info!("Scanner config loaded from {}", path.display());
            config
        }
        None => TomlConfig::default(),
    };
    if args.ignore_market_hours {
        config.market_hours = MarketHours::always_open();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    info!("===========================================");
    info!("   NIFTY Box Spread Arbitrage Scanner");
    info!("===========================================");

    let bot_config = match &args.env_file {
        Some(path) => load_config_from_file(path)?,
        None => load_config()?,
    };
    info!("Symbol: {}", bot_config.symbol);
    info!(
        "Fetch policy: {} attempts, {}ms between attempts",
        bot_config.fetch_attempts, bot_config.fetch_retry_delay_ms
    );

    let toml_config = load_toml(&args)?;
    info!(
        "Scanner: top {} | min OI {} | alert above ₹{} | window ±{} step {}",
        toml_config.scanner.top_n,
        toml_config.scanner.min_open_interest,
        toml_config.scanner.alert_profit_threshold,
        toml_config.scanner.strike_window,
        toml_config.scanner.strike_step
    );

    let source: Arc<dyn SnapshotSource> = match &args.snapshot_file {
        Some(path) => Arc::new(FileSnapshotSource::new(path)),
        None => Arc::new(NseClient::new(&bot_config).context("Failed to build NSE HTTP client")?),
    };
    info!("Option chain source: {}", source.describe());

    let dispatcher = AlertDispatcher::from_config(&bot_config);
    let service = Arc::new(BoxScanService::new(source, dispatcher, toml_config));

    if args.once {
        let report = service.run_cycle().await;
        info!("{:?} at {}", report.status, report.timestamp);
        for (rank, b) in report.boxes.iter().enumerate() {
            info!("#{:<2} {}", rank + 1, b);
        }
        return Ok(());
    }

    // SIGHUP reloads the TOML config into the running service
    let mut signals = Signals::new([SIGHUP])?;
    let reload_service = Arc::clone(&service);
    let reload_args_config = args.config.clone();
    let ignore_hours = args.ignore_market_hours;
    tokio::spawn(async move {
        while let Some(sig) = signals.next().await {
            if sig != SIGHUP {
                continue;
            }
            let Some(path) = &reload_args_config else {
                warn!("Received SIGHUP but no --config file was given - nothing to reload");
                continue;
            };
            info!("Received SIGHUP - reloading {}", path.display());
            match TomlConfig::load(path) {
                Ok(mut config) => {
                    if ignore_hours {
                        config.market_hours = MarketHours::always_open();
                    }
                    reload_service.reload(config).await;
                }
                Err(e) => error!("Config reload failed, keeping current settings: {:#}", e),
            }
        }
    });

    let app = web::router(service);
    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 Dashboard listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

//! Status aggregator daemon.
//!
//! Polls every configured backend's health surface on a fixed interval and
//! serves the consolidated view to the dashboard.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                 STATUS AGGREGATOR                     │
//!                    │                                                       │
//!                    │  ┌───────────┐   tick   ┌──────────────────────────┐ │
//!                    │  │ scheduler │─────────▶│        aggregator        │ │
//!                    │  └───────────┘          │  ┌──────┐   ┌──────────┐ │ │      processor
//!                    │                         │  │probe │──▶│normalize │ │◀┼───── log indexer
//!                    │                         │  │ x N  │   └────┬─────┘ │ │      log generator
//!                    │                         │  └──────┘        ▼       │ │
//!                    │                         │   merge → derive → publish│ │
//!                    │                         └────────────┬─────────────┘ │
//!                    │                                      │ Arc<Snapshot>  │
//!     Dashboard      │  ┌─────────────────┐                 ▼                │
//!     ◀──────────────┼──│ http API + ws   │◀──────── SnapshotStore           │
//!                    │  └─────────────────┘                                  │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use status_aggregator::aggregator::{Aggregator, Scheduler};
use status_aggregator::config::{load_config, DashboardConfig};
use status_aggregator::http::{ApiServer, AppState};
use status_aggregator::lifecycle::{until_signal_or_exit, wait_for_signal, Shutdown};
use status_aggregator::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "status-aggregator")]
#[command(about = "Aggregates backend health into one dashboard view", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Built-in defaults are used otherwise.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,

    /// Run a single cycle, print the snapshot as JSON and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => DashboardConfig::default(),
    };

    let level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level);
    logging::init(level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        services = config.services.len(),
        interval_ms = config.scheduler.interval_ms,
        "status-aggregator starting"
    );

    let mut aggregator = Aggregator::from_config(&config);

    if args.once {
        let snapshot = aggregator.run_cycle().await;
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let state = AppState {
        store: aggregator.store(),
        capture: aggregator.capture(),
    };

    let listener = TcpListener::bind(&config.api.bind_address).await?;

    let mut scheduler = Scheduler::new(aggregator);
    scheduler.start(config.scheduler.interval())?;

    let shutdown = Shutdown::new();
    let server = ApiServer::new(&config.api, state);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let exited = until_signal_or_exit(wait_for_signal(), &mut server_task).await;
    if exited.is_some() {
        tracing::error!("Snapshot API exited before shutdown was requested");
    }

    scheduler.shutdown().await;
    shutdown.trigger();
    match exited {
        Some(joined) => joined??,
        None => server_task.await??,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

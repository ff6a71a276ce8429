mod config;
mod logging;
mod signals;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use pnode_aggregator::AggregatorModule;
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// pNode network monitor
#[derive(Parser)]
#[command(name = "pnode-monitor")]
#[command(about = "Aggregates pNode fleet status and serves it over REST")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity (-v debug, -vv trace); `RUST_LOG` takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print the effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API (default)
    Serve {
        /// Port override for the HTTP listener
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one aggregation cycle and print the view as JSON
    Pods {
        /// Bypass the cache (always polls)
        #[arg(long)]
        refresh: bool,
    },
    /// Query a seed for one node's stats
    Stats {
        /// Node address, `host:port`
        address: String,
    },
    /// List pods known to the seed endpoints
    Seeds,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { port: None });

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Commands::Serve { port } = &command {
        config.apply_cli_overrides(*port);
    }

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    logging::init(&config.logging, cli.verbose)?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "pnode-monitor starting");

    match command {
        Commands::Serve { .. } => serve(&config).await,
        Commands::Pods { refresh } => pods(&config, refresh).await,
        Commands::Stats { address } => stats(&config, &address).await,
        Commands::Seeds => seeds(&config).await,
        Commands::Check => check(&config),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn serve(config: &AppConfig) -> Result<()> {
    let module = AggregatorModule::from_config(&config.aggregator)?;
    let cancel = CancellationToken::new();
    let sweeper = module.spawn_background(cancel.clone());

    let addr = config.server.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "HTTP server listening");

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = signals::wait_for_shutdown().await {
                tracing::error!(error = %e, "signal handling failed");
            }
            cancel.cancel();
        }
    });

    let shutdown = {
        let cancel = cancel.clone();
        async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully");
        }
    };

    let served = axum::serve(listener, module.router())
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed");

    cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "cache sweeper task ended abnormally");
    }
    served
}

async fn pods(config: &AppConfig, refresh: bool) -> Result<()> {
    let service = AggregatorModule::from_config(&config.aggregator)?.service();
    let view = if refresh {
        service.force_refresh().await
    } else {
        service.get_current_view().await
    };
    print_json(view.as_slice())
}

async fn stats(config: &AppConfig, address: &str) -> Result<()> {
    let client = AggregatorModule::from_config(&config.aggregator)?.client();
    let stats = client.node_stats(address).await?;
    print_json(&stats)
}

async fn seeds(config: &AppConfig) -> Result<()> {
    let client = AggregatorModule::from_config(&config.aggregator)?.client();
    let listing = client.seed_pods().await?;
    print_json(&listing)
}

fn check(config: &AppConfig) -> Result<()> {
    AggregatorModule::from_config(&config.aggregator)?;
    tracing::info!("configuration is valid");
    println!("Configuration is valid");
    Ok(())
}

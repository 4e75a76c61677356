use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crossforge::config::Config;
use crossforge::models::Platform;

mod commands;

#[derive(Parser)]
#[command(
    name = "crossforge",
    version,
    about = "Cross-platform content analytics with scheduled collection, trend detection and AI insights",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler and the dashboard API until Ctrl-C
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch platform data once
    Fetch {
        /// Platform to fetch (youtube, x, linkedin); all when omitted
        #[arg(short, long)]
        platform: Option<Platform>,
    },

    /// Generate insights once
    Insights,

    /// Show the trend of a metric
    Trend {
        /// Platform (youtube, x, linkedin)
        platform: Platform,

        /// Metric name (views, impressions, followers, engagement)
        metric: String,

        /// Window in days
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// List anomalous points of a metric
    Anomalies {
        /// Platform (youtube, x, linkedin)
        platform: Platform,

        /// Metric name
        metric: String,

        /// Window in days
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Compare engagement and growth across platforms
    Compare {
        /// Window in days
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// List registered background tasks
    Tasks,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());

    // Initialize tracing/logging
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "CrossForge starting");

    match cli.command {
        Commands::Serve { host, port } => {
            tracing::info!(host = ?host, port = ?port, "Starting serve command");
            commands::serve(config, host, port).await?;
        }

        Commands::Fetch { platform } => {
            tracing::info!(platform = ?platform, "Starting fetch command");
            commands::fetch(config, platform).await?;
        }

        Commands::Insights => {
            tracing::info!("Starting insights command");
            commands::insights(config).await?;
        }

        Commands::Trend {
            platform,
            metric,
            days,
        } => {
            tracing::info!(platform = %platform, metric = %metric, days = ?days, "Starting trend command");
            commands::trend(config, platform, metric, days).await?;
        }

        Commands::Anomalies {
            platform,
            metric,
            days,
        } => {
            tracing::info!(platform = %platform, metric = %metric, days = ?days, "Starting anomalies command");
            commands::anomalies(config, platform, metric, days).await?;
        }

        Commands::Compare { days } => {
            tracing::info!(days = ?days, "Starting compare command");
            commands::compare(config, days).await?;
        }

        Commands::Tasks => {
            commands::tasks(config).await?;
        }
    }

    tracing::info!("CrossForge completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("crossforge=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("crossforge={level},warn"))?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

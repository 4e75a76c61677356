use anyhow::Result;

use crossforge::api::{self, AppState};
use crossforge::config::Config;
use crossforge::metrics;

use super::bootstrap;

/// Run the scheduler and the dashboard API until Ctrl-C
pub async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    if let Err(e) = metrics::init_metrics() {
        tracing::warn!(error = %e, "Metrics disabled");
    }

    let app = bootstrap(&config).await?;

    if app.llm.is_available().await {
        tracing::info!(model = %app.llm.model(), "LLM endpoint reachable");
    } else {
        tracing::warn!(
            endpoint = %config.llm.endpoint,
            "LLM endpoint unreachable; insight runs will fail until it is up"
        );
    }

    let addr = config.server_addr();
    println!("Starting CrossForge");
    println!("===================");
    println!("  API: http://{addr}");
    println!("  Database: {}", config.database.sqlite_path.display());
    println!("  Fetch interval: {:?}", config.fetch_interval());
    println!("  Insight interval: {:?}", config.insight_interval());
    println!();

    app.scheduler.start().await;

    let state = AppState::new(app.store.clone(), app.scheduler.clone(), &config);
    let served = api::serve(state, &addr, shutdown_signal()).await;

    tracing::info!("Stopping scheduler");
    app.scheduler.stop().await;

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    tracing::info!("Shutdown signal received");
}

pub mod analyze;
pub mod fetch;
pub mod serve;
pub mod tasks;

use anyhow::{Context, Result};
use std::sync::Arc;

use crossforge::config::Config;
use crossforge::llm::LlmClient;
use crossforge::platforms::build_clients;
use crossforge::scheduler::{register_default_tasks, JobDependencies, Scheduler};
use crossforge::storage::{create_sqlite_store, SharedStore};

// Re-export command functions for convenience
pub use analyze::{anomalies, compare, trend};
pub use fetch::{fetch, insights};
pub use serve::serve;
pub use tasks::tasks;

/// Store, scheduler and LLM client wired from configuration
pub struct App {
    pub store: SharedStore,
    pub scheduler: Arc<Scheduler>,
    pub llm: Arc<LlmClient>,
}

/// Open the store only; analysis commands need nothing else
pub fn open_store(config: &Config) -> Result<SharedStore> {
    create_sqlite_store(&config.database.sqlite_path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database.sqlite_path.display()
        )
    })
}

/// Build the full runtime with the default tasks registered
pub async fn bootstrap(config: &Config) -> Result<App> {
    let store = open_store(config)?;

    let clients = build_clients(config).context("Failed to create platform clients")?;
    for client in &clients {
        if !client.is_configured() {
            tracing::warn!(
                platform = %client.platform(),
                "Credentials not configured; fetch task will fail until they are set"
            );
        }
    }

    let llm = Arc::new(LlmClient::with_config(config.llm.clone())?);
    let scheduler = Arc::new(Scheduler::new());

    register_default_tasks(
        &scheduler,
        JobDependencies {
            store: Arc::clone(&store),
            clients,
            generator: llm.clone(),
            config: Arc::new(config.clone()),
        },
    )
    .await?;

    Ok(App {
        store,
        scheduler,
        llm,
    })
}

use anyhow::Result;

use crossforge::config::Config;

use super::bootstrap;

/// List the tasks `serve` would schedule
pub async fn tasks(config: Config) -> Result<()> {
    let app = bootstrap(&config).await?;
    let tasks = app.scheduler.get_tasks().await;

    println!("Registered tasks: {}", tasks.len());
    for task in tasks {
        println!("  {:<20} every {:?}", task.name, task.interval);
    }
    Ok(())
}

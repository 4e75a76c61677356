use anyhow::Result;

use crossforge::config::Config;
use crossforge::models::Platform;
use crossforge::scheduler::{task_name_for, INSIGHT_TASK_NAME};
use crossforge::storage::Store;

use super::bootstrap;

/// Run the fetch task of one platform, or of every platform, once
pub async fn fetch(config: Config, platform: Option<Platform>) -> Result<()> {
    let app = bootstrap(&config).await?;
    let platforms = match platform {
        Some(p) => vec![p],
        None => Platform::ALL.to_vec(),
    };

    println!("Fetching platform data");
    println!("======================");

    let mut failed = 0usize;
    for platform in platforms {
        let task = task_name_for(platform);
        match app.scheduler.run_task_now(&task).await {
            Ok(()) => {
                let followers = app
                    .store
                    .get_latest_account_stats(platform)
                    .await?
                    .map(|s| s.followers())
                    .unwrap_or(0);
                println!(
                    "  {:<9} ok     followers: {followers}",
                    platform.display_name()
                );
            }
            Err(e) => {
                failed += 1;
                println!("  {:<9} failed {e}", platform.display_name());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} fetch task(s) failed");
    }
    Ok(())
}

/// Run the insight task once and print what it produced
pub async fn insights(config: Config) -> Result<()> {
    let app = bootstrap(&config).await?;
    let result = app.scheduler.run_task_now(INSIGHT_TASK_NAME).await;

    let recent = app
        .store
        .get_recent_insights(config.dashboard.recent_insights_limit)
        .await?;

    println!("Recent insights");
    println!("===============");
    for insight in &recent {
        let scope = insight
            .platform
            .map(|p| p.display_name())
            .unwrap_or("All platforms");
        println!(
            "\n[{}] {} ({scope}, confidence {:.2})",
            insight.insight_type.as_str(),
            insight.title,
            insight.confidence
        );
        println!("{}", insight.description);
    }

    result?;
    Ok(())
}

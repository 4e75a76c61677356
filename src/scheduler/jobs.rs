//! Fetch and insight jobs
//!
//! The scheduler only knows opaque closures. This module builds them from the
//! store, the platform clients and the insight generator, and registers the
//! default set:
//!
//! | Task | Interval | Work |
//! |------|----------|------|
//! | `fetch-youtube` / `fetch-x` / `fetch-linkedin` | `fetch_interval` | snapshot, persist, record metric points |
//! | `generate-insights` | `insight_interval` | LLM summary plus anomaly insights |

use std::sync::Arc;

use chrono::Utc;

use super::error::SchedulerResult;
use super::runner::Scheduler;
use crate::analytics::{Anomaly, AnomalySeverity, TrendAnalyzer};
use crate::config::Config;
use crate::error::{CrossforgeErrorTrait, Result};
use crate::llm::{build_analytics_prompt, InsightGenerator};
use crate::metrics;
use crate::models::{
    AccountStats, DataPoint, DateRange, Insight, InsightType, Platform, METRIC_ENGAGEMENT,
    METRIC_FOLLOWERS,
};
use crate::platforms::{PlatformClient, SharedClient};
use crate::storage::{SharedStore, Store};

/// Prefix of the per-platform fetch task names
pub const FETCH_TASK_PREFIX: &str = "fetch-";

/// Name of the insight generation task
pub const INSIGHT_TASK_NAME: &str = "generate-insights";

/// Confidence attached to LLM-written summaries
const SUMMARY_CONFIDENCE: f64 = 0.8;

/// Fetch task name for `platform`, e.g. `fetch-youtube`
pub fn task_name_for(platform: Platform) -> String {
    format!("{FETCH_TASK_PREFIX}{platform}")
}

/// Everything the default jobs need
#[derive(Clone)]
pub struct JobDependencies {
    pub store: SharedStore,
    pub clients: Vec<SharedClient>,
    pub generator: Arc<dyn InsightGenerator>,
    pub config: Arc<Config>,
}

// ============================================================================
// Fetch job
// ============================================================================

/// Outcome of one platform fetch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchReport {
    pub platform: Platform,
    pub items: usize,
    pub followers: u64,
}

/// Pull one snapshot from `client` and persist it
///
/// Saves the account stats and every content item, then appends one point
/// each for followers, the platform's primary metric and the engagement rate.
pub async fn fetch_platform(
    client: &dyn PlatformClient,
    store: &dyn Store,
    max_items: usize,
) -> Result<FetchReport> {
    let platform = client.platform();
    let snapshot = client.fetch_snapshot(max_items).await?;

    store.save_account_stats(&snapshot.stats).await?;
    store.save_content(&snapshot.content).await?;

    let summary = snapshot.content.summary();
    let followers = snapshot.stats.followers();
    let reach = match &snapshot.stats {
        AccountStats::YouTube(channel) => channel.view_count,
        AccountStats::X(_) | AccountStats::LinkedIn(_) => summary.impressions,
    };

    let now = Utc::now();
    store
        .record_metric(platform, METRIC_FOLLOWERS, DataPoint::new(now, followers as f64))
        .await?;
    store
        .record_metric(platform, platform.primary_metric(), DataPoint::new(now, reach as f64))
        .await?;
    store
        .record_metric(
            platform,
            METRIC_ENGAGEMENT,
            DataPoint::new(now, summary.engagement_rate()),
        )
        .await?;

    metrics::record_items_fetched(platform.as_str(), snapshot.content.len());
    tracing::info!(
        platform = %platform,
        items = snapshot.content.len(),
        followers,
        "Fetched platform snapshot"
    );

    Ok(FetchReport {
        platform,
        items: snapshot.content.len(),
        followers,
    })
}

// ============================================================================
// Insight job
// ============================================================================

fn anomaly_confidence(severity: AnomalySeverity) -> f64 {
    match severity {
        AnomalySeverity::High => 0.9,
        AnomalySeverity::Medium => 0.75,
        AnomalySeverity::Low => 0.6,
    }
}

/// Statistically derived insight describing the anomalies of one metric
pub fn anomaly_insight(
    platform: Platform,
    metric: &str,
    anomalies: &[Anomaly],
    range: DateRange,
) -> Option<Insight> {
    let worst = anomalies.iter().max_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    })?;

    let title = format!(
        "{} {} {}",
        platform.display_name(),
        metric,
        if anomalies.len() == 1 { "anomaly" } else { "anomalies" }
    );
    let description = format!(
        "{} unusual {} value(s) detected. Most severe: {} of {:.2} on {} (expected {:.2} to {:.2}).",
        anomalies.len(),
        metric,
        worst.kind.as_str(),
        worst.value,
        worst.timestamp.format("%Y-%m-%d %H:%M UTC"),
        worst.expected_min,
        worst.expected_max,
    );

    Some(Insight::new(
        Some(platform),
        InsightType::Anomaly,
        title,
        description,
        anomaly_confidence(worst.severity),
        range,
    ))
}

/// Generate and persist insights for the trailing `window_days`
///
/// Anomaly insights are saved even when the language model fails; the model
/// error is returned afterwards so the run is reported as failed.
pub async fn generate_insights(
    store: &SharedStore,
    generator: &dyn InsightGenerator,
    window_days: u32,
) -> Result<Vec<Insight>> {
    let range = DateRange::last_days(window_days)?;
    let analyzer = TrendAnalyzer::new(Arc::clone(store));
    let mut saved = Vec::new();

    let summary = store.get_analytics_summary(&range).await?;
    let llm_error = match generator
        .generate_insight(&build_analytics_prompt(&summary))
        .await
    {
        Ok(text) => {
            let insight = Insight::new(
                None,
                InsightType::Summary,
                "Analytics Overview",
                text,
                SUMMARY_CONFIDENCE,
                range,
            );
            store.save_insight(&insight).await?;
            saved.push(insight);
            None
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                category = %e.category(),
                "Insight generator failed; continuing with anomaly insights"
            );
            Some(e)
        }
    };

    for platform in Platform::ALL {
        let metric = platform.primary_metric();
        let anomalies = analyzer
            .detect_anomalies(platform, metric, window_days)
            .await?;
        if let Some(insight) = anomaly_insight(platform, metric, &anomalies, range) {
            store.save_insight(&insight).await?;
            saved.push(insight);
        }
    }

    tracing::info!(count = saved.len(), window_days, "Generated insights");

    match llm_error {
        Some(e) => Err(e),
        None => Ok(saved),
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Register one fetch task per client and the insight task
pub async fn register_default_tasks(
    scheduler: &Scheduler,
    deps: JobDependencies,
) -> SchedulerResult<()> {
    let fetch_interval = deps.config.fetch_interval();
    let max_items = deps.config.scheduler.max_items_per_fetch;

    for client in &deps.clients {
        let client = Arc::clone(client);
        let store = Arc::clone(&deps.store);
        let name = task_name_for(client.platform());

        scheduler
            .add_task(name, fetch_interval, move |_ctx| {
                let client = Arc::clone(&client);
                let store = Arc::clone(&store);
                async move {
                    fetch_platform(client.as_ref(), store.as_ref(), max_items).await?;
                    Ok(())
                }
            })
            .await?;
    }

    let store = Arc::clone(&deps.store);
    let generator = Arc::clone(&deps.generator);
    let window_days = deps.config.scheduler.insight_window_days;

    scheduler
        .add_task(INSIGHT_TASK_NAME, deps.config.insight_interval(), move |_ctx| {
            let store = Arc::clone(&store);
            let generator = Arc::clone(&generator);
            async move {
                generate_insights(&store, generator.as_ref(), window_days).await?;
                Ok(())
            }
        })
        .await?;

    tracing::debug!(
        fetch_tasks = deps.clients.len(),
        fetch_interval_secs = fetch_interval.as_secs(),
        "Registered default tasks"
    );
    Ok(())
}

use anyhow::Result;

use crossforge::analytics::{Aggregator, AggregatorLimits, TrendAnalyzer};
use crossforge::config::Config;
use crossforge::models::Platform;

use super::open_store;

fn window(config: &Config, days: Option<u32>) -> Result<u32> {
    match days {
        Some(0) => anyhow::bail!("--days must be greater than 0"),
        Some(days) => Ok(days),
        None => Ok(config.dashboard.default_window_days),
    }
}

/// Print the trend of one metric
pub async fn trend(
    config: Config,
    platform: Platform,
    metric: String,
    days: Option<u32>,
) -> Result<()> {
    let days = window(&config, days)?;
    let analyzer = TrendAnalyzer::new(open_store(&config)?);

    println!("{} {metric} over {days} days", platform.display_name());
    match analyzer.analyze_trend(platform, &metric, days).await? {
        Some(trend) => {
            println!("  Points: {}", trend.points().len());
            println!("  Trend: {} ({:+.2}%)", trend.trend(), trend.change_percent());
            if let Some(latest) = trend.latest_value() {
                println!("  Latest: {latest:.2}");
            }
        }
        None => println!("  Not enough data (need at least 2 points)"),
    }
    Ok(())
}

/// Print anomalous points of one metric
pub async fn anomalies(
    config: Config,
    platform: Platform,
    metric: String,
    days: Option<u32>,
) -> Result<()> {
    let days = window(&config, days)?;
    let analyzer = TrendAnalyzer::new(open_store(&config)?);
    let anomalies = analyzer.detect_anomalies(platform, &metric, days).await?;

    println!(
        "{} {metric} anomalies over {days} days: {}",
        platform.display_name(),
        anomalies.len()
    );
    for anomaly in &anomalies {
        println!(
            "  {}  {:<5} {:<6} {:>12.2}  expected {:.2} to {:.2}",
            anomaly.timestamp.format("%Y-%m-%d %H:%M"),
            anomaly.kind.as_str(),
            anomaly.severity.as_str(),
            anomaly.value,
            anomaly.expected_min,
            anomaly.expected_max
        );
    }
    Ok(())
}

/// Print the cross-platform comparison
pub async fn compare(config: Config, days: Option<u32>) -> Result<()> {
    let days = window(&config, days)?;
    let limits = AggregatorLimits {
        recent_insights: config.dashboard.recent_insights_limit,
        top_content: config.dashboard.top_content_limit,
        ..AggregatorLimits::default()
    };
    let aggregator = Aggregator::with_limits(open_store(&config)?, limits);
    let comparison = aggregator.compare_platforms(days).await?;

    println!("Platform comparison ({days} days)");
    println!("==========================");
    println!("{:<10} {:>12} {:>12} {:>8}", "Platform", "Engagement", "Growth", "Trend");
    for platform in Platform::ALL {
        println!(
            "{:<10} {:>11.2}% {:>11.2}% {:>8}",
            platform.display_name(),
            comparison.engagement_rates.get(platform) * 100.0,
            comparison.growth_rates.get(platform),
            comparison.growth_trends.get(platform).as_str()
        );
    }
    println!(
        "\nBest performing: {}",
        comparison.best_performing.display_name()
    );

    if !comparison.recommendations.is_empty() {
        println!("\nRecommendations");
        println!("---------------");
        for recommendation in &comparison.recommendations {
            println!("  - {recommendation}");
        }
    }
    Ok(())
}

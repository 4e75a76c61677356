//! Dashboard, per-platform and cross-platform views
//!
//! The aggregator combines the store's summaries and content listings with
//! trends from [`TrendAnalyzer`] and the latest insights.

use serde::Serialize;

use super::trends::{TrendAnalyzer, TrendData, TrendDirection};
use crate::error::Result;
use crate::models::{
    engagement_rate, AnalyticsSummary, DateRange, Insight, Platform, PlatformContent,
    PlatformMap, PlatformSummary, METRIC_FOLLOWERS,
};
use crate::storage::SharedStore;

/// Engagement below this share of the best platform's rate triggers a recommendation
const UNDERPERFORMING_RATIO: f64 = 0.5;

/// Limits applied to dashboard listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorLimits {
    pub recent_insights: usize,
    pub top_content: usize,
    /// Platform view: insights per platform
    pub platform_insights: usize,
    /// Platform view: content items per platform
    pub platform_content: usize,
}

impl Default for AggregatorLimits {
    fn default() -> Self {
        Self {
            recent_insights: 5,
            top_content: 5,
            platform_insights: 10,
            platform_content: 50,
        }
    }
}

/// Everything the main dashboard shows
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub summary: AnalyticsSummary,
    pub recent_insights: Vec<Insight>,
    /// Trend of each platform's primary metric; `None` with too little data
    pub trends: PlatformMap<Option<TrendData>>,
    /// Best performing content per platform, by interactions
    pub top_content: PlatformMap<PlatformContent>,
}

/// Detailed view of one platform
#[derive(Debug, Clone, Serialize)]
pub struct PlatformAnalytics {
    pub platform: Platform,
    pub summary: PlatformSummary,
    pub engagement_rate: f64,
    /// Trends of the platform's key metrics that have enough data
    pub trends: Vec<TrendData>,
    pub content: PlatformContent,
    pub insights: Vec<Insight>,
}

/// Cross-platform performance comparison
#[derive(Debug, Clone, Serialize)]
pub struct PlatformComparison {
    pub date_range: DateRange,
    pub best_performing: Platform,
    pub engagement_rates: PlatformMap<f64>,
    /// Percent change of follower count across the window; 0 without data
    pub growth_rates: PlatformMap<f64>,
    pub growth_trends: PlatformMap<TrendDirection>,
    pub recommendations: Vec<String>,
}

/// Composes analytics views from the store and the trend analyzer
#[derive(Clone)]
pub struct Aggregator {
    store: SharedStore,
    analyzer: TrendAnalyzer,
    limits: AggregatorLimits,
}

impl Aggregator {
    pub fn new(store: SharedStore) -> Self {
        Self::with_limits(store, AggregatorLimits::default())
    }

    pub fn with_limits(store: SharedStore, limits: AggregatorLimits) -> Self {
        Self {
            analyzer: TrendAnalyzer::new(store.clone()),
            store,
            limits,
        }
    }

    pub fn analyzer(&self) -> &TrendAnalyzer {
        &self.analyzer
    }

    /// Summary, recent insights, primary-metric trends and top content
    pub async fn get_dashboard_data(&self, window_days: u32) -> Result<DashboardData> {
        let range = DateRange::last_days(window_days)?;
        let summary = self.store.get_analytics_summary(&range).await?;
        let recent_insights = self
            .store
            .get_recent_insights(self.limits.recent_insights)
            .await?;

        let mut trends = PlatformMap::<Option<TrendData>>::default();
        let mut top_content = PlatformMap::from_fn(PlatformContent::empty);
        for platform in Platform::ALL {
            let trend = self
                .analyzer
                .analyze_trend(platform, platform.primary_metric(), window_days)
                .await?;
            trends.set(platform, trend);

            let content = self
                .store
                .get_content_by_date_range(platform, &range)
                .await?;
            top_content.set(platform, content.top_by_engagement(self.limits.top_content));
        }

        Ok(DashboardData {
            summary,
            recent_insights,
            trends,
            top_content,
        })
    }

    /// Summary, key-metric trends, content and insights of one platform
    pub async fn get_platform_analytics(
        &self,
        platform: Platform,
        window_days: u32,
    ) -> Result<PlatformAnalytics> {
        let range = DateRange::last_days(window_days)?;
        let summary = self
            .store
            .get_analytics_summary(&range)
            .await?
            .platform(platform)
            .clone();

        let mut trends = Vec::new();
        for metric in platform.key_metrics() {
            if let Some(trend) = self
                .analyzer
                .analyze_trend(platform, metric, window_days)
                .await?
            {
                trends.push(trend);
            }
        }

        let content = self.store.get_content(platform, self.limits.platform_content).await?;
        let insights = self
            .store
            .get_insights(platform, self.limits.platform_insights)
            .await?;

        Ok(PlatformAnalytics {
            platform,
            engagement_rate: summary.engagement_rate(),
            summary,
            trends,
            content,
            insights,
        })
    }

    /// Engagement and follower growth side by side, with recommendations
    pub async fn compare_platforms(&self, window_days: u32) -> Result<PlatformComparison> {
        let range = DateRange::last_days(window_days)?;
        let summary = self.store.get_analytics_summary(&range).await?;

        let engagement_rates = PlatformMap::from_fn(|p| {
            let s = summary.platform(p);
            engagement_rate(s.interactions(), s.impressions)
        });

        let mut growth_rates = PlatformMap::<f64>::default();
        let mut growth_trends = PlatformMap::from_fn(|_| TrendDirection::Stable);
        for platform in Platform::ALL {
            if let Some(trend) = self
                .analyzer
                .analyze_trend(platform, METRIC_FOLLOWERS, window_days)
                .await?
            {
                growth_rates.set(platform, trend.change_percent());
                growth_trends.set(platform, trend.trend());
            }
        }

        let best_performing = best_platform(&engagement_rates);
        let recommendations = recommendations(
            &summary,
            &engagement_rates,
            &growth_rates,
            best_performing,
            window_days,
        );

        Ok(PlatformComparison {
            date_range: range,
            best_performing,
            engagement_rates,
            growth_rates,
            growth_trends,
            recommendations,
        })
    }
}

/// Highest rate wins; ties go to the platform earliest in enum order
pub fn best_platform(rates: &PlatformMap<f64>) -> Platform {
    let mut best = Platform::ALL[0];
    for (platform, rate) in rates.iter() {
        if *rate > *rates.get(best) {
            best = platform;
        }
    }
    best
}

fn recommendations(
    summary: &AnalyticsSummary,
    rates: &PlatformMap<f64>,
    growth: &PlatformMap<f64>,
    best: Platform,
    window_days: u32,
) -> Vec<String> {
    let best_rate = *rates.get(best);
    let mut out = Vec::new();

    for platform in Platform::ALL {
        let s = summary.platform(platform);
        let rate = *rates.get(platform);
        if s.content_count == 0 {
            out.push(format!(
                "No {} content published in the last {} days. Post regularly to keep the audience engaged.",
                platform.display_name(),
                window_days
            ));
        } else if platform != best && best_rate > 0.0 && rate < best_rate * UNDERPERFORMING_RATIO {
            out.push(format!(
                "{} engagement ({:.2}%) trails {} ({:.2}%). Try repurposing your best {} formats.",
                platform.display_name(),
                rate * 100.0,
                best.display_name(),
                best_rate * 100.0,
                best.display_name()
            ));
        }

        let change = *growth.get(platform);
        if change < 0.0 {
            out.push(format!(
                "{} followers fell {:.2}% over the last {} days. Review recent posts for what drove unfollows.",
                platform.display_name(),
                change.abs(),
                window_days
            ));
        }
    }

    out
}

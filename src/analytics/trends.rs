//! Metric trend classification and statistical anomaly detection
//!
//! This module provides functionality for:
//! - Classifying a metric series as up / down / stable over a trailing window
//! - Flagging points that fall outside a two-sigma band
//! - Comparing a metric between two periods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::Result;
use crate::models::{DataPoint, DateRange, Platform};
use crate::storage::SharedStore;

/// Percent change beyond which a series counts as moving
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Minimum number of points for anomaly detection
pub const MIN_ANOMALY_POINTS: usize = 7;

/// Width of the expected band, in standard deviations
pub const ANOMALY_SIGMA: f64 = 2.0;

const MEDIUM_SIGMA: f64 = 2.5;
const HIGH_SIGMA: f64 = 3.0;

/// Trend direction indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    /// Classify a percent change
    ///
    /// # Classification
    /// - `change > 5`: Up
    /// - `change < -5`: Down
    /// - otherwise (including exactly ±5): Stable
    #[must_use]
    pub fn from_change_percent(change: f64) -> Self {
        if change > TREND_THRESHOLD_PERCENT {
            Self::Up
        } else if change < -TREND_THRESHOLD_PERCENT {
            Self::Down
        } else {
            Self::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percent change from `first` to `last` and its classification
///
/// A zero baseline counts as +100% when the series grew and 0% otherwise.
/// The percentage is rounded to two decimals before it is classified, so the
/// direction always agrees with the returned value.
pub fn calculate_change(first: f64, last: f64) -> (TrendDirection, f64) {
    if first == 0.0 {
        return if last > 0.0 {
            (TrendDirection::Up, 100.0)
        } else {
            (TrendDirection::Stable, 0.0)
        };
    }

    let change = round2((last - first) / first * 100.0);
    (TrendDirection::from_change_percent(change), change)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Metric series with its derived trend
///
/// Only constructible from points, so the direction and change always match
/// the series they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendData {
    platform: Platform,
    metric: String,
    points: Vec<DataPoint>,
    trend: TrendDirection,
    change_percent: f64,
}

impl TrendData {
    /// Derive a trend from points in timestamp order
    ///
    /// Returns `None` for fewer than two points.
    pub fn from_points(
        platform: Platform,
        metric: impl Into<String>,
        points: Vec<DataPoint>,
    ) -> Option<Self> {
        let (first, last) = match points.as_slice() {
            [first, .., last] => (first.value, last.value),
            _ => return None,
        };
        let (trend, change_percent) = calculate_change(first, last);

        Some(Self {
            platform,
            metric: metric.into(),
            points,
            trend,
            change_percent,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn trend(&self) -> TrendDirection {
        self.trend
    }

    pub fn change_percent(&self) -> f64 {
        self.change_percent
    }

    pub fn latest_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }
}

/// Direction of an anomalous point relative to the mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spike => "spike",
            Self::Drop => "drop",
        }
    }
}

/// Severity band of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

impl AnomalySeverity {
    /// Classify a deviation given the series standard deviation
    pub fn from_deviation(deviation: f64, std_dev: f64) -> Self {
        if deviation > HIGH_SIGMA * std_dev {
            Self::High
        } else if deviation > MEDIUM_SIGMA * std_dev {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A point outside the expected band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub expected_min: f64,
    pub expected_max: f64,
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
}

/// Flag points deviating more than two population standard deviations from the mean
///
/// Needs at least [`MIN_ANOMALY_POINTS`] points; fewer yields no anomalies.
/// Output keeps the input order.
pub fn detect_anomalies_in_points(points: &[DataPoint]) -> Vec<Anomaly> {
    if points.len() < MIN_ANOMALY_POINTS {
        return Vec::new();
    }

    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let mean = values.iter().mean();
    let std_dev = values.iter().population_std_dev();
    let band = ANOMALY_SIGMA * std_dev;

    points
        .iter()
        .filter_map(|p| {
            let deviation = (p.value - mean).abs();
            if deviation <= band {
                return None;
            }
            Some(Anomaly {
                timestamp: p.timestamp,
                value: p.value,
                expected_min: mean - band,
                expected_max: mean + band,
                kind: if p.value > mean {
                    AnomalyKind::Spike
                } else {
                    AnomalyKind::Drop
                },
                severity: AnomalySeverity::from_deviation(deviation, std_dev),
            })
        })
        .collect()
}

/// Metric compared between a baseline period and a later period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub platform: Platform,
    pub metric: String,
    pub period_a: DateRange,
    pub period_b: DateRange,
    /// Mean of the points in `period_a`, 0 when empty
    pub value_a: f64,
    /// Mean of the points in `period_b`, 0 when empty
    pub value_b: f64,
    pub change: f64,
    pub change_percent: f64,
    pub trend: TrendDirection,
}

impl PeriodComparison {
    /// Compare two already-aggregated period values
    pub fn new(
        platform: Platform,
        metric: impl Into<String>,
        period_a: DateRange,
        period_b: DateRange,
        value_a: f64,
        value_b: f64,
    ) -> Self {
        let (trend, change_percent) = calculate_change(value_a, value_b);
        Self {
            platform,
            metric: metric.into(),
            period_a,
            period_b,
            value_a,
            value_b,
            change: value_b - value_a,
            change_percent,
            trend,
        }
    }
}

/// Representative value of a period: the mean of its points
fn period_value(points: &[DataPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.value).mean()
}

/// Reads metric series from the store and derives trends from them
///
/// Stateless apart from the store handle; safe to share between callers.
#[derive(Clone)]
pub struct TrendAnalyzer {
    store: SharedStore,
}

impl TrendAnalyzer {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Trend of `metric` over the trailing `window_days`
    ///
    /// `Ok(None)` when fewer than two points exist. Storage errors propagate.
    pub async fn analyze_trend(
        &self,
        platform: Platform,
        metric: &str,
        window_days: u32,
    ) -> Result<Option<TrendData>> {
        let points = self
            .store
            .get_trend_data(platform, metric, window_days)
            .await?;
        Ok(TrendData::from_points(platform, metric, points))
    }

    /// Anomalous points of `metric` over the trailing `window_days`
    pub async fn detect_anomalies(
        &self,
        platform: Platform,
        metric: &str,
        window_days: u32,
    ) -> Result<Vec<Anomaly>> {
        let points = self
            .store
            .get_trend_data(platform, metric, window_days)
            .await?;
        let anomalies = detect_anomalies_in_points(&points);

        for anomaly in &anomalies {
            crate::metrics::record_anomaly(platform.as_str(), anomaly.severity.as_str());
        }
        if !anomalies.is_empty() {
            tracing::debug!(
                platform = %platform,
                metric,
                count = anomalies.len(),
                "Anomalies detected"
            );
        }
        Ok(anomalies)
    }

    /// Compare `metric` between `period_a` (baseline) and `period_b`
    pub async fn compare_periods(
        &self,
        platform: Platform,
        metric: &str,
        period_a: &DateRange,
        period_b: &DateRange,
    ) -> Result<PeriodComparison> {
        let points_a = self
            .store
            .get_metric_points(platform, metric, period_a)
            .await?;
        let points_b = self
            .store
            .get_metric_points(platform, metric, period_b)
            .await?;

        Ok(PeriodComparison::new(
            platform,
            metric,
            *period_a,
            *period_b,
            period_value(&points_a),
            period_value(&points_b),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, Store};
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn series(values: &[f64]) -> Vec<DataPoint> {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DataPoint::new(start + Duration::days(i as i64), *v))
            .collect()
    }

    #[test]
    fn test_fewer_than_two_points_is_absent() {
        assert!(TrendData::from_points(Platform::X, "impressions", vec![]).is_none());
        assert!(TrendData::from_points(Platform::X, "impressions", series(&[4.0])).is_none());
    }

    #[test]
    fn test_zero_baseline() {
        assert_eq!(calculate_change(0.0, 0.0), (TrendDirection::Stable, 0.0));
        assert_eq!(calculate_change(0.0, 5.0), (TrendDirection::Up, 100.0));
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(calculate_change(100.0, 105.0), (TrendDirection::Stable, 5.0));
        assert_eq!(calculate_change(100.0, 105.01).0, TrendDirection::Up);
        assert_eq!(calculate_change(100.0, 94.99).0, TrendDirection::Down);
        assert_eq!(calculate_change(100.0, 95.0), (TrendDirection::Stable, -5.0));
    }

    #[test]
    fn test_direction_follows_rounded_change() {
        assert_eq!(calculate_change(100.0, 105.004), (TrendDirection::Stable, 5.0));
        assert_eq!(calculate_change(100.0, 94.996), (TrendDirection::Stable, -5.0));
        assert_eq!(calculate_change(100.0, 105.006), (TrendDirection::Up, 5.01));
    }

    #[test]
    fn test_change_rounded_to_two_decimals() {
        let (_, change) = calculate_change(3.0, 4.0);
        assert_eq!(change, 33.33);
    }

    #[test]
    fn test_trend_uses_first_and_last_points_only() {
        let trend =
            TrendData::from_points(Platform::YouTube, "views", series(&[10.0, 500.0, 0.0, 20.0]))
                .unwrap();
        assert_eq!(trend.trend(), TrendDirection::Up);
        assert_eq!(trend.change_percent(), 100.0);
        assert_eq!(trend.points().len(), 4);
        assert_eq!(trend.latest_value(), Some(20.0));
    }

    #[test]
    fn test_anomalies_need_seven_points() {
        assert!(detect_anomalies_in_points(&series(&[1.0, 1.0, 1.0, 1.0, 1.0, 100.0])).is_empty());
    }

    #[test]
    fn test_single_spike_flagged() {
        let points = series(&[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 100.0]);
        let anomalies = detect_anomalies_in_points(&points);

        assert_eq!(anomalies.len(), 1);
        let spike = &anomalies[0];
        assert_eq!(spike.value, 100.0);
        assert_eq!(spike.kind, AnomalyKind::Spike);
        assert_eq!(spike.timestamp, points[6].timestamp);

        // mean = 160/7, population sigma = sqrt(6942.857/7) ~ 31.49
        let mean = 160.0 / 7.0;
        let sigma = (values_sq_dev(&points, mean) / 7.0).sqrt();
        assert!((spike.expected_max - (mean + 2.0 * sigma)).abs() < 1e-9);
        assert!((spike.expected_min - (mean - 2.0 * sigma)).abs() < 1e-9);
        // deviation is ~2.45 sigma
        assert_eq!(spike.severity, AnomalySeverity::Low);
    }

    fn values_sq_dev(points: &[DataPoint], mean: f64) -> f64 {
        points.iter().map(|p| (p.value - mean).powi(2)).sum()
    }

    #[test]
    fn test_drop_and_high_severity() {
        let mut values = vec![50.0; 20];
        values[12] = 0.0;
        let anomalies = detect_anomalies_in_points(&series(&values));

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::Drop);
        assert_eq!(anomalies[0].severity, AnomalySeverity::High);
    }

    #[test]
    fn test_constant_series_has_no_anomalies() {
        assert!(detect_anomalies_in_points(&series(&[3.0; 10])).is_empty());
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(AnomalySeverity::from_deviation(2.2, 1.0), AnomalySeverity::Low);
        assert_eq!(AnomalySeverity::from_deviation(2.7, 1.0), AnomalySeverity::Medium);
        assert_eq!(AnomalySeverity::from_deviation(3.5, 1.0), AnomalySeverity::High);
        assert_eq!(AnomalySeverity::from_deviation(3.0, 1.0), AnomalySeverity::Medium);
    }

    #[tokio::test]
    async fn test_analyzer_reads_trailing_window() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        for (days_ago, value) in [(3, 200.0), (2, 220.0), (1, 260.0)] {
            store
                .record_metric(
                    Platform::X,
                    "impressions",
                    DataPoint::new(now - Duration::days(days_ago), value),
                )
                .await
                .unwrap();
        }

        let analyzer = TrendAnalyzer::new(store);
        let trend = analyzer
            .analyze_trend(Platform::X, "impressions", 7)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trend.trend(), TrendDirection::Up);
        assert_eq!(trend.change_percent(), 30.0);

        assert!(analyzer
            .analyze_trend(Platform::YouTube, "views", 7)
            .await
            .unwrap()
            .is_none());
        assert!(analyzer
            .detect_anomalies(Platform::X, "impressions", 7)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_compare_periods_uses_period_means() {
        let store = Arc::new(MemoryStore::new());
        let points = series(&[10.0, 20.0, 30.0, 40.0]);
        for p in &points {
            store
                .record_metric(Platform::LinkedIn, "followers", *p)
                .await
                .unwrap();
        }

        let analyzer = TrendAnalyzer::new(store);
        let a = DateRange::new(points[0].timestamp, points[1].timestamp);
        let b = DateRange::new(points[2].timestamp, points[3].timestamp);
        let cmp = analyzer
            .compare_periods(Platform::LinkedIn, "followers", &a, &b)
            .await
            .unwrap();

        assert_eq!(cmp.value_a, 15.0);
        assert_eq!(cmp.value_b, 35.0);
        assert_eq!(cmp.change, 20.0);
        assert_eq!(cmp.change_percent, 133.33);
        assert_eq!(cmp.trend, TrendDirection::Up);

        let empty = DateRange::new(
            points[0].timestamp - Duration::days(30),
            points[0].timestamp - Duration::days(20),
        );
        let cmp = analyzer
            .compare_periods(Platform::LinkedIn, "followers", &empty, &b)
            .await
            .unwrap();
        assert_eq!(cmp.value_a, 0.0);
        assert_eq!(cmp.change_percent, 100.0);
    }
}

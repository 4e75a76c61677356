//! Analytics engine: metric trends, anomalies and cross-platform views

pub mod aggregator;
pub mod trends;

pub use aggregator::{
    best_platform, Aggregator, AggregatorLimits, DashboardData, PlatformAnalytics,
    PlatformComparison,
};
pub use trends::{
    calculate_change, detect_anomalies_in_points, Anomaly, AnomalyKind, AnomalySeverity,
    PeriodComparison, TrendAnalyzer, TrendData, TrendDirection,
};

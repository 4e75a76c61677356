//! crossforge - Cross-platform content analytics
//!
//! Collects engagement metrics from YouTube, X and LinkedIn on a schedule,
//! stores them in SQLite, and derives trends, anomalies, cross-platform
//! comparisons and LLM-written insights from the stored series.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and types
//! - [`storage`] - The [`storage::Store`] trait with SQLite and in-memory backends
//! - [`platforms`] - Platform API clients
//! - [`analytics`] - Trend and anomaly detection, dashboard aggregation
//! - [`llm`] - Ollama client for insight text
//! - [`scheduler`] - Periodic task runner and the fetch / insight jobs
//! - [`api`] - JSON dashboard API
//! - [`metrics`] - Prometheus metrics
//!
//! # Example
//!
//! ```no_run
//! use crossforge::analytics::TrendAnalyzer;
//! use crossforge::storage::create_sqlite_store;
//! use crossforge::models::Platform;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = create_sqlite_store("./data/crossforge.db")?;
//!     let analyzer = TrendAnalyzer::new(store);
//!     if let Some(trend) = analyzer.analyze_trend(Platform::YouTube, "views", 30).await? {
//!         println!("{} ({:+.2}%)", trend.trend(), trend.change_percent());
//!     }
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod platforms;
pub mod scheduler;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{Aggregator, TrendAnalyzer, TrendData, TrendDirection};
    pub use crate::config::Config;
    pub use crate::error::{CrossforgeErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{DataPoint, DateRange, Insight, Platform};
    pub use crate::scheduler::Scheduler;
    pub use crate::storage::{SharedStore, Store};
}

// Direct re-exports for convenience
pub use models::{DataPoint, DateRange, Platform};

//! JSON dashboard API
//!
//! Read-only analytics endpoints over the [`Aggregator`] and
//! [`TrendAnalyzer`](crate::analytics::TrendAnalyzer), plus task listing and
//! on-demand task runs through the [`Scheduler`].
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/dashboard?days=` | dashboard view |
//! | `GET /api/platforms/{platform}?days=` | platform detail |
//! | `GET /api/compare?days=` | cross-platform comparison |
//! | `GET /api/trends/{platform}/{metric}?days=` | metric trend |
//! | `GET /api/anomalies/{platform}/{metric}?days=` | metric anomalies |
//! | `GET /api/insights?platform=&limit=` | stored insights |
//! | `GET /api/tasks` | registered tasks |
//! | `POST /api/tasks/{name}/run` | run a task now |
//! | `GET /health` | liveness |
//! | `GET /metrics` | Prometheus text format |

mod handlers;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::analytics::{Aggregator, AggregatorLimits};
use crate::config::Config;
use crate::scheduler::Scheduler;
use crate::storage::SharedStore;

pub use handlers::{ApiResponse, ErrorResponse, HealthResponse};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub aggregator: Aggregator,
    pub scheduler: Arc<Scheduler>,
    /// Window used when a request has no `days` parameter
    pub default_window_days: u32,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: SharedStore, scheduler: Arc<Scheduler>, config: &Config) -> Self {
        let limits = AggregatorLimits {
            recent_insights: config.dashboard.recent_insights_limit,
            top_content: config.dashboard.top_content_limit,
            ..AggregatorLimits::default()
        };

        Self {
            aggregator: Aggregator::with_limits(Arc::clone(&store), limits),
            store,
            scheduler,
            default_window_days: config.dashboard.default_window_days,
            start_time: Instant::now(),
        }
    }
}

/// Build the API router with tracing and permissive CORS
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        // Analytics
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/platforms/{platform}", get(handlers::platform_analytics))
        .route("/api/compare", get(handlers::compare))
        .route("/api/trends/{platform}/{metric}", get(handlers::trend))
        .route("/api/anomalies/{platform}/{metric}", get(handlers::anomalies))
        .route("/api/insights", get(handlers::insights))
        // Scheduler
        .route("/api/tasks", get(handlers::list_tasks))
        .route("/api/tasks/{name}/run", post(handlers::run_task))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the API on `addr` until `shutdown` resolves
pub async fn serve(
    state: AppState,
    addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!(addr = %addr, "Dashboard API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    tracing::info!("Dashboard API shutdown complete");
    Ok(())
}

//! Request handlers for the dashboard API

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::{CrossforgeErrorTrait, Error};
use crate::models::Platform;
use crate::scheduler::SchedulerError;
use crate::storage::Store;

/// Insights returned when the request has no `limit`
const DEFAULT_INSIGHT_LIMIT: usize = 20;

// ============================================================================
// Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub scheduler_running: bool,
}

/// Handler error mapped to a status code
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Scheduler(SchedulerError::TaskNotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %err, category = %err.category(), "Request failed");
        }

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

// ============================================================================
// Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct WindowQuery {
    days: Option<u32>,
}

impl WindowQuery {
    fn window(&self, state: &AppState) -> Result<u32, ApiError> {
        match self.days {
            Some(0) => Err(ApiError::bad_request("days must be greater than 0")),
            Some(days) => Ok(days),
            None => Ok(state.default_window_days),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct InsightsQuery {
    platform: Option<String>,
    limit: Option<usize>,
}

fn parse_platform(raw: &str) -> Result<Platform, ApiError> {
    raw.parse::<Platform>().map_err(ApiError::bad_request)
}

// ============================================================================
// Health Handlers
// ============================================================================

pub(super) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        scheduler_running: state.scheduler.is_running().await,
    })
}

pub(super) async fn metrics() -> Response {
    match crate::metrics::encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to encode metrics")),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Analytics Handlers
// ============================================================================

pub(super) async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<crate::analytics::DashboardData> {
    let days = query.window(&state)?;
    ok(state.aggregator.get_dashboard_data(days).await?)
}

pub(super) async fn platform_analytics(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<crate::analytics::PlatformAnalytics> {
    let platform = parse_platform(&platform)?;
    let days = query.window(&state)?;
    ok(state.aggregator.get_platform_analytics(platform, days).await?)
}

pub(super) async fn compare(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<crate::analytics::PlatformComparison> {
    let days = query.window(&state)?;
    ok(state.aggregator.compare_platforms(days).await?)
}

/// `data` is `null` when the metric has fewer than two points
pub(super) async fn trend(
    State(state): State<AppState>,
    Path((platform, metric)): Path<(String, String)>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Option<crate::analytics::TrendData>> {
    let platform = parse_platform(&platform)?;
    let days = query.window(&state)?;
    ok(state
        .aggregator
        .analyzer()
        .analyze_trend(platform, &metric, days)
        .await?)
}

pub(super) async fn anomalies(
    State(state): State<AppState>,
    Path((platform, metric)): Path<(String, String)>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Vec<crate::analytics::Anomaly>> {
    let platform = parse_platform(&platform)?;
    let days = query.window(&state)?;
    ok(state
        .aggregator
        .analyzer()
        .detect_anomalies(platform, &metric, days)
        .await?)
}

pub(super) async fn insights(
    State(state): State<AppState>,
    Query(query): Query<InsightsQuery>,
) -> ApiResult<Vec<crate::models::Insight>> {
    let limit = query.limit.unwrap_or(DEFAULT_INSIGHT_LIMIT);
    let insights = match query.platform.as_deref() {
        Some(raw) => {
            let platform = parse_platform(raw)?;
            state.store.get_insights(platform, limit).await?
        }
        None => state.store.get_recent_insights(limit).await?,
    };
    ok(insights)
}

// ============================================================================
// Scheduler Handlers
// ============================================================================

pub(super) async fn list_tasks(
    State(state): State<AppState>,
) -> ApiResult<Vec<crate::scheduler::TaskInfo>> {
    ok(state.scheduler.get_tasks().await)
}

#[derive(Debug, Serialize)]
pub(super) struct TaskRunResponse {
    task: String,
    status: &'static str,
}

/// Runs the job to completion before responding
pub(super) async fn run_task(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<TaskRunResponse> {
    state.scheduler.run_task_now(&name).await?;
    ok(TaskRunResponse {
        task: name,
        status: "completed",
    })
}

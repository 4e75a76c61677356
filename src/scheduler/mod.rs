//! Background task scheduling
//!
//! This module runs the periodic collection and insight jobs that keep the
//! analytics store current.
//!
//! # Overview
//!
//! A [`Scheduler`] owns a set of named tasks. Each task has its own interval
//! and runs in its own tokio task, so a slow or failing job only delays itself.
//! Jobs are opaque async closures supplied by the wiring layer ([`jobs`]).
//!
//! # Lifecycle
//!
//! ```text
//!   add_task ──► [registered] ──start──► [running] ──stop──► [registered]
//!                     ▲                      │
//!                     └──── run_task_now ────┘  (either state)
//! ```
//!
//! - `start` runs every job once immediately, then once per interval.
//! - `stop` signals the scheduler-wide and per-task stop channels and waits
//!   for every task loop to exit.
//! - A job error is logged and counted; the next tick runs as usual.
//!
//! # Modules
//!
//! - [`runner`] - The [`Scheduler`] and its task loops
//! - [`task`] - Task definitions and the [`JobContext`] handed to jobs
//! - [`jobs`] - Fetch and insight jobs plus default registration
//! - [`error`] - Registration and lookup errors
//!
//! # Quick Start
//!
//! ```ignore
//! use crossforge::scheduler::Scheduler;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::new();
//! scheduler
//!     .add_task("heartbeat", Duration::from_secs(30), |ctx| async move {
//!         tracing::info!(task = ctx.task_name(), "alive");
//!         Ok(())
//!     })
//!     .await?;
//!
//! scheduler.start().await;
//! // ...
//! scheduler.stop().await;
//! ```

pub mod error;
pub mod jobs;
pub mod runner;
pub mod task;

// Re-export main types
pub use error::{SchedulerError, SchedulerResult};
pub use jobs::{
    register_default_tasks, task_name_for, JobDependencies, FETCH_TASK_PREFIX,
    INSIGHT_TASK_NAME,
};
pub use runner::Scheduler;
pub use task::{job_fn, JobContext, JobFn, JobFuture, TaskInfo};

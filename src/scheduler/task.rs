//! Scheduled task definitions
//!
//! A task pairs a name and an interval with an opaque job. Jobs receive a
//! [`JobContext`] that exposes the task name and the scheduler's stop signal,
//! so long-running jobs can bail out early when the scheduler shuts down.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Result;

/// Boxed future returned by a job
pub type JobFuture = BoxFuture<'static, Result<()>>;

/// Type-erased job function
pub type JobFn = Arc<dyn Fn(JobContext) -> JobFuture + Send + Sync>;

/// Wrap a closure returning a future into a [`JobFn`]
pub fn job_fn<F, Fut>(f: F) -> JobFn
where
    F: Fn(JobContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Context handed to every job invocation
#[derive(Debug, Clone)]
pub struct JobContext {
    task_name: Arc<str>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl JobContext {
    /// Context for a job running inside the scheduler loop
    pub(crate) fn scheduled(task_name: &str, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            task_name: Arc::from(task_name),
            shutdown: Some(shutdown),
        }
    }

    /// Context for an on-demand run; never cancelled
    pub fn detached(task_name: &str) -> Self {
        Self {
            task_name: Arc::from(task_name),
            shutdown: None,
        }
    }

    /// Name of the task this invocation belongs to
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Whether the scheduler has been asked to stop
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once the scheduler is stopping; pending forever for detached runs
    pub async fn cancelled(&mut self) {
        match self.shutdown.as_mut() {
            Some(rx) => {
                let _ = rx.wait_for(|stopped| *stopped).await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

/// Snapshot of a registered task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskInfo {
    pub name: String,
    #[serde(with = "duration_secs")]
    pub interval: Duration,
}

/// Running task loop owned by the scheduler
pub(crate) struct TaskHandle {
    pub(crate) stop: watch::Sender<bool>,
    pub(crate) join: JoinHandle<()>,
}

/// Registered task
pub(crate) struct ScheduledTask {
    pub(crate) name: String,
    pub(crate) interval: Duration,
    pub(crate) job: JobFn,
    pub(crate) handle: Option<TaskHandle>,
}

impl ScheduledTask {
    pub(crate) fn new(name: String, interval: Duration, job: JobFn) -> Self {
        Self {
            name,
            interval,
            job,
            handle: None,
        }
    }

    pub(crate) fn info(&self) -> TaskInfo {
        TaskInfo {
            name: self.name.clone(),
            interval: self.interval,
        }
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

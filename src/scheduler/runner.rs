//! Periodic task runner
//!
//! Every registered task gets its own tokio task that runs the job once on
//! start and then once per interval until the scheduler stops. Jobs of one
//! task never overlap; tasks never wait on each other.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{watch, RwLock};
use tokio::time::MissedTickBehavior;

use super::error::{SchedulerError, SchedulerResult};
use super::task::{job_fn, JobContext, JobFn, ScheduledTask, TaskHandle, TaskInfo};
use crate::error::{CrossforgeErrorTrait, Result};
use crate::metrics;

/// Shared scheduler state, guarded by a single lock
#[derive(Default)]
struct SchedulerState {
    tasks: Vec<ScheduledTask>,
    running: bool,
    /// Scheduler-wide stop signal for the current run
    shutdown: Option<watch::Sender<bool>>,
}

/// Runs named jobs at fixed intervals
///
/// Each instance is independent. Dropping a running scheduler closes its stop
/// channels, which ends the task loops without waiting for them; call
/// [`Scheduler::stop`] for a joined shutdown.
///
/// `stop` holds the exclusive lock while it waits for task loops to exit, so a
/// job must not call back into the scheduler that runs it.
#[derive(Default)]
pub struct Scheduler {
    state: RwLock<SchedulerState>,
}

impl Scheduler {
    /// Create an empty, stopped scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task
    ///
    /// The task starts ticking immediately when the scheduler is already
    /// running. Names must be unique and the interval non-zero.
    pub async fn add_task<F, Fut>(
        &self,
        name: impl Into<String>,
        interval: Duration,
        job: F,
    ) -> SchedulerResult<()>
    where
        F: Fn(JobContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.add_job(name, interval, job_fn(job)).await
    }

    /// Register an already type-erased job
    pub async fn add_job(
        &self,
        name: impl Into<String>,
        interval: Duration,
        job: JobFn,
    ) -> SchedulerResult<()> {
        let name = name.into();
        if interval.is_zero() {
            return Err(SchedulerError::invalid_interval(name, interval));
        }

        let mut state = self.state.write().await;
        if state.tasks.iter().any(|t| t.name == name) {
            return Err(SchedulerError::duplicate_task(name));
        }

        let mut task = ScheduledTask::new(name, interval, job);
        if state.running {
            if let Some(shutdown) = &state.shutdown {
                spawn_task(&mut task, shutdown.subscribe());
            }
        }

        tracing::info!(
            task = %task.name,
            interval_secs = task.interval.as_secs_f64(),
            started = state.running,
            "Task registered"
        );
        state.tasks.push(task);
        Ok(())
    }

    /// Start every registered task; no-op when already running
    pub async fn start(&self) {
        let mut state = self.state.write().await;
        if state.running {
            return;
        }

        let (shutdown, _) = watch::channel(false);
        for task in state.tasks.iter_mut() {
            spawn_task(task, shutdown.subscribe());
        }
        state.shutdown = Some(shutdown);
        state.running = true;

        tracing::info!(tasks = state.tasks.len(), "Scheduler started");
    }

    /// Stop every task and wait for all task loops to exit; no-op when stopped
    ///
    /// A job that never returns makes this wait forever. The scheduler is
    /// marked stopped and every loop signalled before the first join, so
    /// dropping this future early (e.g. under a timeout) leaves it stopped and
    /// restartable; loops still finishing are detached.
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        if !state.running {
            return;
        }

        if let Some(shutdown) = state.shutdown.take() {
            shutdown.send_replace(true);
        }

        let mut handles = Vec::with_capacity(state.tasks.len());
        for task in state.tasks.iter_mut() {
            if let Some(handle) = task.handle.take() {
                handle.stop.send_replace(true);
                handles.push((task.name.clone(), handle));
            }
        }
        state.running = false;

        for (name, handle) in handles {
            if let Err(e) = handle.join.await {
                tracing::error!(task = %name, error = %e, "Task loop terminated abnormally");
            }
        }

        tracing::info!("Scheduler stopped");
    }

    /// Whether the scheduler is running
    pub async fn is_running(&self) -> bool {
        self.state.read().await.running
    }

    /// Snapshot of registered tasks in registration order
    pub async fn get_tasks(&self) -> Vec<TaskInfo> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .map(ScheduledTask::info)
            .collect()
    }

    /// Run a task's job once, outside its ticker, and return the job's result
    ///
    /// Works whether or not the scheduler is running. The lock is released
    /// before the job runs, so the call may overlap a scheduled invocation of
    /// the same task.
    pub async fn run_task_now(&self, name: &str) -> Result<()> {
        let job = {
            let state = self.state.read().await;
            state
                .tasks
                .iter()
                .find(|t| t.name == name)
                .map(|t| Arc::clone(&t.job))
        };
        let job = job.ok_or_else(|| SchedulerError::task_not_found(name))?;

        tracing::info!(task = %name, "Running task on demand");
        execute(name, &job, JobContext::detached(name)).await
    }
}

/// Spawn the loop for `task` and keep its handle
fn spawn_task(task: &mut ScheduledTask, shutdown: watch::Receiver<bool>) {
    let (stop, stop_rx) = watch::channel(false);
    let join = tokio::spawn(task_loop(
        task.name.clone(),
        task.interval,
        Arc::clone(&task.job),
        shutdown,
        stop_rx,
    ));
    task.handle = Some(TaskHandle { stop, join });
}

/// Run once, then on every tick until either stop signal fires
async fn task_loop(
    name: String,
    interval: Duration,
    job: JobFn,
    mut shutdown: watch::Receiver<bool>,
    mut stop: watch::Receiver<bool>,
) {
    metrics::adjust_running_tasks(1);
    let ctx = JobContext::scheduled(&name, shutdown.clone());

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    ticker.tick().await;
    let _ = execute(&name, &job, ctx.clone()).await;

    loop {
        tokio::select! {
            biased;
            _ = stopped(&mut shutdown) => break,
            _ = stopped(&mut stop) => {
                tracing::debug!(task = %name, "Task stopped");
                break;
            }
            _ = ticker.tick() => {
                tracing::debug!(task = %name, "Running task");
                let _ = execute(&name, &job, ctx.clone()).await;
            }
        }
    }

    metrics::adjust_running_tasks(-1);
}

/// Resolves once the signal is set or its sender is gone
async fn stopped(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stopped| *stopped).await;
}

/// Invoke the job, logging and recording the outcome
async fn execute(name: &str, job: &JobFn, ctx: JobContext) -> Result<()> {
    let started = Instant::now();
    let result = job(ctx).await;
    let elapsed = started.elapsed();

    metrics::record_task_run(name, result.is_ok(), elapsed.as_secs_f64());
    match &result {
        Ok(()) => {
            tracing::debug!(
                task = %name,
                elapsed_ms = elapsed.as_millis() as u64,
                "Task completed"
            );
        }
        Err(e) => {
            tracing::error!(
                task = %name,
                category = %e.category(),
                recoverable = e.is_recoverable(),
                error = %e,
                "Task failed"
            );
        }
    }
    result
}

//! Integration tests for the task scheduler
//!
//! These tests run real tokio timers with millisecond intervals and check:
//! - Jobs run immediately on start and then repeatedly
//! - A failing job keeps its schedule and does not affect other tasks
//! - No job runs after `stop` returns
//! - Stop signals reach long-running jobs

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossforge::error::Error;
use crossforge::scheduler::Scheduler;

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

// ============================================================================
// Ticking
// ============================================================================

#[tokio::test]
async fn test_job_runs_repeatedly_while_running() {
    let scheduler = Scheduler::new();
    let runs = counter();

    let r = Arc::clone(&runs);
    scheduler
        .add_task("tick", Duration::from_millis(1), move |_ctx| {
            let r = Arc::clone(&r);
            async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.stop().await;

    assert!(runs.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_first_run_happens_before_first_interval() {
    let scheduler = Scheduler::new();
    let runs = counter();

    let r = Arc::clone(&runs);
    scheduler
        .add_task("hourly", Duration::from_secs(3600), move |_ctx| {
            let r = Arc::clone(&r);
            async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.stop().await;

    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_runs_after_stop() {
    let scheduler = Scheduler::new();
    let runs = counter();

    let r = Arc::clone(&runs);
    scheduler
        .add_task("tick", Duration::from_millis(1), move |_ctx| {
            let r = Arc::clone(&r);
            async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    scheduler.stop().await;

    let after_stop = runs.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(runs.load(Ordering::SeqCst), after_stop);
    assert!(!scheduler.is_running().await);
}

// ============================================================================
// Isolation
// ============================================================================

#[tokio::test]
async fn test_failing_task_keeps_ticking_and_others_unaffected() {
    let scheduler = Scheduler::new();
    let failures = counter();
    let successes = counter();

    let f = Arc::clone(&failures);
    scheduler
        .add_task("broken", Duration::from_millis(1), move |ctx| {
            let f = Arc::clone(&f);
            async move {
                f.fetch_add(1, Ordering::SeqCst);
                Err(Error::other(format!("{} always fails", ctx.task_name())))
            }
        })
        .await
        .unwrap();

    let s = Arc::clone(&successes);
    scheduler
        .add_task("healthy", Duration::from_millis(1), move |_ctx| {
            let s = Arc::clone(&s);
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.stop().await;

    assert!(failures.load(Ordering::SeqCst) >= 2);
    assert!(successes.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_slow_task_does_not_block_fast_task() {
    let scheduler = Scheduler::new();
    let fast_runs = counter();

    scheduler
        .add_task("slow", Duration::from_millis(1), |mut ctx| async move {
            tokio::select! {
                _ = ctx.cancelled() => {}
                _ = tokio::time::sleep(Duration::from_secs(3600)) => {}
            }
            Ok(())
        })
        .await
        .unwrap();

    let r = Arc::clone(&fast_runs);
    scheduler
        .add_task("fast", Duration::from_millis(1), move |_ctx| {
            let r = Arc::clone(&r);
            async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.stop().await;

    assert!(fast_runs.load(Ordering::SeqCst) >= 2);
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_stop_signal_reaches_running_job() {
    let scheduler = Scheduler::new();
    let observed = Arc::new(AtomicBool::new(false));

    let o = Arc::clone(&observed);
    scheduler
        .add_task("long", Duration::from_secs(60), move |mut ctx| {
            let o = Arc::clone(&o);
            async move {
                ctx.cancelled().await;
                o.store(ctx.is_cancelled(), Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    tokio::time::timeout(Duration::from_secs(5), scheduler.stop())
        .await
        .expect("stop should complete once the job observes cancellation");
    assert!(observed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_run_task_now_while_stopped() {
    let scheduler = Scheduler::new();
    let runs = counter();

    let r = Arc::clone(&runs);
    scheduler
        .add_task("manual", Duration::from_secs(60), move |ctx| {
            let r = Arc::clone(&r);
            async move {
                assert!(!ctx.is_cancelled());
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

    scheduler.run_task_now("manual").await.unwrap();
    scheduler.run_task_now("manual").await.unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(!scheduler.is_running().await);
}

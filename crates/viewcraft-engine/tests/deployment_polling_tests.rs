// Integration tests for deployment-status polling.
// Time is paused, so every schedule is checked against the virtual clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use viewcraft_core::config::PollingConfig;
use viewcraft_engine::deployment::{DEPLOYMENT_FAILED, POLLING_TIMED_OUT};
use viewcraft_engine::{
    poll_for_active_vdb, DeploymentPoll, EngineError, VdbStatus, VdbStatusSource,
};

/// Replays scripted responses, then reports the VDB as still loading
#[derive(Default)]
struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<VdbStatus>, EngineError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn with(responses: Vec<Result<Vec<VdbStatus>, EngineError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VdbStatusSource for ScriptedSource {
    async fn vdb_statuses(&self) -> viewcraft_engine::Result<Vec<VdbStatus>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(vec![loading("salesvdb")]))
    }
}

fn loading(name: &str) -> VdbStatus {
    VdbStatus {
        name: name.to_string(),
        loading: true,
        ..Default::default()
    }
}

fn active(name: &str) -> VdbStatus {
    VdbStatus {
        name: name.to_string(),
        active: true,
        ..Default::default()
    }
}

fn schedule() -> PollingConfig {
    PollingConfig {
        interval_secs: 5,
        duration_secs: 60,
        initial_delay_secs: 1,
    }
}

#[tokio::test(start_paused = true)]
async fn test_stops_when_vdb_becomes_active() {
    // GIVEN a VDB that is active on the third poll
    let source = ScriptedSource::with(vec![
        Ok(vec![loading("salesvdb")]),
        Ok(vec![loading("salesvdb")]),
        Ok(vec![active("salesvdb")]),
    ]);
    let start = Instant::now();

    // WHEN polling for it
    let status = poll_for_active_vdb(&source, "salesvdb", &schedule()).await;

    // THEN the active status is returned after the initial delay and two intervals
    assert!(status.active);
    assert_eq!(source.calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(11));
}

#[tokio::test(start_paused = true)]
async fn test_other_vdbs_are_ignored() {
    let source = ScriptedSource::with(vec![
        Ok(vec![active("hrvdb"), loading("salesvdb")]),
        Ok(vec![VdbStatus::failed("salesvdb", "bad model")]),
    ]);

    let status = poll_for_active_vdb(&source, "salesvdb", &schedule()).await;

    assert!(status.failed);
    assert_eq!(status.errors, vec!["bad model".to_string()]);
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_times_out_after_duration_over_interval_polls() {
    // GIVEN a VDB that never settles; 60s / 5s allows 12 polls
    let source = ScriptedSource::default();
    let start = Instant::now();

    // WHEN polling for it
    let status = poll_for_active_vdb(&source, "salesvdb", &schedule()).await;

    // THEN a synthesised failure is returned once the count exceeds 12
    assert_eq!(status, VdbStatus::failed("salesvdb", POLLING_TIMED_OUT));
    assert_eq!(source.calls(), 13);
    assert_eq!(start.elapsed(), Duration::from_secs(1 + 12 * 5));
}

#[tokio::test(start_paused = true)]
async fn test_source_error_reports_deployment_failed() {
    let source = ScriptedSource::with(vec![
        Ok(vec![loading("salesvdb")]),
        Err(EngineError::Status {
            message: "connection refused".to_string(),
        }),
    ]);

    let status = poll_for_active_vdb(&source, "salesvdb", &schedule()).await;

    assert_eq!(status, VdbStatus::failed("salesvdb", DEPLOYMENT_FAILED));
    assert_eq!(source.calls(), 2);
}

// ---------------------------------------------------------------------------
// DeploymentPoll
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_background_poll_delivers_status() {
    let source = Arc::new(ScriptedSource::with(vec![Ok(vec![active("salesvdb")])]));

    let poll = DeploymentPoll::spawn(source.clone(), "salesvdb", schedule());
    assert_eq!(poll.vdb_name(), "salesvdb");

    let status = poll.wait().await.unwrap();
    assert!(status.active);
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_poll_stops_requesting() {
    // GIVEN a background poll of a VDB that never settles
    let source = Arc::new(ScriptedSource::default());
    let mut poll = DeploymentPoll::spawn(source.clone(), "salesvdb", schedule());
    tokio::time::sleep(Duration::from_secs(7)).await;
    let calls_before = source.calls();

    // WHEN it is cancelled
    poll.cancel();
    tokio::time::sleep(Duration::from_secs(60)).await;

    // THEN no further requests are made and waiting reports the stop
    assert_eq!(source.calls(), calls_before);
    assert!(matches!(
        poll.wait().await,
        Err(EngineError::PollingStopped { .. })
    ));
}

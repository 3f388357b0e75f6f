//! Deployment-status polling
//!
//! After a virtualization is published its VDB is polled until the server
//! reports it active or failed. Polling gives up after
//! `duration / interval` unsettled polls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{sleep, MissedTickBehavior};
use viewcraft_core::config::PollingConfig;
use viewcraft_core::{log_op_end, log_op_start};

use crate::errors::{EngineError, Result};

pub const POLLING_TIMED_OUT: &str = "Deployment polling timed out";
pub const DEPLOYMENT_FAILED: &str = "Deployment failed";

/// Status of a deployed VDB as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VdbStatus {
    pub name: String,
    pub active: bool,
    pub loading: bool,
    pub failed: bool,
    pub errors: Vec<String>,
}

impl VdbStatus {
    /// A failed status carrying a single error
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
            loading: false,
            failed: true,
            errors: vec![error.into()],
        }
    }

    /// Whether deployment has finished, one way or the other
    pub fn is_settled(&self) -> bool {
        self.active || self.failed
    }
}

/// Server endpoint reporting the status of every deployed VDB
#[async_trait]
pub trait VdbStatusSource: Send + Sync {
    async fn vdb_statuses(&self) -> Result<Vec<VdbStatus>>;
}

/// Poll until the named VDB is active or failed
///
/// The first poll happens after `initial_delay`, later ones every
/// `interval`. Statuses of other VDBs are ignored. When the source itself
/// fails, or the VDB is still unsettled after `max_polls` polls, a failed
/// status is synthesised.
pub async fn poll_for_active_vdb(
    source: &dyn VdbStatusSource,
    vdb_name: &str,
    config: &PollingConfig,
) -> VdbStatus {
    let op = "poll_for_active_vdb";
    log_op_start!(op, vdb_name = vdb_name);
    let start = Instant::now();

    let (status, poll_count) = poll_impl(source, vdb_name, config).await;

    log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        poll_count = poll_count,
        active = status.active
    );
    status
}

async fn poll_impl(
    source: &dyn VdbStatusSource,
    vdb_name: &str,
    config: &PollingConfig,
) -> (VdbStatus, u64) {
    let max_polls = config.max_polls();
    sleep(config.initial_delay()).await;

    // tokio panics on a zero period
    let mut ticker = tokio::time::interval(config.interval().max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut poll_count = 0;
    loop {
        ticker.tick().await;
        let statuses = match source.vdb_statuses().await {
            Ok(statuses) => statuses,
            Err(e) => {
                tracing::warn!(vdb_name, error = %e, "deployment status request failed");
                return (VdbStatus::failed(vdb_name, DEPLOYMENT_FAILED), poll_count + 1);
            }
        };
        poll_count += 1;

        if let Some(settled) = statuses
            .into_iter()
            .find(|s| s.name == vdb_name && s.is_settled())
        {
            return (settled, poll_count);
        }
        if poll_count > max_polls {
            tracing::warn!(vdb_name, poll_count, "deployment polling timed out");
            return (VdbStatus::failed(vdb_name, POLLING_TIMED_OUT), poll_count);
        }
    }
}

/// Polling running in the background
///
/// Dropping the handle stops the polling.
#[derive(Debug)]
pub struct DeploymentPoll {
    vdb_name: String,
    handle: Option<JoinHandle<VdbStatus>>,
}

impl DeploymentPoll {
    /// Start polling on the current runtime
    pub fn spawn(
        source: Arc<dyn VdbStatusSource>,
        vdb_name: impl Into<String>,
        config: PollingConfig,
    ) -> Self {
        let vdb_name = vdb_name.into();
        let name = vdb_name.clone();
        let handle =
            tokio::spawn(async move { poll_for_active_vdb(source.as_ref(), &name, &config).await });
        Self {
            vdb_name,
            handle: Some(handle),
        }
    }

    pub fn vdb_name(&self) -> &str {
        &self.vdb_name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!(vdb_name = %self.vdb_name, "deployment polling cancelled");
            handle.abort();
        }
    }

    /// Wait for the final status
    ///
    /// # Errors
    ///
    /// Returns `PollingStopped` if the poll was cancelled before it settled.
    pub async fn wait(mut self) -> Result<VdbStatus> {
        let handle = self.handle.take();
        let stopped = || EngineError::PollingStopped {
            vdb_name: self.vdb_name.clone(),
        };
        let handle = handle.ok_or_else(stopped)?;
        handle.await.map_err(|_| stopped())
    }
}

impl Drop for DeploymentPoll {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_status_is_settled() {
        let status = VdbStatus::failed("salesvdb", DEPLOYMENT_FAILED);
        assert!(status.is_settled());
        assert!(!status.active);
        assert_eq!(status.errors, vec![DEPLOYMENT_FAILED.to_string()]);
    }

    #[test]
    fn test_loading_status_is_not_settled() {
        let status = VdbStatus {
            name: "salesvdb".to_string(),
            loading: true,
            ..Default::default()
        };
        assert!(!status.is_settled());
    }

    #[test]
    fn test_status_wire_form() {
        let status: VdbStatus =
            serde_json::from_str(r#"{"name":"salesvdb","active":true}"#).unwrap();
        assert!(status.active);
        assert!(status.errors.is_empty());
    }
}

//! Editor configuration
//!
//! Loaded from TOML; every field has a default so an empty document (or no
//! file at all) yields a usable configuration.
//!
//! ```toml
//! read_only = false
//! history_limit = 100
//! notification_dismiss_secs = 8
//!
//! [polling]
//! interval_secs = 5
//! duration_secs = 60
//! initial_delay_secs = 1
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ViewEditorError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Reject every document mutation when set
    pub read_only: bool,
    /// Maximum undo entries kept; 0 keeps everything
    pub history_limit: usize,
    /// Seconds a completed save notification stays visible
    pub notification_dismiss_secs: u64,
    pub polling: PollingConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            history_limit: 100,
            notification_dismiss_secs: 8,
            polling: PollingConfig::default(),
        }
    }
}

/// Deployment-status polling schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub duration_secs: u64,
    pub initial_delay_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            duration_secs: 60,
            initial_delay_secs: 1,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    /// Number of polls allowed before the deployment is reported as timed out
    pub fn max_polls(&self) -> u64 {
        self.duration_secs.checked_div(self.interval_secs).unwrap_or(0)
    }
}

impl EditorConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the document is not valid TOML, does not
    /// match the schema, or fails validation.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: EditorConfig =
            toml::from_str(input).map_err(|e| ViewEditorError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ViewEditorError::InvalidConfig {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn notification_dismiss_after(&self) -> Duration {
        Duration::from_secs(self.notification_dismiss_secs)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` when the polling interval is zero or longer
    /// than the polling duration.
    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_secs == 0 {
            return Err(ViewEditorError::InvalidConfig {
                reason: "polling.interval_secs must be greater than zero".to_string(),
            });
        }
        if self.polling.interval_secs > self.polling.duration_secs {
            return Err(ViewEditorError::InvalidConfig {
                reason: "polling.interval_secs must not exceed polling.duration_secs".to_string(),
            });
        }
        Ok(())
    }
}

use std::time::Duration;

use crate::editor::SaveProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Danger,
}

/// Save-progress banner shown over the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveNotification {
    pub header: &'static str,
    pub message: String,
    pub severity: Severity,
    /// Completed saves are dismissed automatically after this delay
    pub dismiss_after: Option<Duration>,
}

impl SaveNotification {
    pub fn for_progress(
        progress: SaveProgress,
        view_name: Option<&str>,
        dismiss_after: Duration,
    ) -> Self {
        let view = view_name
            .filter(|n| !n.is_empty())
            .map(|n| format!("'{n}'"))
            .unwrap_or_default();

        match progress {
            SaveProgress::InProgress => Self {
                header: "Save In Progress:",
                message: format!("View save in progress for {view}"),
                severity: Severity::Info,
                dismiss_after: None,
            },
            SaveProgress::CompletedSuccess => Self {
                header: "Save Succeeded:",
                message: format!("View save SUCCESS for {view}"),
                severity: Severity::Success,
                dismiss_after: Some(dismiss_after),
            },
            SaveProgress::CompletedFailed => Self {
                header: "Save Failed:",
                message: format!("View save FAILED for {view}"),
                severity: Severity::Danger,
                dismiss_after: Some(dismiss_after),
            },
        }
    }
}

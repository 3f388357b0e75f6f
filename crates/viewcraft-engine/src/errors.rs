use thiserror::Error;
use viewcraft_core::errors::{ExError, ExErrorKind, ViewEditorError};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures at the engine boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] ViewEditorError),

    /// The editor-state store rejected or failed a request
    #[error("Editor state store failed: {message}")]
    Store { message: String },

    #[error("Invalid editor state pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The deployment-status service could not be queried
    #[error("Deployment status unavailable: {message}")]
    Status { message: String },

    #[error("Deployment polling for '{vdb_name}' was stopped")]
    PollingStopped { vdb_name: String },
}

impl From<EngineError> for ExError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(inner) => inner.into(),
            EngineError::Store { message } => ExError::new(ExErrorKind::Persistence)
                .with_op("editor_state_store")
                .with_message(message),
            EngineError::InvalidPattern { pattern, reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("list_editor_states")
                    .with_argument(pattern)
                    .with_message(reason)
            }
            EngineError::Status { message } => ExError::new(ExErrorKind::ExternalService)
                .with_op("poll_for_active_vdb")
                .with_message(message),
            EngineError::PollingStopped { vdb_name } => ExError::new(ExErrorKind::Internal)
                .with_op("poll_for_active_vdb")
                .with_message(format!("polling for '{vdb_name}' ended without a status")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_code() {
        let err: EngineError = ViewEditorError::ReadOnly.into();
        let ex: ExError = err.into();
        assert_eq!(ex.code(), "ERR_READ_ONLY");
    }

    #[test]
    fn test_store_error_maps_to_persistence() {
        let ex: ExError = EngineError::Store {
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::Persistence);
        assert_eq!(ex.message(), "disk full");
    }
}

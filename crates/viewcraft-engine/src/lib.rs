//! Viewcraft Engine - asynchronous boundary of the view editor
//!
//! Coordinates the synchronous editor kernel with the collaborators that
//! sit behind an await: the editor-state store and the deployment-status
//! service.

pub mod commands;
pub mod deployment;
pub mod errors;
pub mod persistence;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use deployment::{poll_for_active_vdb, DeploymentPoll, VdbStatus, VdbStatusSource};
pub use errors::{EngineError, Result};
pub use persistence::{EditorStateStore, InMemoryEditorStateStore};

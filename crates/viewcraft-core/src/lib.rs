//! Viewcraft Core - command-sourced view editor kernel
//!
//! This crate provides the synchronous core of the view editor:
//! - The view definition document and its compositions
//! - Typed commands, the command factory and undoable pairs
//! - The JSON wire codec for commands and undo history
//! - The editor service with undo/redo and its event bus
//! - The canvas graph kept in step with the document

pub mod apply;
pub mod canvas;
pub mod commands;
pub mod config;
pub mod editor;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Used by the logging macros
pub use viewcraft_core_types;

// Re-export commonly used types
pub use apply::{apply, apply_all, effective_command};
pub use canvas::{CanvasEvent, ViewCanvas};
pub use commands::{Command, CommandKind, Undoable};
pub use config::EditorConfig;
pub use editor::{EditorState, ViewEditorEvent, ViewEditorPart, ViewEditorService};
pub use errors::{ExError, ExErrorKind, Result, ViewEditorError};
pub use model::{Composition, ProjectedColumn, ViewDefinition};

//! View editor session
//!
//! [`ViewEditorService`] owns the document being edited, the undo/redo
//! history and the [`EventBus`] on which every change is broadcast to the
//! dependent parts of the editor (header, canvas, property editors).

pub mod bus;
pub mod event;
pub mod service;
pub mod state;

pub use bus::{EventBus, Subscription};
pub use event::{SaveProgress, ViewEditorEvent, ViewEditorEventKind, ViewEditorPart};
pub use service::ViewEditorService;
pub use state::EditorState;

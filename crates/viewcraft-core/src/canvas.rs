//! Canvas model of the view being edited
//!
//! A node per source and per composition, a link from each composition to
//! each of its two sources. See [`sync`] for how editor events drive it.

pub mod graph;
pub mod notification;
pub mod sync;

pub use graph::{CanvasGraph, CanvasLink, CanvasNode, CanvasNodeKind, CanvasPayload, CanvasShape};
pub use notification::{SaveNotification, Severity};
pub use sync::{activate, CanvasActivation, CanvasEvent, ViewCanvas};

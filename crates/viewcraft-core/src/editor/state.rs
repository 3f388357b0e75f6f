use serde::{Deserialize, Serialize};

use crate::commands::Undoable;
use crate::errors::Result;
use crate::model::ViewDefinition;

/// Persisted snapshot of an editor session
///
/// Holds the document plus the undo history, so that a session reloaded
/// later can still undo the edits made before it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub id: String,
    #[serde(rename = "viewDefinition")]
    pub view: ViewDefinition,
    #[serde(default)]
    pub undoables: Vec<Undoable>,
}

impl EditorState {
    pub fn new(id: impl Into<String>, view: ViewDefinition, undoables: Vec<Undoable>) -> Self {
        Self {
            id: id.into(),
            view,
            undoables,
        }
    }

    /// # Errors
    ///
    /// Returns `MalformedJson` (or the decode error of a bad undoable) if the
    /// document is not an editor state.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns `MalformedJson` if the state cannot be encoded.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

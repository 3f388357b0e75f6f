//! Engine-level commands for session persistence.

use viewcraft_core::{ViewDefinition, ViewEditorPart, ViewEditorService};

use crate::commands::session;
use crate::errors::Result;
use crate::persistence::EditorStateStore;

/// Engine-level commands that require the editor-state store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Save the session being edited.
    SaveEditorState {
        state_id: String,
        dataservice_id: Option<String>,
    },
    /// Replace the session with a stored one.
    LoadEditorState { state_id: String },
    DeleteEditorState {
        state_id: String,
        dataservice_id: Option<String>,
    },
    /// List the views saved for a virtualization.
    ListViews { vdb_name: String },
}

/// Result of applying an engine command.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommandResult {
    Saved,
    /// Whether a stored state was found and restored.
    Loaded(bool),
    /// Whether a stored state was found and deleted.
    Deleted(bool),
    Views(Vec<ViewDefinition>),
}

/// Apply an engine command against an editor session and a store.
///
/// # Errors
///
/// Returns the error of the underlying session operation.
pub async fn apply_engine_command(
    cmd: EngineCommand,
    service: &mut ViewEditorService,
    store: &dyn EditorStateStore,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::SaveEditorState {
            state_id,
            dataservice_id,
        } => {
            session::save_editor_state(service, store, &state_id, dataservice_id.as_deref())
                .await?;
            Ok(EngineCommandResult::Saved)
        }
        EngineCommand::LoadEditorState { state_id } => {
            let found =
                session::load_editor_state(service, store, &state_id, ViewEditorPart::Editor)
                    .await?;
            Ok(EngineCommandResult::Loaded(found))
        }
        EngineCommand::DeleteEditorState {
            state_id,
            dataservice_id,
        } => {
            let deleted =
                session::delete_editor_state(store, &state_id, dataservice_id.as_deref()).await?;
            Ok(EngineCommandResult::Deleted(deleted))
        }
        EngineCommand::ListViews { vdb_name } => {
            let views = session::list_view_definitions(store, &vdb_name).await?;
            Ok(EngineCommandResult::Views(views))
        }
    }
}

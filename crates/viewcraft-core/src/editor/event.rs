use crate::commands::Command;
use crate::model::ViewDefinition;

/// Part of the editor an event originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewEditorPart {
    Editor,
    Header,
    Canvas,
    Properties,
    Preview,
    History,
}

/// Progress of an editor-state save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveProgress {
    InProgress,
    CompletedSuccess,
    CompletedFailed,
}

impl SaveProgress {
    pub fn is_completed(&self) -> bool {
        !matches!(self, SaveProgress::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEditorEventKind {
    /// A new document was loaded (or cleared with `None`)
    EditedViewSet { view: Option<ViewDefinition> },
    /// Commands were applied to the document, in order
    ViewStateChanged { commands: Vec<Command> },
    SaveProgressChanged {
        progress: SaveProgress,
        view_name: Option<String>,
    },
    /// The user asked to add a source from the canvas
    CreateSource,
    /// The user asked to add a composition starting from a source
    CreateComposition { source_path: Option<String> },
    DeleteNode { node_ids: Vec<String> },
    CanvasSelectionChanged { node_ids: Vec<String> },
}

/// Event broadcast on the editor bus
#[derive(Debug, Clone, PartialEq)]
pub struct ViewEditorEvent {
    pub source: ViewEditorPart,
    pub kind: ViewEditorEventKind,
}

impl ViewEditorEvent {
    pub fn new(source: ViewEditorPart, kind: ViewEditorEventKind) -> Self {
        Self { source, kind }
    }

    pub fn is_edited_view_set(&self) -> bool {
        matches!(self.kind, ViewEditorEventKind::EditedViewSet { .. })
    }

    pub fn is_view_state_changed(&self) -> bool {
        matches!(self.kind, ViewEditorEventKind::ViewStateChanged { .. })
    }

    pub fn is_save_progress_changed(&self) -> bool {
        matches!(self.kind, ViewEditorEventKind::SaveProgressChanged { .. })
    }

    /// Commands carried by a view-state-changed event
    pub fn commands(&self) -> &[Command] {
        match &self.kind {
            ViewEditorEventKind::ViewStateChanged { commands } => commands,
            _ => &[],
        }
    }
}

//! Editor service
//!
//! ## Logging
//!
//! Every mutating operation logs through the canonical macros:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Handlers subscribed to [`ViewEditorService::events`] run inline with the
//! operation that emitted the event and must not call back into the service.

use std::time::Instant;

use viewcraft_core_types::SessionId;

use super::bus::{EventBus, Subscription};
use super::event::{SaveProgress, ViewEditorEvent, ViewEditorEventKind, ViewEditorPart};
use super::state::EditorState;
use crate::apply::{apply, effective_command};
use crate::commands::{factory, Command, Undoable};
use crate::config::EditorConfig;
use crate::errors::{Result, ViewEditorError};
use crate::model::ViewDefinition;
use crate::{log_op_end, log_op_error, log_op_start};

pub struct ViewEditorService {
    view: Option<ViewDefinition>,
    undo_stack: Vec<Undoable>,
    redo_stack: Vec<Undoable>,
    dirty: bool,
    read_only: bool,
    history_limit: usize,
    session_id: SessionId,
    events: EventBus<ViewEditorEvent>,
}

impl Default for ViewEditorService {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl ViewEditorService {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            view: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            dirty: false,
            read_only: config.read_only,
            history_limit: config.history_limit,
            session_id: SessionId::new(),
            events: EventBus::new(),
        }
    }

    /// The editor bus; clone it to emit or subscribe without borrowing the service
    pub fn events(&self) -> &EventBus<ViewEditorEvent> {
        &self.events
    }

    #[must_use = "the handler is unregistered when the subscription is dropped"]
    pub fn subscribe(&self, handler: impl Fn(&ViewEditorEvent) + 'static) -> Subscription {
        self.events.subscribe(handler)
    }

    /// Identifies the current editing session; renewed whenever a view is set
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn editor_view(&self) -> Option<&ViewDefinition> {
        self.view.as_ref()
    }

    /// Replace the document being edited; history is discarded
    pub fn set_editor_view(&mut self, view: Option<ViewDefinition>, source: ViewEditorPart) {
        self.session_id = SessionId::new();
        tracing::debug!(
            session_id = %self.session_id,
            view_name = view.as_ref().and_then(|v| v.name()).unwrap_or_default(),
            "editor view set"
        );
        self.view = view.clone();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.dirty = false;
        self.events.emit(&ViewEditorEvent::new(
            source,
            ViewEditorEventKind::EditedViewSet { view },
        ));
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether the document changed since it was loaded or last saved
    pub fn has_changes(&self) -> bool {
        self.dirty
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo history, oldest first
    pub fn undo_stack(&self) -> &[Undoable] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Undoable] {
        &self.redo_stack
    }

    fn check_editable(&self) -> Result<&ViewDefinition> {
        if self.read_only {
            return Err(ViewEditorError::ReadOnly);
        }
        self.view.as_ref().ok_or(ViewEditorError::NoEditorView)
    }

    fn broadcast_commands(&self, source: ViewEditorPart, commands: Vec<Command>) {
        self.events.emit(&ViewEditorEvent::new(
            source,
            ViewEditorEventKind::ViewStateChanged { commands },
        ));
    }

    /// Apply `cmd` to the document, record it in the history and broadcast it
    ///
    /// `cmd` is first narrowed to what it actually changes (see
    /// [`effective_command`]); that narrowed command is what gets recorded
    /// and broadcast, so its undo restores the document exactly. A command
    /// that changes nothing is ignored. The redo stack is cleared, and the
    /// oldest history entry is dropped once the configured limit is exceeded.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` or `NoEditorView` when the document cannot be
    /// edited, or the error from building the undoable or applying `cmd`. The
    /// document and history are unchanged on error.
    pub fn fire_view_state_has_changed(
        &mut self,
        source: ViewEditorPart,
        cmd: Command,
    ) -> Result<()> {
        if !cmd.is_undoable() {
            tracing::debug!(command_id = %cmd.id(), "ignoring no-op command");
            return Ok(());
        }

        let op = "fire_view_state_has_changed";
        log_op_start!(
            op,
            command_kind = cmd.kind().as_str(),
            session_id = %self.session_id
        );
        let start = Instant::now();

        self.fire_view_state_has_changed_impl(source, cmd)
            .map_err(|e| {
                log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
                e
            })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            undo_len = self.undo_stack.len(),
            redo_len = self.redo_stack.len()
        );
        Ok(())
    }

    fn fire_view_state_has_changed_impl(
        &mut self,
        source: ViewEditorPart,
        cmd: Command,
    ) -> Result<()> {
        let current = self.check_editable()?.clone();
        let cmd = effective_command(&current, &cmd);
        if !cmd.is_undoable() {
            tracing::debug!(session_id = %self.session_id, "command leaves view unchanged");
            return Ok(());
        }
        let undoable = factory::create_undoable(cmd.clone())?;
        let updated = apply(current, &cmd)?;

        self.view = Some(updated);
        self.undo_stack.push(undoable);
        self.redo_stack.clear();
        if self.history_limit > 0 && self.undo_stack.len() > self.history_limit {
            let excess = self.undo_stack.len() - self.history_limit;
            self.undo_stack.drain(..excess);
        }
        self.dirty = true;

        self.broadcast_commands(source, vec![cmd]);
        Ok(())
    }

    /// Reverse the most recent change; returns false when there is nothing to undo
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` or `NoEditorView`, or the error from applying the
    /// undo command (the history is unchanged in that case).
    pub fn undo(&mut self, source: ViewEditorPart) -> Result<bool> {
        self.step("undo", source, HistoryStep::Undo)
    }

    /// Re-apply the most recently undone change; returns false when there is nothing to redo
    ///
    /// # Errors
    ///
    /// As for [`ViewEditorService::undo`].
    pub fn redo(&mut self, source: ViewEditorPart) -> Result<bool> {
        self.step("redo", source, HistoryStep::Redo)
    }

    fn step(&mut self, op: &str, source: ViewEditorPart, step: HistoryStep) -> Result<bool> {
        log_op_start!(op);
        let start = Instant::now();

        let stepped = self.step_impl(source, step).map_err(|e| {
            log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
            e
        })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            undo_len = self.undo_stack.len(),
            redo_len = self.redo_stack.len()
        );
        Ok(stepped)
    }

    fn step_impl(&mut self, source: ViewEditorPart, step: HistoryStep) -> Result<bool> {
        let current = self.check_editable()?.clone();
        let (from, to) = match step {
            HistoryStep::Undo => (&mut self.undo_stack, &mut self.redo_stack),
            HistoryStep::Redo => (&mut self.redo_stack, &mut self.undo_stack),
        };

        let Some(undoable) = from.last() else {
            return Ok(false);
        };
        let cmd = match step {
            HistoryStep::Undo => undoable.undo().clone(),
            HistoryStep::Redo => undoable.redo().clone(),
        };
        let updated = apply(current, &cmd)?;

        if let Some(undoable) = from.pop() {
            to.push(undoable);
        }
        self.view = Some(updated);
        self.dirty = true;

        self.broadcast_commands(source, vec![cmd]);
        Ok(true)
    }

    /// Snapshot of the session for persistence
    ///
    /// # Errors
    ///
    /// Returns `NoEditorView` if nothing is being edited.
    pub fn editor_state(&self, id: impl Into<String>) -> Result<EditorState> {
        let view = self.view.clone().ok_or(ViewEditorError::NoEditorView)?;
        Ok(EditorState::new(id, view, self.undo_stack.clone()))
    }

    /// Resume a saved session: its document and undo history become current
    pub fn restore_editor_state(&mut self, state: EditorState, source: ViewEditorPart) {
        tracing::debug!(state_id = %state.id, undo_len = state.undoables.len(), "restoring editor state");
        self.set_editor_view(Some(state.view), source);
        self.undo_stack = state.undoables;
    }

    fn emit_save_progress(&self, progress: SaveProgress) {
        let view_name = self
            .view
            .as_ref()
            .and_then(|v| v.name())
            .map(str::to_string);
        self.events.emit(&ViewEditorEvent::new(
            ViewEditorPart::Editor,
            ViewEditorEventKind::SaveProgressChanged {
                progress,
                view_name,
            },
        ));
    }

    /// Announce a save and return the state to persist
    ///
    /// # Errors
    ///
    /// Returns `NoEditorView` if nothing is being edited.
    pub fn begin_save(&self, state_id: impl Into<String>) -> Result<EditorState> {
        let state = self.editor_state(state_id)?;
        self.emit_save_progress(SaveProgress::InProgress);
        Ok(state)
    }

    /// Announce the outcome of a save; a successful save clears the change flag
    pub fn finish_save(&mut self, succeeded: bool) {
        if succeeded {
            self.dirty = false;
            self.emit_save_progress(SaveProgress::CompletedSuccess);
        } else {
            self.emit_save_progress(SaveProgress::CompletedFailed);
        }
    }
}

#[derive(Clone, Copy)]
enum HistoryStep {
    Undo,
    Redo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn editing(name: &str) -> ViewEditorService {
        let mut service = ViewEditorService::default();
        service.set_editor_view(Some(ViewDefinition::new(name)), ViewEditorPart::Editor);
        service
    }

    fn add(path: &str, id: &str) -> Command {
        factory::create_add_sources_command(Some(vec![path.to_string()]), Some(id))
    }

    #[test]
    fn test_fire_applies_and_broadcasts() {
        let mut service = editing("v");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            service.subscribe(move |e| seen.borrow_mut().push(e.clone()))
        };

        service
            .fire_view_state_has_changed(ViewEditorPart::Canvas, add("c/a", "add-1"))
            .unwrap();

        assert!(service.has_changes());
        assert!(service.can_undo());
        assert_eq!(service.editor_view().unwrap().source_paths().len(), 1);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].source, ViewEditorPart::Canvas);
        assert_eq!(seen[0].commands(), [add("c/a", "add-1")]);
    }

    #[test]
    fn test_noop_is_ignored() {
        let mut service = editing("v");
        service
            .fire_view_state_has_changed(ViewEditorPart::Header, Command::NoOp)
            .unwrap();
        assert!(!service.can_undo());
        assert!(!service.has_changes());
    }

    #[test]
    fn test_read_only_rejects_changes() {
        let mut service = editing("v");
        service.set_read_only(true);

        let err = service
            .fire_view_state_has_changed(ViewEditorPart::Header, add("c/a", "add-1"))
            .unwrap_err();
        assert_eq!(err, ViewEditorError::ReadOnly);
        assert!(service.editor_view().unwrap().source_paths().is_empty());
    }

    #[test]
    fn test_no_view_rejects_changes() {
        let mut service = ViewEditorService::default();
        let err = service
            .fire_view_state_has_changed(ViewEditorPart::Header, add("c/a", "add-1"))
            .unwrap_err();
        assert_eq!(err, ViewEditorError::NoEditorView);
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut service = editing("v");
        service
            .fire_view_state_has_changed(ViewEditorPart::Editor, add("c/a", "add-1"))
            .unwrap();
        assert!(service.undo(ViewEditorPart::History).unwrap());
        assert!(service.can_redo());

        service
            .fire_view_state_has_changed(ViewEditorPart::Editor, add("c/b", "add-2"))
            .unwrap();
        assert!(!service.can_redo());
    }

    #[test]
    fn test_undo_redo_with_empty_history() {
        let mut service = editing("v");
        assert!(!service.undo(ViewEditorPart::History).unwrap());
        assert!(!service.redo(ViewEditorPart::History).unwrap());
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let config = EditorConfig {
            history_limit: 2,
            ..EditorConfig::default()
        };
        let mut service = ViewEditorService::new(&config);
        service.set_editor_view(Some(ViewDefinition::new("v")), ViewEditorPart::Editor);

        for (i, path) in ["c/a", "c/b", "c/c"].iter().enumerate() {
            service
                .fire_view_state_has_changed(ViewEditorPart::Editor, add(path, &format!("add-{i}")))
                .unwrap();
        }

        assert_eq!(service.undo_stack().len(), 2);
        assert_eq!(service.undo_stack()[0].redo().ident(), Some("add-1"));
    }

    #[test]
    fn test_save_lifecycle() {
        let mut service = editing("orders");
        service
            .fire_view_state_has_changed(ViewEditorPart::Editor, add("c/a", "add-1"))
            .unwrap();

        let progress = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let progress = Rc::clone(&progress);
            service.subscribe(move |e| {
                if let ViewEditorEventKind::SaveProgressChanged { progress: p, view_name } = &e.kind {
                    progress.borrow_mut().push((*p, view_name.clone()));
                }
            })
        };

        let state = service.begin_save("orders-state").unwrap();
        assert_eq!(state.undoables.len(), 1);
        service.finish_save(false);
        assert!(service.has_changes());
        service.finish_save(true);
        assert!(!service.has_changes());

        let name = Some("orders".to_string());
        assert_eq!(
            *progress.borrow(),
            vec![
                (SaveProgress::InProgress, name.clone()),
                (SaveProgress::CompletedFailed, name.clone()),
                (SaveProgress::CompletedSuccess, name),
            ]
        );
    }

    #[test]
    fn test_restore_keeps_history() {
        let mut service = editing("v");
        service
            .fire_view_state_has_changed(ViewEditorPart::Editor, add("c/a", "add-1"))
            .unwrap();
        let state = service.editor_state("v-state").unwrap();

        let mut resumed = ViewEditorService::default();
        resumed.restore_editor_state(state, ViewEditorPart::Editor);
        assert!(!resumed.has_changes());
        assert!(resumed.undo(ViewEditorPart::History).unwrap());
        assert!(resumed.editor_view().unwrap().source_paths().is_empty());
    }

    #[test]
    fn test_new_view_starts_new_session() {
        let mut service = editing("v");
        let first = service.session_id().clone();

        service
            .fire_view_state_has_changed(ViewEditorPart::Editor, add("c/a", "add-1"))
            .unwrap();
        assert_eq!(service.session_id(), &first);

        service.set_editor_view(Some(ViewDefinition::new("w")), ViewEditorPart::Editor);
        assert_ne!(service.session_id(), &first);
    }

    #[test]
    fn test_undo_after_partial_duplicate_add_keeps_existing_source() {
        // Given: a view already holding conn1/tableA
        let mut service = editing("v");
        service
            .fire_view_state_has_changed(ViewEditorPart::Editor, add("conn1/tableA", "add-1"))
            .unwrap();

        // When: adding tableA again together with tableB, then undoing
        let both = factory::create_add_sources_command(
            Some(vec!["conn1/tableA".to_string(), "conn1/tableB".to_string()]),
            Some("add-2"),
        );
        service
            .fire_view_state_has_changed(ViewEditorPart::Editor, both)
            .unwrap();
        assert_eq!(service.undo_stack().len(), 2);
        assert!(service.undo(ViewEditorPart::Editor).unwrap());

        // Then: only tableB is removed
        assert_eq!(
            service.editor_view().unwrap().source_paths(),
            ["conn1/tableA".to_string()]
        );
    }

    #[test]
    fn test_change_that_leaves_view_unchanged_is_not_recorded() {
        let mut service = editing("v");
        let seen = Rc::new(RefCell::new(0));
        let _sub = {
            let seen = Rc::clone(&seen);
            service.subscribe(move |_| *seen.borrow_mut() += 1)
        };

        let absent = factory::create_remove_sources_command(
            Some(vec!["conn1/missing".to_string()]),
            Some("add-9"),
        )
        .unwrap();
        service
            .fire_view_state_has_changed(ViewEditorPart::Editor, absent)
            .unwrap();

        assert!(service.undo_stack().is_empty());
        assert!(!service.has_changes());
        assert_eq!(*seen.borrow(), 0);
    }
}

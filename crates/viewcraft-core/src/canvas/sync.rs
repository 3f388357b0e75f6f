//! Keeps the canvas graph in step with the editor document
//!
//! The canvas never reads the document directly. It replays the structural
//! commands carried by editor events, so applying a command twice, or
//! replaying a whole view on load, has to converge on the same graph.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::graph::CanvasGraph;
use super::notification::SaveNotification;
use crate::commands::{factory, Command};
use crate::config::EditorConfig;
use crate::editor::{
    EventBus, SaveProgress, Subscription, ViewEditorEvent, ViewEditorEventKind, ViewEditorPart,
};
use crate::model::ViewDefinition;

/// Events raised by user interaction with the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasEvent {
    CreateSource,
    CreateComposition { source_path: Option<String> },
    DeleteNode { node_ids: Vec<String> },
    SelectionChanged { node_ids: Vec<String> },
}

impl From<CanvasEvent> for ViewEditorEventKind {
    fn from(event: CanvasEvent) -> Self {
        match event {
            CanvasEvent::CreateSource => ViewEditorEventKind::CreateSource,
            CanvasEvent::CreateComposition { source_path } => {
                ViewEditorEventKind::CreateComposition { source_path }
            }
            CanvasEvent::DeleteNode { node_ids } => ViewEditorEventKind::DeleteNode { node_ids },
            CanvasEvent::SelectionChanged { node_ids } => {
                ViewEditorEventKind::CanvasSelectionChanged { node_ids }
            }
        }
    }
}

pub struct ViewCanvas {
    graph: CanvasGraph,
    selection: Vec<String>,
    notification: Option<SaveNotification>,
    dismiss_after: Duration,
    saving_view_name: Option<String>,
    events: EventBus<CanvasEvent>,
}

impl Default for ViewCanvas {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl ViewCanvas {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            graph: CanvasGraph::new(),
            selection: Vec::new(),
            notification: None,
            dismiss_after: config.notification_dismiss_after(),
            saving_view_name: None,
            events: EventBus::new(),
        }
    }

    pub fn graph(&self) -> &CanvasGraph {
        &self.graph
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Current save banner, if one is showing
    pub fn notification(&self) -> Option<&SaveNotification> {
        self.notification.as_ref()
    }

    /// Hide the save banner (called once its dismiss delay has elapsed)
    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Bus carrying [`CanvasEvent`]s raised on this canvas
    pub fn events(&self) -> EventBus<CanvasEvent> {
        self.events.clone()
    }

    pub fn handle_editor_event(&mut self, event: &ViewEditorEvent) {
        match &event.kind {
            ViewEditorEventKind::EditedViewSet { view } => self.init_canvas(view.as_ref()),
            ViewEditorEventKind::ViewStateChanged { commands } => {
                for cmd in commands {
                    self.view_state_changed(cmd);
                }
            }
            ViewEditorEventKind::SaveProgressChanged {
                progress,
                view_name,
            } => self.save_progress_changed(*progress, view_name.as_deref()),
            ViewEditorEventKind::CreateSource
            | ViewEditorEventKind::CreateComposition { .. }
            | ViewEditorEventKind::DeleteNode { .. }
            | ViewEditorEventKind::CanvasSelectionChanged { .. } => {}
        }
    }

    /// Clear the canvas and rebuild it from `view`
    ///
    /// Compositions are replayed first, then each source path as its own add
    /// command; links are created as the source nodes appear.
    pub fn init_canvas(&mut self, view: Option<&ViewDefinition>) {
        self.graph.clear();
        self.selection.clear();

        let Some(view) = view else {
            return;
        };

        for composition in view.compositions() {
            match factory::create_add_composition_command(Some(composition.clone().into()), None) {
                Ok(cmd) => self.view_state_changed(&cmd),
                Err(e) => tracing::warn!(error = %e, "skipping composition on canvas init"),
            }
        }
        for source_path in view.source_paths() {
            let cmd = factory::create_add_sources_command(Some(vec![source_path.clone()]), None);
            self.view_state_changed(&cmd);
        }

        tracing::debug!(
            node_count = self.graph.node_count(),
            link_count = self.graph.link_count(),
            "canvas initialised"
        );
    }

    /// Mirror one structural command on the canvas; other kinds are ignored
    pub fn view_state_changed(&mut self, cmd: &Command) {
        let command_id = cmd.id();
        match cmd {
            Command::AddSources { source_paths, .. } => {
                for source_path in source_paths {
                    let Some(node) = self.graph.add_source_node(&command_id, source_path) else {
                        continue;
                    };
                    for composition in self.graph.compositions_referencing(source_path) {
                        self.graph.link(composition, node);
                    }
                }
            }
            Command::RemoveSources { source_paths, .. } => {
                for source_path in source_paths {
                    if !self.graph.remove_source(source_path) {
                        tracing::debug!(source_path = %source_path, "no canvas node to remove");
                    }
                }
            }
            Command::AddComposition { composition, .. } => {
                let Some(name) = composition.name() else {
                    tracing::warn!(command_id = %command_id, "composition without a name");
                    return;
                };
                let Some(node) = self.graph.add_composition_node(&command_id, name, composition)
                else {
                    return;
                };
                let sides = [composition.left_source_path(), composition.right_source_path()];
                for source_path in sides.into_iter().flatten() {
                    if let Some(source) = self.graph.source_node(source_path) {
                        self.graph.link(node, source);
                    }
                }
            }
            Command::RemoveComposition { composition, .. } => {
                let removed = composition
                    .name()
                    .is_some_and(|name| self.graph.remove_composition(name));
                if !removed {
                    tracing::debug!(command_id = %command_id, "no canvas node to remove");
                }
            }
            Command::UpdateViewName { .. }
            | Command::UpdateViewDescription { .. }
            | Command::UpdateProjectedColumns { .. }
            | Command::NoOp => {}
        }
    }

    fn save_progress_changed(&mut self, progress: SaveProgress, view_name: Option<&str>) {
        if progress == SaveProgress::InProgress {
            self.saving_view_name = view_name.map(str::to_string);
        }
        let name = self.saving_view_name.as_deref().or(view_name);
        self.notification = Some(SaveNotification::for_progress(
            progress,
            name,
            self.dismiss_after,
        ));
    }

    fn note_raised(&mut self, event: &CanvasEvent) {
        match event {
            CanvasEvent::SelectionChanged { node_ids } => self.selection = node_ids.clone(),
            CanvasEvent::DeleteNode { node_ids } => {
                self.selection.retain(|id| !node_ids.contains(id));
            }
            CanvasEvent::CreateSource | CanvasEvent::CreateComposition { .. } => {}
        }
    }
}

/// Subscriptions tying a canvas to an editor bus
///
/// Dropping the activation (or calling [`CanvasActivation::deactivate`])
/// detaches the canvas; no handler outlives it.
pub struct CanvasActivation {
    canvas: Rc<RefCell<ViewCanvas>>,
    canvas_events: EventBus<CanvasEvent>,
    subscriptions: Vec<Subscription>,
}

/// Attach `canvas` to `editor_events`
///
/// Editor events update the canvas; canvas events are forwarded to the
/// editor bus with [`ViewEditorPart::Canvas`] as their source.
pub fn activate(
    canvas: &Rc<RefCell<ViewCanvas>>,
    editor_events: &EventBus<ViewEditorEvent>,
) -> CanvasActivation {
    let canvas_events = canvas.borrow().events();

    let on_editor_event = {
        let canvas = Rc::downgrade(canvas);
        editor_events.subscribe(move |event| {
            let relevant = event.is_edited_view_set()
                || event.is_view_state_changed()
                || event.is_save_progress_changed();
            if !relevant {
                return;
            }
            let Some(canvas) = canvas.upgrade() else {
                return;
            };
            match canvas.try_borrow_mut() {
                Ok(mut canvas) => canvas.handle_editor_event(event),
                Err(_) => tracing::warn!("canvas busy; dropped editor event"),
            };
        })
    };

    let forward = {
        let editor_events = editor_events.clone();
        canvas_events.subscribe(move |event| {
            editor_events.emit(&ViewEditorEvent::new(
                ViewEditorPart::Canvas,
                event.clone().into(),
            ));
        })
    };

    CanvasActivation {
        canvas: Rc::clone(canvas),
        canvas_events,
        subscriptions: vec![on_editor_event, forward],
    }
}

impl CanvasActivation {
    pub fn canvas(&self) -> &Rc<RefCell<ViewCanvas>> {
        &self.canvas
    }

    /// Raise a user-interaction event from the canvas
    pub fn raise(&self, event: CanvasEvent) {
        self.canvas.borrow_mut().note_raised(&event);
        self.canvas_events.emit(&event);
    }

    pub fn is_active(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn deactivate(mut self) {
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Composition;

    fn add_sources(paths: &[&str], id: &str) -> Command {
        factory::create_add_sources_command(
            Some(paths.iter().map(|p| p.to_string()).collect()),
            Some(id),
        )
    }

    fn join() -> Composition {
        Composition::new("join1")
            .with_left("conn1/tableA", "id")
            .with_right("conn1/tableB", "a_id")
    }

    #[test]
    fn test_add_sources_twice_creates_one_node() {
        let mut canvas = ViewCanvas::default();
        let cmd = add_sources(&["conn1/tableA"], "add-1");
        canvas.view_state_changed(&cmd);
        canvas.view_state_changed(&cmd);

        assert_eq!(canvas.graph().node_count(), 1);
        assert_eq!(canvas.graph().link_count(), 0);
    }

    #[test]
    fn test_present_path_does_not_stop_later_paths() {
        let mut canvas = ViewCanvas::default();
        canvas.view_state_changed(&add_sources(&["conn1/tableA"], "add-1"));
        canvas.view_state_changed(&add_sources(&["conn1/tableA", "conn1/tableB"], "add-2"));

        assert_eq!(canvas.graph().node_count(), 2);
    }

    #[test]
    fn test_composition_links_once() {
        let mut canvas = ViewCanvas::default();
        canvas.view_state_changed(&add_sources(&["conn1/tableA", "conn1/tableB"], "add-1"));
        let add = factory::create_add_composition_command(Some(join().into()), Some("add-2")).unwrap();

        canvas.view_state_changed(&add);
        canvas.view_state_changed(&add);

        assert_eq!(canvas.graph().node_count(), 3);
        assert_eq!(canvas.graph().link_count(), 2);
    }

    #[test]
    fn test_source_added_after_composition_is_linked() {
        let mut canvas = ViewCanvas::default();
        let add = factory::create_add_composition_command(Some(join().into()), Some("c")).unwrap();
        canvas.view_state_changed(&add);
        assert_eq!(canvas.graph().link_count(), 0);

        canvas.view_state_changed(&add_sources(&["conn1/tableB"], "s"));
        assert_eq!(canvas.graph().link_count(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut canvas = ViewCanvas::default();
        let remove =
            factory::create_remove_sources_command(Some(vec!["conn1/tableZ".to_string()]), Some("x"))
                .unwrap();
        canvas.view_state_changed(&remove);
        assert!(canvas.graph().is_empty());
    }

    #[test]
    fn test_save_notifications_keep_in_progress_name() {
        let mut canvas = ViewCanvas::default();
        canvas.save_progress_changed(SaveProgress::InProgress, Some("orders"));
        assert_eq!(
            canvas.notification().map(|n| n.message.as_str()),
            Some("View save in progress for 'orders'")
        );

        canvas.save_progress_changed(SaveProgress::CompletedSuccess, Some("renamed"));
        let notification = canvas.notification().unwrap();
        assert_eq!(notification.message, "View save SUCCESS for 'orders'");
        assert_eq!(notification.dismiss_after, Some(Duration::from_secs(8)));

        canvas.dismiss_notification();
        assert!(canvas.notification().is_none());
    }

    fn changed(cmd: Command) -> ViewEditorEvent {
        ViewEditorEvent::new(
            ViewEditorPart::Editor,
            ViewEditorEventKind::ViewStateChanged {
                commands: vec![cmd],
            },
        )
    }

    #[test]
    fn test_activated_canvas_follows_editor_events() {
        let bus = EventBus::new();
        let canvas = Rc::new(RefCell::new(ViewCanvas::default()));
        let activation = activate(&canvas, &bus);

        bus.emit(&changed(add_sources(&["conn1/tableA"], "add-1")));
        assert_eq!(canvas.borrow().graph().node_count(), 1);

        // A canvas already borrowed drops the event instead of panicking
        {
            let _held = canvas.borrow_mut();
            bus.emit(&changed(add_sources(&["conn1/tableB"], "add-2")));
        }
        assert_eq!(canvas.borrow().graph().node_count(), 1);

        activation.deactivate();
        bus.emit(&changed(add_sources(&["conn1/tableC"], "add-3")));
        assert_eq!(canvas.borrow().graph().node_count(), 1);
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use viewcraft_core::canvas::{activate, CanvasActivation, ViewCanvas};
use viewcraft_core::commands::factory;
use viewcraft_core::{Command, Composition, ViewDefinition, ViewEditorPart, ViewEditorService};

/// A service editing an empty view named `name`
#[allow(dead_code)]
pub fn editing(name: &str) -> ViewEditorService {
    let mut service = ViewEditorService::default();
    service.set_editor_view(Some(ViewDefinition::new(name)), ViewEditorPart::Editor);
    service
}

/// A service with a canvas attached to its bus; the view is set after
/// activation so the canvas sees it
#[allow(dead_code)]
pub fn editing_with_canvas(name: &str) -> (ViewEditorService, CanvasActivation) {
    let mut service = ViewEditorService::default();
    let canvas = Rc::new(RefCell::new(ViewCanvas::default()));
    let activation = activate(&canvas, service.events());
    service.set_editor_view(Some(ViewDefinition::new(name)), ViewEditorPart::Editor);
    (service, activation)
}

#[allow(dead_code)]
pub fn add_sources(paths: &[&str], id: &str) -> Command {
    factory::create_add_sources_command(
        Some(paths.iter().map(|p| p.to_string()).collect()),
        Some(id),
    )
}

#[allow(dead_code)]
pub fn join(name: &str, left: &str, right: &str) -> Composition {
    Composition::new(name)
        .with_left(left, "id")
        .with_right(right, "ref_id")
}

#[allow(dead_code)]
pub fn add_composition(composition: Composition, id: &str) -> Command {
    factory::create_add_composition_command(Some(composition.into()), Some(id))
        .expect("composition command")
}

//! Replay command
//!
//! Usage: viewcraft replay <FILE> [--config <FILE>]
//!
//! Loads a saved editor state, starts from an empty view carrying only the
//! saved view's name, and dispatches the redo side of every saved undoable
//! through the editor with a canvas attached.

use clap::Args;
use serde_json::json;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use viewcraft_core::canvas::{activate, ViewCanvas};
use viewcraft_core::{EditorConfig, EditorState, ViewDefinition, ViewEditorPart, ViewEditorService};

use super::{read_json, CliResult};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Saved editor state (`-` for stdin)
    pub file: PathBuf,
}

pub fn execute(args: ReplayArgs, config_path: Option<&Path>) -> CliResult {
    let config = match config_path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let state: EditorState = serde_json::from_value(read_json(&args.file)?)?;

    let mut service = ViewEditorService::new(&config);
    let canvas = Rc::new(RefCell::new(ViewCanvas::new(&config)));
    let activation = activate(&canvas, service.events());

    let mut start = ViewDefinition::default();
    start.set_name(state.view.name());
    service.set_editor_view(Some(start), ViewEditorPart::Editor);

    for undoable in &state.undoables {
        eprintln!("replay {}", undoable.redo().id());
        service.fire_view_state_has_changed(ViewEditorPart::History, undoable.redo().clone())?;
    }

    let replayed = service
        .editor_view()
        .cloned()
        .ok_or("no view after replay")?;
    let shape = activation.canvas().borrow().graph().shape();
    let links: Vec<_> = shape
        .links
        .iter()
        .map(|(source, composition)| json!({ "source": source, "composition": composition }))
        .collect();

    let report = json!({
        "stateId": state.id,
        "commands": state.undoables.len(),
        "view": replayed,
        "canvas": {
            "sources": shape.sources,
            "compositions": shape.compositions,
            "links": links,
        },
        "matchesSavedView": same_content(&replayed, &state.view),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    activation.deactivate();
    Ok(())
}

/// Equal documents, ignoring the order of sources and compositions
fn same_content(a: &ViewDefinition, b: &ViewDefinition) -> bool {
    let mut a_paths = a.source_paths().to_vec();
    let mut b_paths = b.source_paths().to_vec();
    a_paths.sort();
    b_paths.sort();

    let mut a_comps = a.compositions().to_vec();
    let mut b_comps = b.compositions().to_vec();
    a_comps.sort_by(|x, y| x.name().cmp(&y.name()));
    b_comps.sort_by(|x, y| x.name().cmp(&y.name()));

    a.name() == b.name()
        && a.description() == b.description()
        && a.projected_columns() == b.projected_columns()
        && a_paths == b_paths
        && a_comps == b_comps
}

//! Command factory
//!
//! All construction, inversion and decoding rules for commands live here.
//! Every function returns either a valid [`Command`] or an explicit
//! [`ViewEditorError`]; nothing panics on bad input.

use serde_json::{Map, Value};
use uuid::Uuid;

use super::undoable::Undoable;
use super::wire::{ARGS_PROP, ID_PROP};
use super::{args, Command, CommandKind};
use crate::errors::{Result, ViewEditorError};
use crate::model::{Composition, ProjectedColumn};

/// A composition argument, either live or in its serialized form
#[derive(Debug, Clone, PartialEq)]
pub enum CompositionInput {
    Object(Composition),
    Serialized(String),
}

impl CompositionInput {
    fn normalize(self) -> Result<Composition> {
        match self {
            CompositionInput::Object(composition) => Ok(composition),
            CompositionInput::Serialized(json) => Composition::from_json_str(&json),
        }
    }
}

impl From<Composition> for CompositionInput {
    fn from(composition: Composition) -> Self {
        CompositionInput::Object(composition)
    }
}

impl From<&str> for CompositionInput {
    fn from(json: &str) -> Self {
        CompositionInput::Serialized(json.to_string())
    }
}

impl From<String> for CompositionInput {
    fn from(json: String) -> Self {
        CompositionInput::Serialized(json)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn new_ident() -> String {
    Uuid::now_v7().to_string()
}

fn required_ident(kind: CommandKind, id: Option<&str>) -> Result<String> {
    present(id)
        .map(str::to_string)
        .ok_or_else(|| ViewEditorError::MissingIdentifier {
            kind: kind.as_str().to_string(),
        })
}

// ========== Construction ==========

/// NoOp if `sources` is absent or empty; an ident is generated when `id` is absent
pub fn create_add_sources_command(sources: Option<Vec<String>>, id: Option<&str>) -> Command {
    match sources {
        Some(source_paths) if !source_paths.is_empty() => Command::AddSources {
            source_paths,
            ident: present(id).map(str::to_string).unwrap_or_else(new_ident),
        },
        _ => Command::NoOp,
    }
}

/// NoOp if `sources` is absent or empty
///
/// # Errors
///
/// Returns `MissingIdentifier` when there are sources but no `id` of the add
/// command being reversed.
pub fn create_remove_sources_command(
    sources: Option<Vec<String>>,
    id: Option<&str>,
) -> Result<Command> {
    match sources {
        Some(source_paths) if !source_paths.is_empty() => Ok(Command::RemoveSources {
            source_paths,
            ident: required_ident(CommandKind::RemoveSources, id)?,
        }),
        _ => Ok(Command::NoOp),
    }
}

/// NoOp if `composition` is absent
///
/// # Errors
///
/// Returns `InvalidComposition` when a serialized composition cannot be parsed.
pub fn create_add_composition_command(
    composition: Option<CompositionInput>,
    id: Option<&str>,
) -> Result<Command> {
    match composition {
        Some(input) => Ok(Command::AddComposition {
            composition: input.normalize()?,
            ident: present(id).map(str::to_string).unwrap_or_else(new_ident),
        }),
        None => Ok(Command::NoOp),
    }
}

/// NoOp if `composition` is absent
///
/// # Errors
///
/// Returns `InvalidComposition` when a serialized composition cannot be
/// parsed, or `MissingIdentifier` when `id` is absent.
pub fn create_remove_composition_command(
    composition: Option<CompositionInput>,
    id: Option<&str>,
) -> Result<Command> {
    match composition {
        Some(input) => Ok(Command::RemoveComposition {
            composition: input.normalize()?,
            ident: required_ident(CommandKind::RemoveComposition, id)?,
        }),
        None => Ok(Command::NoOp),
    }
}

/// Empty strings count as absent; equal values yield NoOp
///
/// # Errors
///
/// Returns `EmptyUpdate` when both names are absent.
pub fn create_update_view_name_command(
    new_name: Option<&str>,
    old_name: Option<&str>,
) -> Result<Command> {
    match (present(new_name), present(old_name)) {
        (None, None) => Err(ViewEditorError::EmptyUpdate {
            kind: CommandKind::UpdateViewName.as_str().to_string(),
        }),
        (new, old) if new == old => Ok(Command::NoOp),
        (new, old) => Ok(Command::UpdateViewName {
            new_name: new.map(str::to_string),
            old_name: old.map(str::to_string),
        }),
    }
}

/// Empty strings count as absent; equal values yield NoOp
///
/// # Errors
///
/// Returns `EmptyUpdate` when both descriptions are absent.
pub fn create_update_view_description_command(
    new_description: Option<&str>,
    old_description: Option<&str>,
) -> Result<Command> {
    match (present(new_description), present(old_description)) {
        (None, None) => Err(ViewEditorError::EmptyUpdate {
            kind: CommandKind::UpdateViewDescription.as_str().to_string(),
        }),
        (new, old) if new == old => Ok(Command::NoOp),
        (new, old) => Ok(Command::UpdateViewDescription {
            new_description: new.map(str::to_string),
            old_description: old.map(str::to_string),
        }),
    }
}

/// NoOp unless both column lists are supplied and they differ
pub fn create_update_projected_columns_command(
    new_columns: Option<Vec<ProjectedColumn>>,
    old_columns: Option<Vec<ProjectedColumn>>,
) -> Command {
    match (new_columns, old_columns) {
        (Some(new_columns), Some(old_columns)) if new_columns != old_columns => {
            Command::UpdateProjectedColumns {
                new_columns,
                old_columns,
            }
        }
        _ => Command::NoOp,
    }
}

pub fn create_no_op_command() -> Command {
    Command::NoOp
}

// ========== Inversion ==========

/// The command reversing `cmd`
///
/// Add/remove pairs keep the same ident so the inverse addresses the same
/// canvas element; update commands swap old and new.
///
/// # Errors
///
/// Returns `NotInvertible` for NoOp.
pub fn create_undo_command(cmd: &Command) -> Result<Command> {
    match cmd {
        Command::AddSources {
            source_paths,
            ident,
        } => create_remove_sources_command(Some(source_paths.clone()), Some(ident)),
        Command::RemoveSources {
            source_paths,
            ident,
        } => Ok(create_add_sources_command(
            Some(source_paths.clone()),
            Some(ident),
        )),
        Command::AddComposition { composition, ident } => create_remove_composition_command(
            Some(CompositionInput::Object(composition.clone())),
            Some(ident),
        ),
        Command::RemoveComposition { composition, ident } => create_add_composition_command(
            Some(CompositionInput::Object(composition.clone())),
            Some(ident),
        ),
        Command::UpdateViewName { new_name, old_name } => {
            create_update_view_name_command(old_name.as_deref(), new_name.as_deref())
        }
        Command::UpdateViewDescription {
            new_description,
            old_description,
        } => create_update_view_description_command(
            old_description.as_deref(),
            new_description.as_deref(),
        ),
        Command::UpdateProjectedColumns {
            new_columns,
            old_columns,
        } => Ok(create_update_projected_columns_command(
            Some(old_columns.clone()),
            Some(new_columns.clone()),
        )),
        Command::NoOp => Err(ViewEditorError::NotInvertible {
            command_id: cmd.id(),
        }),
    }
}

/// Pair `cmd` (as redo) with its inverse (as undo)
///
/// # Errors
///
/// Returns `NotInvertible` when `cmd` is not undoable.
pub fn create_undoable(cmd: Command) -> Result<Undoable> {
    if !cmd.is_undoable() {
        return Err(ViewEditorError::NotInvertible {
            command_id: cmd.id(),
        });
    }
    let undo = create_undo_command(&cmd)?;
    Ok(Undoable::new(undo, cmd))
}

// ========== Decoding ==========

fn missing(kind: CommandKind, arg: &str) -> ViewEditorError {
    ViewEditorError::MissingArgument {
        kind: kind.as_str().to_string(),
        arg: arg.to_string(),
    }
}

fn invalid(kind: CommandKind, arg: &str, reason: impl Into<String>) -> ViewEditorError {
    ViewEditorError::InvalidArgument {
        kind: kind.as_str().to_string(),
        arg: arg.to_string(),
        reason: reason.into(),
    }
}

/// Null and empty strings are treated the same as a missing key
fn lookup<'a>(args: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    match args.get(name) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value),
    }
}

fn string_arg(kind: CommandKind, args: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match lookup(args, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid(kind, name, format!("expected a string, found {other}"))),
    }
}

/// Source paths arrive either as a JSON array or as one comma-separated string
fn source_paths_arg(
    kind: CommandKind,
    args: &Map<String, Value>,
    name: &str,
) -> Result<Option<Vec<String>>> {
    match lookup(args, name) {
        None => Ok(None),
        Some(Value::String(joined)) => Ok(Some(
            joined
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(path) => Ok(path.clone()),
                other => Err(invalid(kind, name, format!("expected a path, found {other}"))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(other) => Err(invalid(kind, name, format!("expected a path list, found {other}"))),
    }
}

fn composition_arg(
    kind: CommandKind,
    args: &Map<String, Value>,
    name: &str,
) -> Result<Option<CompositionInput>> {
    match lookup(args, name) {
        None => Ok(None),
        Some(Value::String(json)) => Ok(Some(CompositionInput::Serialized(json.clone()))),
        Some(object @ Value::Object(_)) => serde_json::from_value::<Composition>(object.clone())
            .map(|c| Some(CompositionInput::Object(c)))
            .map_err(|e| invalid(kind, name, e.to_string())),
        Some(other) => Err(invalid(kind, name, format!("expected a composition, found {other}"))),
    }
}

fn columns_arg(
    kind: CommandKind,
    args: &Map<String, Value>,
    name: &str,
) -> Result<Option<Vec<ProjectedColumn>>> {
    let parsed = match lookup(args, name) {
        None => return Ok(None),
        Some(Value::String(json)) => serde_json::from_str::<Vec<ProjectedColumn>>(json),
        Some(value) => serde_json::from_value::<Vec<ProjectedColumn>>(value.clone()),
    };
    parsed
        .map(Some)
        .map_err(|e| invalid(kind, name, e.to_string()))
}

/// Reconstruct a command from its wire form
///
/// # Errors
///
/// Returns `MalformedJson` if `json` is not a command object, `UnknownCommand`
/// for an unrecognised discriminator, and `MissingArgument` or
/// `InvalidArgument` naming the kind and argument at fault.
pub fn decode(json: &Value) -> Result<Command> {
    let object = json.as_object().ok_or_else(|| ViewEditorError::MalformedJson {
        reason: format!("expected a command object, found {json}"),
    })?;

    let discriminator = object
        .get(ID_PROP)
        .and_then(Value::as_str)
        .ok_or_else(|| ViewEditorError::MalformedJson {
            reason: format!("command has no '{ID_PROP}' discriminator"),
        })?;

    let kind = CommandKind::parse(discriminator).ok_or_else(|| ViewEditorError::UnknownCommand {
        discriminator: discriminator.to_string(),
    })?;

    let empty = Map::new();
    let args = match object.get(ARGS_PROP) {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(args)) => args,
        Some(other) => {
            return Err(ViewEditorError::MalformedJson {
                reason: format!("'{ARGS_PROP}' of {kind} must be an object, found {other}"),
            })
        }
    };

    match kind {
        CommandKind::AddSources => {
            let paths = source_paths_arg(kind, args, args::ADDED_SOURCE_PATHS)?
                .ok_or_else(|| missing(kind, args::ADDED_SOURCE_PATHS))?;
            let ident = string_arg(kind, args, args::IDENT)?;
            Ok(create_add_sources_command(Some(paths), ident.as_deref()))
        }
        CommandKind::RemoveSources => {
            let paths = source_paths_arg(kind, args, args::REMOVED_SOURCE_PATHS)?
                .ok_or_else(|| missing(kind, args::REMOVED_SOURCE_PATHS))?;
            let ident = string_arg(kind, args, args::IDENT)?
                .ok_or_else(|| missing(kind, args::IDENT))?;
            create_remove_sources_command(Some(paths), Some(&ident))
        }
        CommandKind::AddComposition => {
            let composition = composition_arg(kind, args, args::ADDED_COMPOSITION)?
                .ok_or_else(|| missing(kind, args::ADDED_COMPOSITION))?;
            let ident = string_arg(kind, args, args::IDENT)?;
            create_add_composition_command(Some(composition), ident.as_deref())
        }
        CommandKind::RemoveComposition => {
            let composition = composition_arg(kind, args, args::REMOVED_COMPOSITION)?
                .ok_or_else(|| missing(kind, args::REMOVED_COMPOSITION))?;
            let ident = string_arg(kind, args, args::IDENT)?
                .ok_or_else(|| missing(kind, args::IDENT))?;
            create_remove_composition_command(Some(composition), Some(&ident))
        }
        CommandKind::UpdateViewName => {
            let new_name = string_arg(kind, args, args::NEW_NAME)?;
            let old_name = string_arg(kind, args, args::OLD_NAME)?;
            if new_name.is_none() && old_name.is_none() {
                return Err(missing(kind, args::NEW_NAME));
            }
            create_update_view_name_command(new_name.as_deref(), old_name.as_deref())
        }
        CommandKind::UpdateViewDescription => {
            let new_description = string_arg(kind, args, args::NEW_DESCRIPTION)?;
            let old_description = string_arg(kind, args, args::OLD_DESCRIPTION)?;
            if new_description.is_none() && old_description.is_none() {
                return Err(missing(kind, args::NEW_DESCRIPTION));
            }
            create_update_view_description_command(
                new_description.as_deref(),
                old_description.as_deref(),
            )
        }
        CommandKind::UpdateProjectedColumns => {
            let new_columns = columns_arg(kind, args, args::NEW_PROJECTED_COLUMNS)?
                .ok_or_else(|| missing(kind, args::NEW_PROJECTED_COLUMNS))?;
            let old_columns = columns_arg(kind, args, args::OLD_PROJECTED_COLUMNS)?
                .ok_or_else(|| missing(kind, args::OLD_PROJECTED_COLUMNS))?;
            Ok(create_update_projected_columns_command(
                Some(new_columns),
                Some(old_columns),
            ))
        }
        CommandKind::NoOp => Ok(Command::NoOp),
    }
}

/// Parse and decode a command from JSON text
///
/// # Errors
///
/// Returns `MalformedJson` for unparseable text, otherwise as [`decode`].
pub fn decode_str(json: &str) -> Result<Command> {
    let value: Value = serde_json::from_str(json)?;
    decode(&value)
}

/// `null` and `{}` mark an absent side of an undoable
fn undoable_side(json: &Map<String, Value>, side: &str) -> Result<Option<Command>> {
    match json.get(side) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => decode(value)
            .map(Some)
            .map_err(|e| ViewEditorError::InvalidUndoable {
                reason: format!("Unable to decode {side} command: {e}"),
            }),
    }
}

/// Reconstruct an undoable from `{ "undo": ..., "redo": ... }`
///
/// A side that is missing, `null` or `{}` is absent; when only one side is
/// present the other is derived by inversion.
///
/// # Errors
///
/// Returns `InvalidUndoable` when either side fails to decode, when both are
/// absent, or when the present side cannot be inverted.
pub fn decode_undoable(json: &Value) -> Result<Undoable> {
    let object = json
        .as_object()
        .ok_or_else(|| ViewEditorError::InvalidUndoable {
            reason: format!("expected an undoable object, found {json}"),
        })?;

    let undo = undoable_side(object, Undoable::UNDO_PROP)?;
    let redo = undoable_side(object, Undoable::REDO_PROP)?;

    let derive = |known: &Command| {
        create_undo_command(known).map_err(|e| ViewEditorError::InvalidUndoable {
            reason: e.to_string(),
        })
    };

    match (undo, redo) {
        (Some(undo), Some(redo)) => Ok(Undoable::new(undo, redo)),
        (Some(undo), None) => {
            let redo = derive(&undo)?;
            Ok(Undoable::new(undo, redo))
        }
        (None, Some(redo)) => {
            let undo = derive(&redo)?;
            Ok(Undoable::new(undo, redo))
        }
        (None, None) => Err(ViewEditorError::InvalidUndoable {
            reason: "neither an undo nor a redo command is present".to_string(),
        }),
    }
}

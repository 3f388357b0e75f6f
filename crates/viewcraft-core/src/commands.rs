//! Command model for the view editor
//!
//! A [`Command`] is an immutable description of one document mutation. The
//! set of kinds is closed: adding a kind forces every dispatch site (inverse,
//! decode, encode, apply, canvas sync) to handle it.
//!
//! Commands are built through the [`factory`] functions, which validate the
//! arguments and substitute [`Command::NoOp`] where a mutation would be empty.

pub mod factory;
pub mod undoable;
pub mod wire;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::{Composition, ProjectedColumn};

pub use factory::CompositionInput;
pub use undoable::Undoable;

/// Argument names used in the wire form
pub mod args {
    pub const IDENT: &str = "ident";
    pub const ADDED_SOURCE_PATHS: &str = "addedSourcePaths";
    pub const REMOVED_SOURCE_PATHS: &str = "removedSourcePaths";
    pub const ADDED_COMPOSITION: &str = "addedComposition";
    pub const REMOVED_COMPOSITION: &str = "removedComposition";
    pub const NEW_NAME: &str = "newName";
    pub const OLD_NAME: &str = "oldName";
    pub const NEW_DESCRIPTION: &str = "newDescription";
    pub const OLD_DESCRIPTION: &str = "oldDescription";
    pub const NEW_PROJECTED_COLUMNS: &str = "newProjectedColumns";
    pub const OLD_PROJECTED_COLUMNS: &str = "oldProjectedColumns";
}

/// Discriminator of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    AddSources,
    RemoveSources,
    AddComposition,
    RemoveComposition,
    UpdateViewName,
    UpdateViewDescription,
    UpdateProjectedColumns,
    NoOp,
}

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::AddSources,
        CommandKind::RemoveSources,
        CommandKind::AddComposition,
        CommandKind::RemoveComposition,
        CommandKind::UpdateViewName,
        CommandKind::UpdateViewDescription,
        CommandKind::UpdateProjectedColumns,
        CommandKind::NoOp,
    ];

    /// Wire discriminator
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::AddSources => "AddSourcesCommand",
            CommandKind::RemoveSources => "RemoveSourcesCommand",
            CommandKind::AddComposition => "AddCompositionCommand",
            CommandKind::RemoveComposition => "RemoveCompositionCommand",
            CommandKind::UpdateViewName => "UpdateViewNameCommand",
            CommandKind::UpdateViewDescription => "UpdateViewDescriptionCommand",
            CommandKind::UpdateProjectedColumns => "UpdateProjectedColumnsCommand",
            CommandKind::NoOp => "NoOpCommand",
        }
    }

    pub fn parse(discriminator: &str) -> Option<CommandKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == discriminator)
    }

    /// Kind of the command that reverses this one, if any
    pub fn inverse(&self) -> Option<CommandKind> {
        match self {
            CommandKind::AddSources => Some(CommandKind::RemoveSources),
            CommandKind::RemoveSources => Some(CommandKind::AddSources),
            CommandKind::AddComposition => Some(CommandKind::RemoveComposition),
            CommandKind::RemoveComposition => Some(CommandKind::AddComposition),
            CommandKind::UpdateViewName => Some(CommandKind::UpdateViewName),
            CommandKind::UpdateViewDescription => Some(CommandKind::UpdateViewDescription),
            CommandKind::UpdateProjectedColumns => Some(CommandKind::UpdateProjectedColumns),
            CommandKind::NoOp => None,
        }
    }

    /// Add/remove of sources or compositions; these are mirrored on the canvas
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CommandKind::AddSources
                | CommandKind::RemoveSources
                | CommandKind::AddComposition
                | CommandKind::RemoveComposition
        )
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One document mutation
///
/// Structural commands carry an `ident` shared by an add command and the
/// remove command that reverses it, so both address the same canvas element.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddSources {
        source_paths: Vec<String>,
        ident: String,
    },
    RemoveSources {
        source_paths: Vec<String>,
        ident: String,
    },
    AddComposition {
        composition: Composition,
        ident: String,
    },
    RemoveComposition {
        composition: Composition,
        ident: String,
    },
    UpdateViewName {
        new_name: Option<String>,
        old_name: Option<String>,
    },
    UpdateViewDescription {
        new_description: Option<String>,
        old_description: Option<String>,
    },
    UpdateProjectedColumns {
        new_columns: Vec<ProjectedColumn>,
        old_columns: Vec<ProjectedColumn>,
    },
    NoOp,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::AddSources { .. } => CommandKind::AddSources,
            Command::RemoveSources { .. } => CommandKind::RemoveSources,
            Command::AddComposition { .. } => CommandKind::AddComposition,
            Command::RemoveComposition { .. } => CommandKind::RemoveComposition,
            Command::UpdateViewName { .. } => CommandKind::UpdateViewName,
            Command::UpdateViewDescription { .. } => CommandKind::UpdateViewDescription,
            Command::UpdateProjectedColumns { .. } => CommandKind::UpdateProjectedColumns,
            Command::NoOp => CommandKind::NoOp,
        }
    }

    /// Instance identifier of a structural command
    pub fn ident(&self) -> Option<&str> {
        match self {
            Command::AddSources { ident, .. }
            | Command::RemoveSources { ident, .. }
            | Command::AddComposition { ident, .. }
            | Command::RemoveComposition { ident, .. } => Some(ident),
            _ => None,
        }
    }

    /// Command identity: the kind name, suffixed with `-<ident>` for structural commands
    pub fn id(&self) -> String {
        match self.ident() {
            Some(ident) => format!("{}-{}", self.kind().as_str(), ident),
            None => self.kind().as_str().to_string(),
        }
    }

    /// Every kind except NoOp can be undone
    pub fn is_undoable(&self) -> bool {
        !matches!(self, Command::NoOp)
    }

    /// The named argument in its wire representation, if the command carries it
    pub fn arg(&self, name: &str) -> Option<Value> {
        self.args().remove(name)
    }

    /// Full argument map in wire representation; absent values are omitted
    pub fn args(&self) -> BTreeMap<String, Value> {
        wire::encode_args(self)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&wire::encode(self).to_string())
    }
}

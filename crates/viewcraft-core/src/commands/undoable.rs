use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{factory, wire, Command};

/// An (undo, redo) pair pushed onto the editor history
///
/// `redo` produces the forward effect and `undo` is its precomputed inverse.
/// Build one with [`factory::create_undoable`] or [`factory::decode_undoable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Undoable {
    undo: Command,
    redo: Command,
}

impl Undoable {
    pub const UNDO_PROP: &'static str = "undo";
    pub const REDO_PROP: &'static str = "redo";

    pub fn new(undo: Command, redo: Command) -> Self {
        Self { undo, redo }
    }

    pub fn undo(&self) -> &Command {
        &self.undo
    }

    pub fn redo(&self) -> &Command {
        &self.redo
    }

    pub fn into_parts(self) -> (Command, Command) {
        (self.undo, self.redo)
    }

    /// Wire form `{ "undo": <command>, "redo": <command> }`
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(Self::UNDO_PROP.to_string(), wire::encode(&self.undo));
        map.insert(Self::REDO_PROP.to_string(), wire::encode(&self.redo));
        Value::Object(map)
    }
}

impl Serialize for Undoable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Undoable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        factory::decode_undoable(&value).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Undoable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json().to_string())
    }
}

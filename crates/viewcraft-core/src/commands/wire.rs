//! JSON wire form of commands
//!
//! ```json
//! { "id": "AddSourcesCommand", "args": { "addedSourcePaths": ["conn1/tableA"], "ident": "add-1" } }
//! ```
//!
//! [`encode`] is the canonical serializer; parsing goes through
//! [`super::factory::decode`] so the factory's validation applies.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::{args, Command};
use crate::model::{Composition, CompositionOperator, CompositionType, ProjectedColumn};

pub const ID_PROP: &str = "id";
pub const ARGS_PROP: &str = "args";

fn column_values(columns: &[ProjectedColumn]) -> Value {
    columns
        .iter()
        .map(|column| {
            json!({
                "name": column.name,
                "type": column.column_type,
                "selected": column.selected,
            })
        })
        .collect()
}

fn type_name(composition_type: CompositionType) -> &'static str {
    match composition_type {
        CompositionType::InnerJoin => "INNER_JOIN",
        CompositionType::LeftOuterJoin => "LEFT_OUTER_JOIN",
        CompositionType::RightOuterJoin => "RIGHT_OUTER_JOIN",
        CompositionType::FullOuterJoin => "FULL_OUTER_JOIN",
        CompositionType::Union => "UNION",
    }
}

fn operator_name(operator: CompositionOperator) -> &'static str {
    match operator {
        CompositionOperator::Eq => "EQ",
        CompositionOperator::Ne => "NE",
        CompositionOperator::Lt => "LT",
        CompositionOperator::Gt => "GT",
        CompositionOperator::Le => "LE",
        CompositionOperator::Ge => "GE",
    }
}

fn composition_value(composition: &Composition) -> Value {
    json!({
        "name": composition.name(),
        "leftSourcePath": composition.left_source_path(),
        "rightSourcePath": composition.right_source_path(),
        "leftCriteriaColumn": composition.left_criteria_column(),
        "rightCriteriaColumn": composition.right_criteria_column(),
        "type": type_name(composition.composition_type),
        "operator": operator_name(composition.operator),
    })
}

pub(crate) fn encode_args(cmd: &Command) -> BTreeMap<String, Value> {
    let mut map = BTreeMap::new();
    let mut put = |name: &str, value: Option<Value>| {
        if let Some(value) = value {
            map.insert(name.to_string(), value);
        }
    };

    match cmd {
        Command::AddSources {
            source_paths,
            ident,
        } => {
            put(args::ADDED_SOURCE_PATHS, Some(json!(source_paths)));
            put(args::IDENT, Some(json!(ident)));
        }
        Command::RemoveSources {
            source_paths,
            ident,
        } => {
            put(args::REMOVED_SOURCE_PATHS, Some(json!(source_paths)));
            put(args::IDENT, Some(json!(ident)));
        }
        Command::AddComposition { composition, ident } => {
            put(args::ADDED_COMPOSITION, Some(composition_value(composition)));
            put(args::IDENT, Some(json!(ident)));
        }
        Command::RemoveComposition { composition, ident } => {
            put(args::REMOVED_COMPOSITION, Some(composition_value(composition)));
            put(args::IDENT, Some(json!(ident)));
        }
        Command::UpdateViewName { new_name, old_name } => {
            put(args::NEW_NAME, new_name.as_deref().map(Value::from));
            put(args::OLD_NAME, old_name.as_deref().map(Value::from));
        }
        Command::UpdateViewDescription {
            new_description,
            old_description,
        } => {
            put(args::NEW_DESCRIPTION, new_description.as_deref().map(Value::from));
            put(args::OLD_DESCRIPTION, old_description.as_deref().map(Value::from));
        }
        Command::UpdateProjectedColumns {
            new_columns,
            old_columns,
        } => {
            put(args::NEW_PROJECTED_COLUMNS, Some(column_values(new_columns)));
            put(args::OLD_PROJECTED_COLUMNS, Some(column_values(old_columns)));
        }
        Command::NoOp => {}
    }

    map
}

/// Wire form of a command
pub fn encode(cmd: &Command) -> Value {
    let args: Map<String, Value> = encode_args(cmd).into_iter().collect();
    let mut object = Map::new();
    object.insert(ID_PROP.to_string(), Value::from(cmd.kind().as_str()));
    object.insert(ARGS_PROP.to_string(), Value::Object(args));
    Value::Object(object)
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        super::factory::decode(&value).map_err(serde::de::Error::custom)
    }
}

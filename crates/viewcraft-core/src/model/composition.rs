use serde::{Deserialize, Serialize};

use super::path;
use crate::errors::{Result, ViewEditorError};

/// How two sources are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositionType {
    #[default]
    InnerJoin,
    LeftOuterJoin,
    RightOuterJoin,
    FullOuterJoin,
    Union,
}

impl CompositionType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            CompositionType::InnerJoin => "INNER JOIN",
            CompositionType::LeftOuterJoin => "LEFT OUTER JOIN",
            CompositionType::RightOuterJoin => "RIGHT OUTER JOIN",
            CompositionType::FullOuterJoin => "FULL OUTER JOIN",
            CompositionType::Union => "UNION",
        }
    }
}

/// Comparison used in the join criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositionOperator {
    #[default]
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompositionOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            CompositionOperator::Eq => "=",
            CompositionOperator::Ne => "<>",
            CompositionOperator::Lt => "<",
            CompositionOperator::Gt => ">",
            CompositionOperator::Le => "<=",
            CompositionOperator::Ge => ">=",
        }
    }
}

/// A join or union between two sources of a view
///
/// The wire form is a flat object with the keys `name`, `leftSourcePath`,
/// `rightSourcePath`, `leftCriteriaColumn`, `rightCriteriaColumn`, `type` and
/// `operator`. Which side was picked first (`initial_source_path`) is editor
/// state only and is neither serialized nor part of equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Composition {
    pub name: Option<String>,
    pub left_source_path: Option<String>,
    pub right_source_path: Option<String>,
    pub left_criteria_column: Option<String>,
    pub right_criteria_column: Option<String>,
    #[serde(rename = "type")]
    pub composition_type: CompositionType,
    pub operator: CompositionOperator,
    #[serde(skip)]
    pub initial_source_path: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

impl Composition {
    /// Create a named composition with default type (inner join) and operator (=)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: non_empty(Some(&name.into())),
            ..Self::default()
        }
    }

    /// Builder: left source and its criteria column
    pub fn with_left(mut self, source_path: &str, criteria_column: &str) -> Self {
        self.left_source_path = non_empty(Some(source_path));
        self.left_criteria_column = non_empty(Some(criteria_column));
        self
    }

    /// Builder: right source and its criteria column
    pub fn with_right(mut self, source_path: &str, criteria_column: &str) -> Self {
        self.right_source_path = non_empty(Some(source_path));
        self.right_criteria_column = non_empty(Some(criteria_column));
        self
    }

    pub fn with_type(mut self, composition_type: CompositionType) -> Self {
        self.composition_type = composition_type;
        self
    }

    pub fn with_operator(mut self, operator: CompositionOperator) -> Self {
        self.operator = operator;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = non_empty(name);
    }

    pub fn left_source_path(&self) -> Option<&str> {
        self.left_source_path.as_deref()
    }

    pub fn right_source_path(&self) -> Option<&str> {
        self.right_source_path.as_deref()
    }

    pub fn left_criteria_column(&self) -> Option<&str> {
        self.left_criteria_column.as_deref()
    }

    pub fn right_criteria_column(&self) -> Option<&str> {
        self.right_criteria_column.as_deref()
    }

    /// Set the left source, optionally recording it as the initial source
    pub fn set_left_source_path(&mut self, source_path: Option<&str>, is_initial_source: bool) {
        self.left_source_path = non_empty(source_path);
        if is_initial_source {
            self.initial_source_path = self.left_source_path.clone();
        }
    }

    /// Set the right source, optionally recording it as the initial source
    pub fn set_right_source_path(&mut self, source_path: Option<&str>, is_initial_source: bool) {
        self.right_source_path = non_empty(source_path);
        if is_initial_source {
            self.initial_source_path = self.right_source_path.clone();
        }
    }

    pub fn set_left_criteria_column(&mut self, column: Option<&str>) {
        self.left_criteria_column = non_empty(column);
    }

    pub fn set_right_criteria_column(&mut self, column: Option<&str>) {
        self.right_criteria_column = non_empty(column);
    }

    pub fn initial_source_on_left(&self) -> bool {
        self.initial_source_path.is_some() && self.initial_source_path == self.left_source_path
    }

    pub fn initial_source_on_right(&self) -> bool {
        self.initial_source_path.is_some() && self.initial_source_path == self.right_source_path
    }

    /// Exchange the left and right sources together with their criteria columns
    pub fn swap_tables(&mut self) {
        std::mem::swap(&mut self.left_source_path, &mut self.right_source_path);
        std::mem::swap(
            &mut self.left_criteria_column,
            &mut self.right_criteria_column,
        );
    }

    /// A composition may only be persisted once every part of it is filled in
    pub fn is_complete(&self) -> bool {
        self.name.is_some()
            && self.left_source_path.is_some()
            && self.right_source_path.is_some()
            && self.left_criteria_column.is_some()
            && self.right_criteria_column.is_some()
    }

    /// Whether either side of the composition is the given source path
    pub fn references(&self, source_path: &str) -> bool {
        self.left_source_path() == Some(source_path) || self.right_source_path() == Some(source_path)
    }

    pub fn left_source_display(&self) -> String {
        path::source_display(self.left_source_path().unwrap_or_default())
    }

    pub fn right_source_display(&self) -> String {
        path::source_display(self.right_source_path().unwrap_or_default())
    }

    /// `leftColumn <op> rightColumn`
    pub fn criteria_display(&self) -> String {
        format!(
            "{} {} {}",
            self.left_criteria_column().unwrap_or_default(),
            self.operator.to_sql(),
            self.right_criteria_column().unwrap_or_default()
        )
    }

    /// # Errors
    ///
    /// Returns `Serialization` if the composition cannot be encoded.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ViewEditorError::Serialization {
            message: e.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns `InvalidComposition` if `json` is not a composition object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ViewEditorError::InvalidComposition {
            reason: e.to_string(),
        })
    }
}

impl PartialEq for Composition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.left_source_path == other.left_source_path
            && self.right_source_path == other.right_source_path
            && self.left_criteria_column == other.left_criteria_column
            && self.right_criteria_column == other.right_criteria_column
            && self.composition_type == other.composition_type
            && self.operator == other.operator
    }
}

impl Eq for Composition {}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join() -> Composition {
        Composition::new("join1")
            .with_left("p1", "c1")
            .with_right("p2", "c2")
    }

    #[test]
    fn test_swap_tables_exchanges_paths_and_columns() {
        let mut comp = join();
        comp.swap_tables();

        assert_eq!(comp.left_source_path(), Some("p2"));
        assert_eq!(comp.right_source_path(), Some("p1"));
        assert_eq!(comp.left_criteria_column(), Some("c2"));
        assert_eq!(comp.right_criteria_column(), Some("c1"));
    }

    #[test]
    fn test_swap_keeps_initial_source_identity() {
        let mut comp = join();
        comp.set_left_source_path(Some("p1"), true);
        assert!(comp.initial_source_on_left());

        comp.swap_tables();
        assert!(comp.initial_source_on_right());
        assert!(!comp.initial_source_on_left());
    }

    #[test]
    fn test_complete_requires_every_part() {
        assert!(join().is_complete());

        let mut missing_column = join();
        missing_column.set_right_criteria_column(Some(""));
        assert!(!missing_column.is_complete());

        assert!(!Composition::new("").with_left("p1", "c1").with_right("p2", "c2").is_complete());
    }

    #[test]
    fn test_wire_form_uses_flat_camel_case_keys() {
        let value = serde_json::to_value(join().with_type(CompositionType::LeftOuterJoin)).unwrap();

        assert_eq!(value["name"], "join1");
        assert_eq!(value["leftSourcePath"], "p1");
        assert_eq!(value["rightCriteriaColumn"], "c2");
        assert_eq!(value["type"], "LEFT_OUTER_JOIN");
        assert_eq!(value["operator"], "EQ");
        assert!(value.get("initialSourcePath").is_none());
    }

    #[test]
    fn test_equality_ignores_initial_source() {
        let mut a = join();
        a.set_left_source_path(Some("p1"), true);
        assert_eq!(a, join());
    }

    #[test]
    fn test_displays() {
        let comp = Composition::new("j")
            .with_left("conn1/tableA", "id")
            .with_right("conn2/tableB", "a_id")
            .with_operator(CompositionOperator::Ge);

        assert_eq!(comp.left_source_display(), "[conn1] tableA");
        assert_eq!(comp.right_source_display(), "[conn2] tableB");
        assert_eq!(comp.criteria_display(), "id >= a_id");
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(
            Composition::from_json_str("[1, 2]"),
            Err(ViewEditorError::InvalidComposition { .. })
        ));
    }
}

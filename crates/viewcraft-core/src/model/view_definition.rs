use serde::{Deserialize, Serialize};

use super::composition::Composition;

/// A column exposed by the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub selected: bool,
}

impl ProjectedColumn {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>, selected: bool) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            selected,
        }
    }
}

/// The document being edited
///
/// Mutated only by applying commands (see [`crate::apply::apply`]). Source
/// paths keep insertion order and never repeat; compositions are keyed by
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewDefinition {
    name: Option<String>,
    description: Option<String>,
    source_paths: Vec<String>,
    compositions: Vec<Composition>,
    projected_columns: Vec<ProjectedColumn>,
}

impl ViewDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()).filter(|n| !n.is_empty()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.filter(|n| !n.is_empty()).map(str::to_string);
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = description.filter(|d| !d.is_empty()).map(str::to_string);
    }

    pub fn source_paths(&self) -> &[String] {
        &self.source_paths
    }

    pub fn has_source_path(&self, path: &str) -> bool {
        self.source_paths.iter().any(|p| p == path)
    }

    /// Append a source path; returns false if it was already present
    pub fn add_source_path(&mut self, path: &str) -> bool {
        if self.has_source_path(path) {
            return false;
        }
        self.source_paths.push(path.to_string());
        true
    }

    /// Returns false if the path was not present
    pub fn remove_source_path(&mut self, path: &str) -> bool {
        let before = self.source_paths.len();
        self.source_paths.retain(|p| p != path);
        self.source_paths.len() != before
    }

    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    pub fn composition(&self, name: &str) -> Option<&Composition> {
        self.compositions.iter().find(|c| c.name() == Some(name))
    }

    /// Add a composition; returns false if one with the same name exists
    pub fn add_composition(&mut self, composition: Composition) -> bool {
        match composition.name() {
            Some(name) if self.composition(name).is_some() => false,
            _ => {
                self.compositions.push(composition);
                true
            }
        }
    }

    /// Remove the composition with the given name; returns false if absent
    pub fn remove_composition(&mut self, name: &str) -> bool {
        let before = self.compositions.len();
        self.compositions.retain(|c| c.name() != Some(name));
        self.compositions.len() != before
    }

    pub fn projected_columns(&self) -> &[ProjectedColumn] {
        &self.projected_columns
    }

    pub fn set_projected_columns(&mut self, columns: Vec<ProjectedColumn>) {
        self.projected_columns = columns;
    }

    /// Every composition in the view is complete and may be persisted
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.compositions.iter().all(Composition::is_complete)
    }
}

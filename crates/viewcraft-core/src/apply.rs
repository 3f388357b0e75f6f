//! Functional-boundary apply function
//!
//! `apply()` is the only way a [`ViewDefinition`] changes. It takes ownership
//! of the current document and either returns the updated document or an
//! error; on error the caller's previous document is still valid.
//!
//! Structural commands are idempotent: adding a path or composition already
//! in the view, or removing one that is not, leaves the document unchanged.
//!
//! ```
//! use viewcraft_core::{apply, commands::factory, ViewDefinition};
//!
//! let view = ViewDefinition::new("orders");
//! let cmd = factory::create_add_sources_command(Some(vec!["pg/orders".to_string()]), None);
//! let view = apply(view, &cmd).unwrap();
//! assert_eq!(view.source_paths(), ["pg/orders".to_string()]);
//! ```

use crate::commands::Command;
use crate::errors::{Result, ViewEditorError};
use crate::model::{Composition, ViewDefinition};

fn composition_name(composition: &Composition) -> Result<String> {
    composition
        .name()
        .map(str::to_string)
        .ok_or_else(|| ViewEditorError::InvalidComposition {
            reason: "composition has no name".to_string(),
        })
}

/// Apply a command to a view definition, returning the new document
///
/// # Errors
///
/// Returns `InvalidComposition` if a composition command carries a
/// composition without a name.
pub fn apply(mut view: ViewDefinition, cmd: &Command) -> Result<ViewDefinition> {
    match cmd {
        Command::AddSources { source_paths, .. } => {
            for path in source_paths {
                if !view.add_source_path(path) {
                    tracing::debug!(source_path = %path, "source already in view");
                }
            }
        }
        Command::RemoveSources { source_paths, .. } => {
            for path in source_paths {
                if !view.remove_source_path(path) {
                    tracing::debug!(source_path = %path, "source not in view");
                }
            }
        }
        Command::AddComposition { composition, .. } => {
            let name = composition_name(composition)?;
            if !view.add_composition(composition.clone()) {
                tracing::debug!(composition = %name, "composition already in view");
            }
        }
        Command::RemoveComposition { composition, .. } => {
            let name = composition_name(composition)?;
            if !view.remove_composition(&name) {
                tracing::debug!(composition = %name, "composition not in view");
            }
        }
        Command::UpdateViewName { new_name, .. } => {
            view.set_name(new_name.as_deref());
        }
        Command::UpdateViewDescription {
            new_description, ..
        } => {
            view.set_description(new_description.as_deref());
        }
        Command::UpdateProjectedColumns { new_columns, .. } => {
            view.set_projected_columns(new_columns.clone());
        }
        Command::NoOp => {}
    }

    Ok(view)
}

/// The part of `cmd` that would actually change `view`
///
/// Paths already in the view are dropped from an add, and paths not in it
/// from a remove. A composition add whose name is taken, or a composition
/// remove whose name is absent, becomes NoOp; a composition remove carries
/// the view's own composition. Updates carry the view's current value as
/// their old value. Idents are kept. A command that changes nothing
/// becomes NoOp, so the inverse of the result always restores `view`.
pub fn effective_command(view: &ViewDefinition, cmd: &Command) -> Command {
    let narrowed = match cmd {
        Command::AddSources {
            source_paths,
            ident,
        } => {
            let mut added: Vec<String> = Vec::new();
            for path in source_paths {
                if !view.has_source_path(path) && !added.contains(path) {
                    added.push(path.clone());
                }
            }
            Command::AddSources {
                source_paths: added,
                ident: ident.clone(),
            }
        }
        Command::RemoveSources {
            source_paths,
            ident,
        } => {
            let mut removed: Vec<String> = Vec::new();
            for path in source_paths {
                if view.has_source_path(path) && !removed.contains(path) {
                    removed.push(path.clone());
                }
            }
            Command::RemoveSources {
                source_paths: removed,
                ident: ident.clone(),
            }
        }
        Command::AddComposition { composition, .. } => match composition.name() {
            Some(name) if view.composition(name).is_some() => Command::NoOp,
            _ => cmd.clone(),
        },
        Command::RemoveComposition { composition, ident } => {
            match composition.name().and_then(|name| view.composition(name)) {
                Some(existing) => Command::RemoveComposition {
                    composition: existing.clone(),
                    ident: ident.clone(),
                },
                None if composition.name().is_none() => cmd.clone(),
                None => Command::NoOp,
            }
        }
        Command::UpdateViewName { new_name, .. } => {
            let old_name = view.name().map(str::to_string);
            if *new_name == old_name {
                Command::NoOp
            } else {
                Command::UpdateViewName {
                    new_name: new_name.clone(),
                    old_name,
                }
            }
        }
        Command::UpdateViewDescription {
            new_description, ..
        } => {
            let old_description = view.description().map(str::to_string);
            if *new_description == old_description {
                Command::NoOp
            } else {
                Command::UpdateViewDescription {
                    new_description: new_description.clone(),
                    old_description,
                }
            }
        }
        Command::UpdateProjectedColumns { new_columns, .. } => {
            if new_columns.as_slice() == view.projected_columns() {
                Command::NoOp
            } else {
                Command::UpdateProjectedColumns {
                    new_columns: new_columns.clone(),
                    old_columns: view.projected_columns().to_vec(),
                }
            }
        }
        Command::NoOp => Command::NoOp,
    };

    let empty = matches!(
        &narrowed,
        Command::AddSources { source_paths, .. } | Command::RemoveSources { source_paths, .. }
            if source_paths.is_empty()
    );
    if empty {
        Command::NoOp
    } else {
        narrowed
    }
}

/// Apply each command in order, stopping at the first error
///
/// # Errors
///
/// Propagates the first error returned by [`apply`].
pub fn apply_all<'a>(
    view: ViewDefinition,
    cmds: impl IntoIterator<Item = &'a Command>,
) -> Result<ViewDefinition> {
    cmds.into_iter().try_fold(view, apply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::factory;
    use crate::model::ProjectedColumn;

    #[test]
    fn test_add_sources_is_idempotent() {
        let cmd = factory::create_add_sources_command(
            Some(vec!["c/a".to_string(), "c/b".to_string()]),
            Some("add-1"),
        );
        let once = apply(ViewDefinition::new("v"), &cmd).unwrap();
        let twice = apply(once.clone(), &cmd).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.source_paths().len(), 2);
    }

    #[test]
    fn test_nameless_composition_rejected() {
        let cmd = factory::create_add_composition_command(
            Some(Composition::default().with_left("c/a", "id").into()),
            Some("add-2"),
        )
        .unwrap();

        let err = apply(ViewDefinition::new("v"), &cmd).unwrap_err();
        assert!(matches!(err, ViewEditorError::InvalidComposition { .. }));
    }

    #[test]
    fn test_remove_composition_matches_by_name() {
        let added = Composition::new("join1").with_left("c/a", "id");
        let view = apply(
            ViewDefinition::new("v"),
            &factory::create_add_composition_command(Some(added.into()), Some("add-2")).unwrap(),
        )
        .unwrap();

        // Same name, different sides: still the same element of the view
        let removed = Composition::new("join1").with_left("c/z", "other");
        let view = apply(
            view,
            &factory::create_remove_composition_command(Some(removed.into()), Some("add-2")).unwrap(),
        )
        .unwrap();
        assert!(view.compositions().is_empty());
    }

    #[test]
    fn test_updates_replace_values() {
        let cmds = vec![
            factory::create_update_view_name_command(Some("orders"), None).unwrap(),
            factory::create_update_view_description_command(Some("All orders"), None).unwrap(),
            factory::create_update_projected_columns_command(
                Some(vec![ProjectedColumn::new("id", "integer", true)]),
                Some(vec![]),
            ),
        ];

        let view = apply_all(ViewDefinition::default(), &cmds).unwrap();
        assert_eq!(view.name(), Some("orders"));
        assert_eq!(view.description(), Some("All orders"));
        assert_eq!(view.projected_columns().len(), 1);
    }

    #[test]
    fn test_noop_leaves_view_untouched() {
        let view = ViewDefinition::new("v");
        assert_eq!(apply(view.clone(), &Command::NoOp).unwrap(), view);
    }

    #[test]
    fn test_effective_add_drops_present_paths() {
        let mut view = ViewDefinition::new("v");
        view.add_source_path("conn1/tableA");
        let cmd = factory::create_add_sources_command(
            Some(vec!["conn1/tableA".to_string(), "conn1/tableB".to_string()]),
            Some("add-2"),
        );

        let effective = effective_command(&view, &cmd);

        assert_eq!(
            effective,
            Command::AddSources {
                source_paths: vec!["conn1/tableB".to_string()],
                ident: "add-2".to_string(),
            }
        );
    }

    #[test]
    fn test_effective_remove_of_absent_paths_is_noop() {
        let cmd = factory::create_remove_sources_command(
            Some(vec!["conn1/missing".to_string()]),
            Some("add-1"),
        )
        .unwrap();
        assert_eq!(effective_command(&ViewDefinition::new("v"), &cmd), Command::NoOp);
    }

    #[test]
    fn test_effective_remove_composition_uses_view_copy() {
        let stored = Composition::new("join1").with_left("c/a", "id");
        let mut view = ViewDefinition::new("v");
        view.add_composition(stored.clone());
        let other = Composition::new("join1").with_left("c/z", "other");
        let cmd =
            factory::create_remove_composition_command(Some(other.into()), Some("c1")).unwrap();

        match effective_command(&view, &cmd) {
            Command::RemoveComposition { composition, ident } => {
                assert_eq!(composition, stored);
                assert_eq!(ident, "c1");
            }
            other => panic!("expected RemoveComposition, got {other:?}"),
        }
    }

    #[test]
    fn test_effective_update_records_current_value() {
        let view = ViewDefinition::new("current");
        let cmd = factory::create_update_view_name_command(Some("next"), Some("stale")).unwrap();
        assert_eq!(
            effective_command(&view, &cmd),
            Command::UpdateViewName {
                new_name: Some("next".to_string()),
                old_name: Some("current".to_string()),
            }
        );
        let same = factory::create_update_view_name_command(Some("current"), None).unwrap();
        assert_eq!(effective_command(&view, &same), Command::NoOp);
    }
}

//! Editor-session persistence orchestration
//!
//! Every function follows the canonical logging shape: `start`, then `end`
//! or `end_error` under the same op name. Each store round trip gets its own
//! request id, logged at start and attached to a store failure.

use std::time::Instant;

use viewcraft_core::{
    log_op_end, log_op_error, log_op_start, ExError, ViewDefinition, ViewEditorPart,
    ViewEditorService,
};
use viewcraft_core_types::RequestContext;

use crate::errors::{EngineError, Result};
use crate::persistence::EditorStateStore;

fn store_failure(e: &EngineError, ctx: &RequestContext) -> ExError {
    ExError::from(e.clone()).with_request_id(ctx.request_id.clone())
}

/// Persist the current session
///
/// Announces `InProgress` before the store is called. A successful save
/// announces `CompletedSuccess` and clears the change flag; a failed one
/// announces `CompletedFailed` and keeps the changes so the user can retry.
///
/// # Errors
///
/// Returns `NoEditorView` if nothing is being edited, or the store error.
pub async fn save_editor_state(
    service: &mut ViewEditorService,
    store: &dyn EditorStateStore,
    state_id: &str,
    dataservice_id: Option<&str>,
) -> Result<()> {
    let op = "save_editor_state";
    let ctx = RequestContext::new();
    log_op_start!(op, state_id = state_id, request_id = %ctx.request_id);
    let start = Instant::now();

    let state = match service.begin_save(state_id) {
        Ok(state) => state,
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
            return Err(e.into());
        }
    };

    match store.save(std::slice::from_ref(&state), dataservice_id).await {
        Ok(()) => {
            service.finish_save(true);
            log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
            Ok(())
        }
        Err(e) => {
            service.finish_save(false);
            log_op_error!(
                op,
                store_failure(&e, &ctx),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

/// Resume a stored session; returns false if no state has that id
///
/// # Errors
///
/// Returns the store error.
pub async fn load_editor_state(
    service: &mut ViewEditorService,
    store: &dyn EditorStateStore,
    state_id: &str,
    source: ViewEditorPart,
) -> Result<bool> {
    let op = "load_editor_state";
    let ctx = RequestContext::new();
    log_op_start!(op, state_id = state_id, request_id = %ctx.request_id);
    let start = Instant::now();

    let loaded = match store.load(state_id).await {
        Ok(loaded) => loaded,
        Err(e) => {
            log_op_error!(
                op,
                store_failure(&e, &ctx),
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(e);
        }
    };
    let found = loaded.is_some();
    if let Some(state) = loaded {
        service.restore_editor_state(state, source);
    }

    log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        found = found
    );
    Ok(found)
}

/// # Errors
///
/// Returns the store error.
pub async fn delete_editor_state(
    store: &dyn EditorStateStore,
    state_id: &str,
    dataservice_id: Option<&str>,
) -> Result<bool> {
    let op = "delete_editor_state";
    let ctx = RequestContext::new();
    log_op_start!(op, state_id = state_id, request_id = %ctx.request_id);
    let start = Instant::now();

    match store.delete(state_id, dataservice_id).await {
        Ok(deleted) => {
            log_op_end!(
                op,
                duration_ms = start.elapsed().as_millis() as u64,
                deleted = deleted
            );
            Ok(deleted)
        }
        Err(e) => {
            log_op_error!(
                op,
                store_failure(&e, &ctx),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

/// Views saved for a virtualization, sorted by view name
///
/// Editor states of a virtualization are those whose id starts with its
/// lower-cased service VDB name.
///
/// # Errors
///
/// Returns the store error.
pub async fn list_view_definitions(
    store: &dyn EditorStateStore,
    vdb_name: &str,
) -> Result<Vec<ViewDefinition>> {
    let pattern = format!("{}*", glob::Pattern::escape(&vdb_name.to_lowercase()));
    let mut views: Vec<ViewDefinition> = store
        .list(&pattern)
        .await?
        .into_iter()
        .map(|state| state.view)
        .collect();
    views.sort_by(|a, b| a.name().cmp(&b.name()));
    Ok(views)
}

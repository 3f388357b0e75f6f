//! Editor-state persistence
//!
//! Saved editor states are keyed by id. Ids are conventionally prefixed with
//! the lower-cased service VDB name, so the states belonging to one
//! virtualization can be listed with a `"<vdb>*"` glob.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use glob::Pattern;
use tokio::sync::Mutex;
use viewcraft_core::EditorState;

use crate::errors::{EngineError, Result};

/// Asynchronous store for editor states
#[async_trait]
pub trait EditorStateStore: Send + Sync {
    /// Save (insert or replace) the given states
    ///
    /// `dataservice_id` names the virtualization whose views are refreshed
    /// from the saved states, when there is one.
    async fn save(&self, states: &[EditorState], dataservice_id: Option<&str>) -> Result<()>;

    async fn load(&self, state_id: &str) -> Result<Option<EditorState>>;

    /// Delete a state; returns false if no state had that id
    async fn delete(&self, state_id: &str, dataservice_id: Option<&str>) -> Result<bool>;

    /// States whose id matches a glob pattern, ordered by id
    async fn list(&self, pattern: &str) -> Result<Vec<EditorState>>;
}

#[derive(Debug, Clone)]
struct StoredState {
    state: EditorState,
    dataservice_id: Option<String>,
}

/// Map-backed store for tests and local tooling
#[derive(Debug, Default)]
pub struct InMemoryEditorStateStore {
    states: Mutex<BTreeMap<String, StoredState>>,
    failing: AtomicBool,
}

impl InMemoryEditorStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent request fail with a store error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.lock().await.is_empty()
    }

    /// The dataservice a state was last saved for
    pub async fn dataservice_of(&self, state_id: &str) -> Option<String> {
        self.states
            .lock()
            .await
            .get(state_id)
            .and_then(|s| s.dataservice_id.clone())
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EngineError::Store {
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EditorStateStore for InMemoryEditorStateStore {
    async fn save(&self, states: &[EditorState], dataservice_id: Option<&str>) -> Result<()> {
        self.check_available()?;
        let mut stored = self.states.lock().await;
        for state in states {
            tracing::debug!(state_id = %state.id, "storing editor state");
            stored.insert(
                state.id.clone(),
                StoredState {
                    state: state.clone(),
                    dataservice_id: dataservice_id.map(str::to_string),
                },
            );
        }
        Ok(())
    }

    async fn load(&self, state_id: &str) -> Result<Option<EditorState>> {
        self.check_available()?;
        Ok(self
            .states
            .lock()
            .await
            .get(state_id)
            .map(|s| s.state.clone()))
    }

    async fn delete(&self, state_id: &str, dataservice_id: Option<&str>) -> Result<bool> {
        self.check_available()?;
        let removed = self.states.lock().await.remove(state_id).is_some();
        if !removed {
            tracing::debug!(state_id, ?dataservice_id, "no editor state to delete");
        }
        Ok(removed)
    }

    async fn list(&self, pattern: &str) -> Result<Vec<EditorState>> {
        self.check_available()?;
        let matcher = Pattern::new(pattern).map_err(|e| EngineError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self
            .states
            .lock()
            .await
            .iter()
            .filter(|(id, _)| matcher.matches(id))
            .map(|(_, s)| s.state.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewcraft_core::ViewDefinition;

    fn state(id: &str) -> EditorState {
        EditorState::new(id, ViewDefinition::new(id), Vec::new())
    }

    #[tokio::test]
    async fn test_save_replaces_existing_state() {
        let store = InMemoryEditorStateStore::new();
        store.save(&[state("a")], None).await.unwrap();

        let mut updated = state("a");
        updated.view.set_description(Some("second"));
        store.save(&[updated.clone()], Some("ds1")).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.load("a").await.unwrap(), Some(updated));
        assert_eq!(store.dataservice_of("a").await.as_deref(), Some("ds1"));
    }

    #[tokio::test]
    async fn test_list_matches_glob() {
        let store = InMemoryEditorStateStore::new();
        store
            .save(&[state("salesvdb.v1"), state("salesvdb.v2"), state("hrvdb.v1")], None)
            .await
            .unwrap();

        let ids: Vec<_> = store
            .list("salesvdb*")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["salesvdb.v1", "salesvdb.v2"]);
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_error() {
        let store = InMemoryEditorStateStore::new();
        let err = store.list("[").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern { .. }));
    }

    #[tokio::test]
    async fn test_delete_reports_missing() {
        let store = InMemoryEditorStateStore::new();
        store.save(&[state("a")], None).await.unwrap();

        assert!(store.delete("a", None).await.unwrap());
        assert!(!store.delete("a", None).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_failing_store_rejects_requests() {
        let store = InMemoryEditorStateStore::new();
        store.set_failing(true);
        assert!(store.save(&[state("a")], None).await.is_err());
        store.set_failing(false);
        assert!(store.save(&[state("a")], None).await.is_ok());
    }
}

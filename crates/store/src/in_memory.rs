//! In-memory store, useful for testing and runs without a database.

use async_trait::async_trait;
use orim_core::canvas::{CanvasStore, ObjectSize, StoredObject};
use orim_core::error::StoreError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Board objects held in a map keyed by board id.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    boards: Arc<RwLock<HashMap<String, Vec<StoredObject>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an object on a board.
    pub async fn insert(&self, board_id: &str, object: StoredObject) {
        let mut boards = self.boards.write().await;
        let rows = boards.entry(board_id.to_string()).or_default();
        rows.retain(|o| o.id != object.id);
        rows.push(object);
    }

    pub async fn len(&self, board_id: &str) -> usize {
        self.boards.read().await.get(board_id).map_or(0, Vec::len)
    }
}

#[async_trait]
impl CanvasStore for InMemoryStore {
    fn name(&self) -> &str { "in_memory" }

    async fn list_objects(&self, board_id: &str) -> Result<Vec<StoredObject>, StoreError> {
        let boards = self.boards.read().await;
        let mut rows = boards.get(board_id).cloned().unwrap_or_default();
        rows.sort_by_key(|o| o.z_index);
        Ok(rows)
    }

    async fn object_sizes(&self, board_id: &str, ids: &[String]) -> Result<Vec<ObjectSize>, StoreError> {
        let boards = self.boards.read().await;
        let Some(rows) = boards.get(board_id) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .iter()
            .filter(|o| ids.contains(&o.id))
            .map(|o| ObjectSize {
                id: o.id.clone(),
                width: o.width,
                height: o.height,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, z_index: i64, width: f64) -> StoredObject {
        StoredObject {
            id: id.into(),
            kind: "sticky_note".into(),
            x: 0.0,
            y: 0.0,
            width,
            height: 150.0,
            data: serde_json::json!({ "text": id }),
            z_index,
        }
    }

    #[tokio::test]
    async fn list_is_ordered_by_z_index() {
        let store = InMemoryStore::new();
        store.insert("b1", row("top", 5, 150.0)).await;
        store.insert("b1", row("frame", -1, 350.0)).await;
        store.insert("b1", row("mid", 0, 150.0)).await;

        let ids: Vec<String> = store.list_objects("b1").await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, ["frame", "mid", "top"]);
    }

    #[tokio::test]
    async fn boards_are_isolated() {
        let store = InMemoryStore::new();
        store.insert("b1", row("a", 0, 150.0)).await;
        assert!(store.list_objects("b2").await.unwrap().is_empty());
        assert_eq!(store.len("b1").await, 1);
    }

    #[tokio::test]
    async fn insert_replaces_same_id() {
        let store = InMemoryStore::new();
        store.insert("b1", row("a", 0, 150.0)).await;
        store.insert("b1", row("a", 0, 200.0)).await;
        let rows = store.list_objects("b1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].width, 200.0);
    }

    #[tokio::test]
    async fn sizes_skip_unknown_ids() {
        let store = InMemoryStore::new();
        store.insert("b1", row("a", 0, 300.0)).await;
        let sizes = store.object_sizes("b1", &["a".into(), "ghost".into()]).await.unwrap();
        assert_eq!(sizes, vec![ObjectSize { id: "a".into(), width: 300.0, height: 150.0 }]);
    }
}

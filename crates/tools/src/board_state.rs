//! `getBoardState`: the model's only view of what is already on the board.

use async_trait::async_trait;
use orim_core::canvas::ObjectSummary;
use orim_core::error::ToolError;
use orim_core::tool::{ActionKind, Tool, ToolContext, ToolOutput};
use serde_json::{Value, json};
use tracing::warn;

pub struct GetBoardStateTool;

#[async_trait]
impl Tool for GetBoardStateTool {
    fn name(&self) -> &str {
        "getBoardState"
    }

    fn description(&self) -> &str {
        "Get every object currently on the board. Call this before moving, resizing or otherwise changing existing objects."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Read
    }

    async fn execute(&self, ctx: &ToolContext, _arguments: Value) -> Result<ToolOutput, ToolError> {
        match ctx.store.list_objects(&ctx.canvas_id).await {
            Ok(rows) => {
                let objects: Vec<ObjectSummary> = rows.iter().map(ObjectSummary::from).collect();
                let count = objects.len();
                Ok(ToolOutput::Read {
                    objects,
                    count,
                    error: None,
                })
            }
            Err(e) => {
                warn!(board = %ctx.canvas_id, error = %e, "Board state read failed");
                Ok(ToolOutput::Read {
                    objects: Vec::new(),
                    count: 0,
                    error: Some(e.to_string()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orim_core::canvas::{CanvasStore, ObjectSize, StoredObject};
    use orim_core::error::StoreError;
    use orim_store::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn empty_board_reads_zero() {
        let ctx = ToolContext::new("b1", Arc::new(InMemoryStore::new()));
        let out = GetBoardStateTool.execute(&ctx, json!({})).await.unwrap();
        assert_eq!(out.to_json(), json!({"action": "read", "objects": [], "count": 0}));
    }

    #[tokio::test]
    async fn reads_summaries_in_z_order() {
        let store = InMemoryStore::new();
        for (id, z, text) in [("note", 2, "Hi"), ("frame", -1, "Todo")] {
            store
                .insert("b1", StoredObject {
                    id: id.into(),
                    kind: "sticky_note".into(),
                    x: 1.0,
                    y: 2.0,
                    width: 150.0,
                    height: 150.0,
                    data: json!({ "text": text, "fill": "#EAB308" }),
                    z_index: z,
                })
                .await;
        }
        let ctx = ToolContext::new("b1", Arc::new(store));

        let json = GetBoardStateTool.execute(&ctx, json!({})).await.unwrap().to_json();
        assert_eq!(json["count"], 2);
        assert_eq!(json["objects"][0]["id"], "frame");
        assert_eq!(json["objects"][0]["text"], "Todo");
        assert_eq!(json["objects"][1]["fill"], "#EAB308");
        assert!(json["objects"][0].get("z_index").is_none());
    }

    struct OfflineStore;

    #[async_trait]
    impl CanvasStore for OfflineStore {
        fn name(&self) -> &str { "offline" }
        async fn list_objects(&self, _board_id: &str) -> Result<Vec<StoredObject>, StoreError> {
            Err(StoreError::NotConfigured("no database".into()))
        }
        async fn object_sizes(&self, _board_id: &str, _ids: &[String]) -> Result<Vec<ObjectSize>, StoreError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn store_failure_is_reported_in_result() {
        let ctx = ToolContext::new("b1", Arc::new(OfflineStore));
        let json = GetBoardStateTool.execute(&ctx, json!({})).await.unwrap().to_json();
        assert_eq!(json["count"], 0);
        assert!(json["error"].as_str().unwrap().contains("no database"));
    }
}

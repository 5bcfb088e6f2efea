//! `arrangeObjects`: lay existing objects out in a grid, row or column.

use async_trait::async_trait;
use orim_core::error::ToolError;
use orim_core::tool::{ActionKind, BatchEntry, Tool, ToolContext, ToolOutput, parse_arguments};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use tracing::warn;

use crate::defaults::UNKNOWN_OBJECT_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Grid,
    Horizontal,
    Vertical,
}

fn default_start() -> f64 {
    100.0
}
fn default_gap() -> f64 {
    20.0
}
fn default_columns() -> i64 {
    4
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArrangeArgs {
    object_ids: Vec<String>,
    layout: Layout,
    #[serde(default = "default_start")]
    start_x: f64,
    #[serde(default = "default_start")]
    start_y: f64,
    #[serde(default = "default_gap")]
    gap: f64,
    #[serde(default = "default_columns")]
    columns: i64,
}

/// Placement parameters for [`arrange`].
#[derive(Debug, Clone, Copy)]
pub struct Arrangement {
    pub layout: Layout,
    pub start: (f64, f64),
    pub gap: f64,
    pub columns: usize,
}

/// Compute positions for `(id, width, height)` items, in input order.
///
/// Rows and columns advance by each item's own size plus the gap. In grid
/// mode a new row starts below the tallest item of the previous row.
pub fn arrange(items: &[(String, f64, f64)], plan: Arrangement) -> Vec<(String, f64, f64)> {
    let (start_x, start_y) = plan.start;
    let columns = plan.columns.max(1);
    let mut cur_x = start_x;
    let mut cur_y = start_y;
    let mut row_max_h: f64 = 0.0;
    let mut placed = Vec::with_capacity(items.len());

    for (i, (id, w, h)) in items.iter().enumerate() {
        match plan.layout {
            Layout::Horizontal => {
                placed.push((id.clone(), cur_x, start_y));
                cur_x += w + plan.gap;
            }
            Layout::Vertical => {
                placed.push((id.clone(), start_x, cur_y));
                cur_y += h + plan.gap;
            }
            Layout::Grid => {
                let col = i % columns;
                if col == 0 && i > 0 {
                    cur_y += row_max_h + plan.gap;
                    row_max_h = 0.0;
                }
                if col == 0 {
                    cur_x = start_x;
                }
                placed.push((id.clone(), cur_x, cur_y));
                row_max_h = row_max_h.max(*h);
                cur_x += w + plan.gap;
            }
        }
    }
    placed
}

pub struct ArrangeObjectsTool;

#[async_trait]
impl Tool for ArrangeObjectsTool {
    fn name(&self) -> &str {
        "arrangeObjects"
    }

    fn description(&self) -> &str {
        "Arrange several objects into a grid, a horizontal row or a vertical column, \
         starting at (startX, startY) with the given gap between them."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "objectIds": { "type": "array", "items": { "type": "string" } },
                "layout": { "type": "string", "enum": ["grid", "horizontal", "vertical"] },
                "startX": { "type": "number", "default": 100 },
                "startY": { "type": "number", "default": 100 },
                "gap": { "type": "number", "default": 20 },
                "columns": { "type": "integer", "default": 4 }
            },
            "required": ["objectIds", "layout"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::BatchUpdate
    }

    async fn execute(&self, ctx: &ToolContext, arguments: Value) -> Result<ToolOutput, ToolError> {
        let args: ArrangeArgs = parse_arguments(arguments)?;

        let sizes: HashMap<String, (f64, f64)> =
            match ctx.store.object_sizes(&ctx.canvas_id, &args.object_ids).await {
                Ok(rows) => rows.into_iter().map(|s| (s.id, (s.width, s.height))).collect(),
                Err(e) => {
                    warn!(board = %ctx.canvas_id, error = %e, "Object size lookup failed, using default sizes");
                    HashMap::new()
                }
            };

        let items: Vec<(String, f64, f64)> = args
            .object_ids
            .into_iter()
            .map(|id| {
                let (w, h) = sizes.get(&id).copied().unwrap_or(UNKNOWN_OBJECT_SIZE);
                (id, w, h)
            })
            .collect();

        let plan = Arrangement {
            layout: args.layout,
            start: (args.start_x, args.start_y),
            gap: args.gap,
            columns: usize::try_from(args.columns).unwrap_or(1),
        };

        let batch_updates = arrange(&items, plan)
            .into_iter()
            .map(|(id, x, y)| {
                let mut updates = Map::new();
                updates.insert("x".into(), json!(x));
                updates.insert("y".into(), json!(y));
                BatchEntry { id, updates }
            })
            .collect();

        Ok(ToolOutput::BatchUpdate { batch_updates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orim_core::canvas::{CanvasStore, ObjectSize, StoredObject};
    use orim_core::error::StoreError;
    use orim_store::InMemoryStore;
    use std::sync::Arc;

    fn items(sizes: &[(f64, f64)]) -> Vec<(String, f64, f64)> {
        sizes.iter().enumerate().map(|(i, (w, h))| (format!("o{i}"), *w, *h)).collect()
    }

    fn plan(layout: Layout, start: (f64, f64), gap: f64, columns: usize) -> Arrangement {
        Arrangement { layout, start, gap, columns }
    }

    fn positions(placed: Vec<(String, f64, f64)>) -> Vec<(f64, f64)> {
        placed.into_iter().map(|(_, x, y)| (x, y)).collect()
    }

    #[test]
    fn horizontal_advances_by_width_plus_gap() {
        let placed = arrange(&items(&[(100.0, 100.0), (100.0, 100.0)]), plan(Layout::Horizontal, (50.0, 50.0), 10.0, 4));
        assert_eq!(positions(placed), vec![(50.0, 50.0), (160.0, 50.0)]);
    }

    #[test]
    fn vertical_advances_by_height_plus_gap() {
        let placed = arrange(&items(&[(10.0, 40.0), (10.0, 60.0), (10.0, 5.0)]), plan(Layout::Vertical, (0.0, 0.0), 20.0, 4));
        assert_eq!(positions(placed), vec![(0.0, 0.0), (0.0, 60.0), (0.0, 140.0)]);
    }

    #[test]
    fn grid_wraps_below_tallest_in_row() {
        let placed = arrange(
            &items(&[(100.0, 50.0), (100.0, 80.0), (100.0, 30.0)]),
            plan(Layout::Grid, (0.0, 0.0), 10.0, 2),
        );
        assert_eq!(positions(placed), vec![(0.0, 0.0), (110.0, 0.0), (0.0, 90.0)]);
    }

    #[test]
    fn zero_columns_behaves_as_one() {
        let placed = arrange(&items(&[(10.0, 10.0), (10.0, 10.0)]), plan(Layout::Grid, (0.0, 0.0), 5.0, 0));
        assert_eq!(positions(placed), vec![(0.0, 0.0), (0.0, 15.0)]);
    }

    #[tokio::test]
    async fn unknown_ids_use_default_size() {
        let store = InMemoryStore::new();
        store
            .insert("b1", StoredObject {
                id: "wide".into(),
                kind: "rectangle".into(),
                x: 0.0,
                y: 0.0,
                width: 300.0,
                height: 80.0,
                data: serde_json::Value::Null,
                z_index: 0,
            })
            .await;
        let ctx = ToolContext::new("b1", Arc::new(store));

        let out = ArrangeObjectsTool
            .execute(&ctx, json!({
                "objectIds": ["wide", "ghost", "third"],
                "layout": "horizontal",
                "startX": 0, "startY": 0, "gap": 10
            }))
            .await
            .unwrap();

        let json = out.to_json();
        assert_eq!(json["action"], "batch_update");
        let xs: Vec<f64> = json["batchUpdates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["updates"]["x"].as_f64().unwrap())
            .collect();
        assert_eq!(xs, vec![0.0, 310.0, 470.0]);
        assert_eq!(json["batchUpdates"][1]["id"], "ghost");
    }

    struct BrokenStore;

    #[async_trait]
    impl CanvasStore for BrokenStore {
        fn name(&self) -> &str { "broken" }
        async fn list_objects(&self, _board_id: &str) -> Result<Vec<StoredObject>, StoreError> {
            Err(StoreError::Network("down".into()))
        }
        async fn object_sizes(&self, _board_id: &str, _ids: &[String]) -> Result<Vec<ObjectSize>, StoreError> {
            Err(StoreError::Network("down".into()))
        }
    }

    #[tokio::test]
    async fn store_failure_falls_back_to_defaults() {
        let ctx = ToolContext::new("b1", Arc::new(BrokenStore));
        let out = ArrangeObjectsTool
            .execute(&ctx, json!({"objectIds": ["a", "b"], "layout": "vertical", "startY": 0}))
            .await
            .unwrap();
        let json = out.to_json();
        assert_eq!(json["batchUpdates"][1]["updates"]["y"], 170.0);
    }

    #[tokio::test]
    async fn unknown_layout_is_invalid() {
        let ctx = ToolContext::new("b1", Arc::new(InMemoryStore::new()));
        let err = ArrangeObjectsTool
            .execute(&ctx, json!({"objectIds": ["a"], "layout": "spiral"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}

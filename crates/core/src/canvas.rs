//! Board objects and the canvas store abstraction.
//!
//! Tools never write to the store: creation and modification results are
//! returned to the caller, which applies them. The store is only read, by the
//! layout and board-inspection tools.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::StoreError;

/// A fully specified object, as produced by the creation tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,

    #[serde(rename = "strokeWidth", default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Flat `[x0, y0, x1, y1, ...]` list, relative to `(x, y)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,

    #[serde(rename = "fromId", default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,

    #[serde(rename = "toId", default, skip_serializing_if = "Option::is_none")]
    pub to_id: Option<String>,

    #[serde(rename = "connectorStyle", default, skip_serializing_if = "Option::is_none")]
    pub connector_style: Option<String>,

    pub z_index: i64,

    pub updated_at: DateTime<Utc>,
}

impl CanvasObject {
    /// A bare object of the given type with a fresh id and timestamp.
    pub fn new(kind: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: kind.into(),
            x,
            y,
            width,
            height,
            fill: None,
            stroke: None,
            stroke_width: None,
            opacity: None,
            text: None,
            points: None,
            from_id: None,
            to_id: None,
            connector_style: None,
            z_index: 0,
            updated_at: Utc::now(),
        }
    }
}

/// A row of the `board_objects` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,

    /// Type-specific payload; `text` and `fill` live here
    #[serde(default)]
    pub data: serde_json::Value,

    #[serde(default)]
    pub z_index: i64,
}

/// The view of a stored object that `getBoardState` reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: Option<String>,
    pub fill: Option<String>,
}

impl From<&StoredObject> for ObjectSummary {
    fn from(obj: &StoredObject) -> Self {
        let field = |key: &str| obj.data.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            id: obj.id.clone(),
            kind: obj.kind.clone(),
            x: obj.x,
            y: obj.y,
            width: obj.width,
            height: obj.height,
            text: field("text"),
            fill: field("fill"),
        }
    }
}

/// Width and height of a stored object, used by the layout tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSize {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

/// Read access to persisted board objects.
///
/// One instance is built at startup and shared by every request.
#[async_trait]
pub trait CanvasStore: Send + Sync {
    /// Backend name (e.g., "supabase", "in_memory").
    fn name(&self) -> &str;

    /// All objects on a board, ordered by `z_index` ascending.
    async fn list_objects(&self, board_id: &str) -> Result<Vec<StoredObject>, StoreError>;

    /// Sizes of the requested objects. Ids not on the board are omitted.
    async fn object_sizes(&self, board_id: &str, ids: &[String]) -> Result<Vec<ObjectSize>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_object_uses_wire_keys() {
        let mut obj = CanvasObject::new("connector", 0.0, 0.0, 0.0, 0.0);
        obj.stroke_width = Some(2.0);
        obj.from_id = Some("a".into());
        obj.to_id = Some("b".into());
        obj.connector_style = Some("arrow-end".into());

        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["type"], "connector");
        assert_eq!(json["strokeWidth"], 2.0);
        assert_eq!(json["fromId"], "a");
        assert_eq!(json["connectorStyle"], "arrow-end");
        assert_eq!(json["z_index"], 0);
        assert!(json.get("text").is_none());
        assert!(json["updated_at"].as_str().is_some());
    }

    #[test]
    fn summary_reads_text_and_fill_from_data() {
        let row: StoredObject = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "type": "sticky_note",
            "x": 10, "y": 20, "width": 150, "height": 150,
            "data": { "text": "Idea", "fill": "#EAB308" },
            "z_index": 3
        }))
        .unwrap();

        let summary = ObjectSummary::from(&row);
        assert_eq!(summary.text.as_deref(), Some("Idea"));
        assert_eq!(summary.fill.as_deref(), Some("#EAB308"));
        assert_eq!(summary.width, 150.0);
    }

    #[test]
    fn summary_without_data_has_no_text() {
        let row: StoredObject = serde_json::from_value(serde_json::json!({
            "id": "r1", "type": "rectangle"
        }))
        .unwrap();
        let summary = ObjectSummary::from(&row);
        assert!(summary.text.is_none());
        assert!(summary.fill.is_none());
        assert_eq!(row.z_index, 0);
    }
}

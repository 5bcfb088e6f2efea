//! Manipulation tools: move, resize, retext, recolor, delete.
//!
//! These only describe the change; ids are not checked against the store.

use async_trait::async_trait;
use orim_core::error::ToolError;
use orim_core::tool::{ActionKind, Tool, ToolContext, ToolOutput, parse_arguments};
use serde::Deserialize;
use serde_json::{Map, Value, json};

fn update(id: String, fields: impl IntoIterator<Item = (&'static str, Value)>) -> ToolOutput {
    let updates: Map<String, Value> = fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    ToolOutput::Update { id, updates }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveArgs {
    object_id: String,
    x: f64,
    y: f64,
}

pub struct MoveObjectTool;

#[async_trait]
impl Tool for MoveObjectTool {
    fn name(&self) -> &str {
        "moveObject"
    }

    fn description(&self) -> &str {
        "Move an existing object to a new position."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "objectId": { "type": "string" },
                "x": { "type": "number" },
                "y": { "type": "number" }
            },
            "required": ["objectId", "x", "y"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Update
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: Value) -> Result<ToolOutput, ToolError> {
        let args: MoveArgs = parse_arguments(arguments)?;
        Ok(update(args.object_id, [("x", json!(args.x)), ("y", json!(args.y))]))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResizeArgs {
    object_id: String,
    width: f64,
    height: f64,
}

pub struct ResizeObjectTool;

#[async_trait]
impl Tool for ResizeObjectTool {
    fn name(&self) -> &str {
        "resizeObject"
    }

    fn description(&self) -> &str {
        "Resize an existing object."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "objectId": { "type": "string" },
                "width": { "type": "number" },
                "height": { "type": "number" }
            },
            "required": ["objectId", "width", "height"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Update
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: Value) -> Result<ToolOutput, ToolError> {
        let args: ResizeArgs = parse_arguments(arguments)?;
        Ok(update(
            args.object_id,
            [("width", json!(args.width)), ("height", json!(args.height))],
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTextArgs {
    object_id: String,
    new_text: String,
}

pub struct UpdateTextTool;

#[async_trait]
impl Tool for UpdateTextTool {
    fn name(&self) -> &str {
        "updateText"
    }

    fn description(&self) -> &str {
        "Replace the text of a sticky note or text element."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "objectId": { "type": "string" },
                "newText": { "type": "string" }
            },
            "required": ["objectId", "newText"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Update
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: Value) -> Result<ToolOutput, ToolError> {
        let args: UpdateTextArgs = parse_arguments(arguments)?;
        Ok(update(args.object_id, [("text", json!(args.new_text))]))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeColorArgs {
    object_id: String,
    color: String,
}

pub struct ChangeColorTool;

#[async_trait]
impl Tool for ChangeColorTool {
    fn name(&self) -> &str {
        "changeColor"
    }

    fn description(&self) -> &str {
        "Change the fill color of an object. Use a hex color."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "objectId": { "type": "string" },
                "color": { "type": "string" }
            },
            "required": ["objectId", "color"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Update
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: Value) -> Result<ToolOutput, ToolError> {
        let args: ChangeColorArgs = parse_arguments(arguments)?;
        Ok(update(args.object_id, [("fill", json!(args.color))]))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteArgs {
    object_id: String,
}

pub struct DeleteObjectTool;

#[async_trait]
impl Tool for DeleteObjectTool {
    fn name(&self) -> &str {
        "deleteObject"
    }

    fn description(&self) -> &str {
        "Delete an object from the board."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "objectId": { "type": "string" }
            },
            "required": ["objectId"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Delete
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: Value) -> Result<ToolOutput, ToolError> {
        let args: DeleteArgs = parse_arguments(arguments)?;
        Ok(ToolOutput::Delete { id: args.object_id })
    }
}

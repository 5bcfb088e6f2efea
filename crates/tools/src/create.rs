//! Creation tools: sticky notes, shapes, frames, connectors, freehand paths.
//!
//! Each produces a `create` result holding a fully specified object with a
//! fresh id and timestamp. Nothing is persisted here.

use async_trait::async_trait;
use orim_core::canvas::CanvasObject;
use orim_core::error::ToolError;
use orim_core::tool::{ActionKind, Tool, ToolContext, ToolOutput, parse_arguments};
use serde::Deserialize;

use crate::defaults::{self, number_or, text_or};

fn default_origin() -> f64 {
    100.0
}

fn create(object: CanvasObject) -> ToolOutput {
    ToolOutput::Create {
        object,
        title_label: None,
    }
}

// --- createStickyNote ---

#[derive(Debug, Deserialize)]
struct StickyNoteArgs {
    text: String,
    #[serde(default = "default_origin")]
    x: f64,
    #[serde(default = "default_origin")]
    y: f64,
    color: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
}

pub struct CreateStickyNoteTool;

#[async_trait]
impl Tool for CreateStickyNoteTool {
    fn name(&self) -> &str {
        "createStickyNote"
    }

    fn description(&self) -> &str {
        "Create a sticky note on the board with text and an optional position, color and size."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text shown on the note" },
                "x": { "type": "number", "default": 100 },
                "y": { "type": "number", "default": 100 },
                "color": {
                    "type": "string",
                    "description": format!(
                        "Fill color as hex. Palette: {}",
                        defaults::STICKY_COLORS.join(", ")
                    )
                },
                "width": { "type": "number" },
                "height": { "type": "number" }
            },
            "required": ["text"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Create
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: StickyNoteArgs = parse_arguments(arguments)?;
        let d = defaults::STICKY_NOTE;

        let mut note = CanvasObject::new(
            "sticky_note",
            args.x,
            args.y,
            number_or(args.width, d.width),
            number_or(args.height, d.height),
        );
        note.fill = Some(text_or(args.color, d.fill));
        note.text = Some(args.text);
        Ok(create(note))
    }
}

// --- createShape ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShapeArgs {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default = "default_origin")]
    x: f64,
    #[serde(default = "default_origin")]
    y: f64,
    width: Option<f64>,
    height: Option<f64>,
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: Option<f64>,
}

pub struct CreateShapeTool;

#[async_trait]
impl Tool for CreateShapeTool {
    fn name(&self) -> &str {
        "createShape"
    }

    fn description(&self) -> &str {
        "Create a shape on the board. Supported types: rectangle, rounded_rectangle, circle, ellipse, triangle, diamond, star, hexagon, pentagon, arrow, line."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type": { "type": "string", "enum": defaults::SHAPE_TYPES },
                "x": { "type": "number", "default": 100 },
                "y": { "type": "number", "default": 100 },
                "width": { "type": "number" },
                "height": { "type": "number" },
                "fill": { "type": "string" },
                "stroke": { "type": "string" },
                "strokeWidth": { "type": "number" }
            },
            "required": ["type"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Create
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: ShapeArgs = parse_arguments(arguments)?;
        if !defaults::SHAPE_TYPES.contains(&args.kind.as_str()) {
            return Err(ToolError::InvalidArguments(format!(
                "Unknown shape type '{}'. Use one of: {}",
                args.kind,
                defaults::SHAPE_TYPES.join(", ")
            )));
        }
        let d = defaults::for_type(&args.kind).unwrap_or(defaults::RECTANGLE);

        let mut shape = CanvasObject::new(
            args.kind,
            args.x,
            args.y,
            number_or(args.width, d.width),
            number_or(args.height, d.height),
        );
        shape.fill = Some(text_or(args.fill, d.fill));
        shape.stroke = Some(text_or(args.stroke, d.stroke.unwrap_or(defaults::FALLBACK_STROKE)));
        shape.stroke_width = Some(number_or(
            args.stroke_width,
            d.stroke_width.unwrap_or(defaults::FALLBACK_STROKE_WIDTH),
        ));
        Ok(create(shape))
    }
}

// --- createFrame ---

const FRAME_FILL: &str = "#f1f5f9";
const FRAME_STROKE: &str = "#94a3b8";
const TITLE_INSET: f64 = 10.0;
const TITLE_MAX_WIDTH: f64 = 200.0;
const TITLE_HEIGHT: f64 = 40.0;

fn default_frame_width() -> f64 {
    350.0
}
fn default_frame_height() -> f64 {
    300.0
}
fn default_frame_fill() -> String {
    FRAME_FILL.into()
}

#[derive(Debug, Deserialize)]
struct FrameArgs {
    title: String,
    #[serde(default = "default_origin")]
    x: f64,
    #[serde(default = "default_origin")]
    y: f64,
    #[serde(default = "default_frame_width")]
    width: f64,
    #[serde(default = "default_frame_height")]
    height: f64,
    #[serde(default = "default_frame_fill")]
    fill: String,
}

pub struct CreateFrameTool;

#[async_trait]
impl Tool for CreateFrameTool {
    fn name(&self) -> &str {
        "createFrame"
    }

    fn description(&self) -> &str {
        "Create a frame: a large labeled rectangle that groups content, such as SWOT quadrants or kanban columns."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "x": { "type": "number", "default": 100 },
                "y": { "type": "number", "default": 100 },
                "width": { "type": "number", "default": 350 },
                "height": { "type": "number", "default": 300 },
                "fill": { "type": "string", "default": FRAME_FILL }
            },
            "required": ["title"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Create
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: FrameArgs = parse_arguments(arguments)?;

        let mut frame = CanvasObject::new("rectangle", args.x, args.y, args.width, args.height);
        frame.fill = Some(args.fill.clone());
        frame.stroke = Some(FRAME_STROKE.into());
        frame.stroke_width = Some(2.0);
        frame.opacity = Some(0.5);
        frame.z_index = -1;

        let mut label = CanvasObject::new(
            "sticky_note",
            args.x + TITLE_INSET,
            args.y + TITLE_INSET,
            (args.width - 2.0 * TITLE_INSET).min(TITLE_MAX_WIDTH),
            TITLE_HEIGHT,
        );
        label.fill = Some(args.fill);
        label.text = Some(args.title);

        Ok(ToolOutput::Create {
            object: frame,
            title_label: Some(label),
        })
    }
}

// --- createConnector ---

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ConnectorStyle {
    None,
    #[default]
    ArrowEnd,
    ArrowStart,
    ArrowBoth,
}

impl ConnectorStyle {
    fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ArrowEnd => "arrow-end",
            Self::ArrowStart => "arrow-start",
            Self::ArrowBoth => "arrow-both",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectorArgs {
    from_id: String,
    to_id: String,
    #[serde(default)]
    style: ConnectorStyle,
}

pub struct CreateConnectorTool;

#[async_trait]
impl Tool for CreateConnectorTool {
    fn name(&self) -> &str {
        "createConnector"
    }

    fn description(&self) -> &str {
        "Connect two existing objects with an arrow or line. Call getBoardState first to learn the object IDs."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "fromId": { "type": "string" },
                "toId": { "type": "string" },
                "style": {
                    "type": "string",
                    "enum": ["none", "arrow-end", "arrow-start", "arrow-both"],
                    "default": "arrow-end"
                }
            },
            "required": ["fromId", "toId"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Create
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: ConnectorArgs = parse_arguments(arguments)?;
        let d = defaults::CONNECTOR;

        let mut connector = CanvasObject::new("connector", 0.0, 0.0, d.width, d.height);
        connector.fill = Some(d.fill.into());
        connector.stroke = d.stroke.map(str::to_string);
        connector.stroke_width = d.stroke_width;
        connector.from_id = Some(args.from_id);
        connector.to_id = Some(args.to_id);
        connector.connector_style = Some(args.style.as_str().into());
        Ok(create(connector))
    }
}

// --- createFreedraw ---

fn default_freedraw_stroke() -> String {
    "#1f2937".into()
}
fn default_freedraw_width() -> f64 {
    3.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FreedrawArgs {
    points: Vec<f64>,
    #[serde(default = "default_freedraw_stroke")]
    stroke: String,
    #[serde(default = "default_freedraw_width")]
    stroke_width: f64,
}

/// A path normalized to its bounding box.
#[derive(Debug, PartialEq)]
struct NormalizedPath {
    origin: (f64, f64),
    size: (f64, f64),
    points: Vec<f64>,
}

/// Even indices are x, odd are y. Needs at least two points.
fn normalize_path(points: &[f64]) -> Option<NormalizedPath> {
    if points.len() < 4 {
        return None;
    }
    let xs = points.iter().step_by(2).copied();
    let ys = points.iter().skip(1).step_by(2).copied();

    let (min_x, max_x) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (min_y, max_y) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let normalized = points
        .iter()
        .enumerate()
        .map(|(i, v)| if i % 2 == 0 { v - min_x } else { v - min_y })
        .collect();

    Some(NormalizedPath {
        origin: (min_x, min_y),
        size: ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0)),
        points: normalized,
    })
}

pub struct CreateFreedrawTool;

#[async_trait]
impl Tool for CreateFreedrawTool {
    fn name(&self) -> &str {
        "createFreedraw"
    }

    fn description(&self) -> &str {
        "Draw a freehand path. Provide a flat [x1, y1, x2, y2, ...] list in absolute board coordinates; \
         it is normalized to its bounding box. Use many closely spaced points for smooth curves."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "points": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "Flat list of alternating x and y values"
                },
                "stroke": { "type": "string", "default": "#1f2937" },
                "strokeWidth": { "type": "number", "default": 3 }
            },
            "required": ["points"]
        })
    }

    fn action(&self) -> ActionKind {
        ActionKind::Create
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: FreedrawArgs = parse_arguments(arguments)?;
        let path = normalize_path(&args.points).ok_or_else(|| {
            ToolError::InvalidArguments("Need at least 2 points (4 values) for a freehand drawing".into())
        })?;

        let mut drawing = CanvasObject::new("freedraw", path.origin.0, path.origin.1, path.size.0, path.size.1);
        drawing.fill = Some("transparent".into());
        drawing.stroke = Some(args.stroke);
        drawing.stroke_width = Some(args.stroke_width);
        drawing.points = Some(path.points);
        Ok(create(drawing))
    }
}

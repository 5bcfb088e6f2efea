//! Data model for traces and request scores.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name every chat trace is recorded under.
pub const TRACE_NAME: &str = "ai-chat";

/// Deployment tag attached to every trace.
pub const BACKEND: &str = "docker";

/// Tools that add objects to the board.
pub const CREATE_TOOLS: [&str; 5] = [
    "createStickyNote",
    "createShape",
    "createFrame",
    "createConnector",
    "createFreedraw",
];

/// Tools that change existing objects.
pub const MODIFY_TOOLS: [&str; 5] = [
    "moveObject",
    "resizeObject",
    "updateText",
    "changeColor",
    "arrangeObjects",
];

pub const DELETE_TOOL: &str = "deleteObject";
pub const READ_TOOL: &str = "getBoardState";

/// Tool-call count at which a request is considered to have hit the step limit.
pub const STEP_LIMIT: usize = 10;

// ── Trace ─────────────────────────────────────────────────────────────────

/// An open trace for one chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHandle {
    pub trace_id: String,
    pub name: String,
    pub session_id: String,
    pub tags: Vec<String>,
    pub metadata: serde_json::Value,
}

impl TraceHandle {
    pub fn new(board_id: &str, command_type: &str, model: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
            name: TRACE_NAME.into(),
            session_id: format!("board:{board_id}"),
            tags: vec![
                format!("backend:{BACKEND}"),
                format!("model:{model}"),
                format!("command:{command_type}"),
            ],
            metadata: serde_json::json!({
                "boardId": board_id,
                "backend": BACKEND,
                "commandType": command_type,
            }),
        }
    }
}

// ── Scores ────────────────────────────────────────────────────────────────

/// A single numeric score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub name: String,
    pub value: f64,
}

/// Scores computed from the tool names one request invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub tool_call_count: usize,
    pub objects_affected: usize,
    pub got_board_state: bool,
    pub hit_step_limit: bool,
    pub latency_ms: u64,
}

impl ScoreSummary {
    pub fn from_tool_names<S: AsRef<str>>(tool_names: &[S], latency_ms: u64) -> Self {
        let count = |pred: &dyn Fn(&str) -> bool| tool_names.iter().filter(|n| pred(n.as_ref())).count();

        let created = count(&|n| CREATE_TOOLS.contains(&n));
        let modified = count(&|n| MODIFY_TOOLS.contains(&n));
        let deleted = count(&|n| n == DELETE_TOOL);

        Self {
            tool_call_count: tool_names.len(),
            objects_affected: created + modified + deleted,
            got_board_state: tool_names.iter().any(|n| n.as_ref() == READ_TOOL),
            hit_step_limit: tool_names.len() >= STEP_LIMIT,
            latency_ms,
        }
    }

    /// Scores in submission order. `error` is always zero here; failed
    /// requests are visible through their error event.
    pub fn scores(&self) -> Vec<Score> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        [
            ("tool_call_count", self.tool_call_count as f64),
            ("objects_affected", self.objects_affected as f64),
            ("got_board_state", flag(self.got_board_state)),
            ("hit_step_limit", flag(self.hit_step_limit)),
            ("latency_ms", self.latency_ms as f64),
            ("error", 0.0),
        ]
        .into_iter()
        .map(|(name, value)| Score {
            name: name.into(),
            value,
        })
        .collect()
    }
}

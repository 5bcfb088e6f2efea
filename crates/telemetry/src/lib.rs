//! Trace and score recording for Orim chat requests.
//!
//! Each request opens one trace tagged with its board, command label and
//! model, and closes it with a fixed set of numeric scores derived from the
//! tools the agent invoked. Telemetry never fails a request: every backend
//! error is logged and dropped.

pub mod langfuse;
pub mod model;
pub mod recorder;
pub mod sink;

pub use langfuse::LangfuseSink;
pub use model::{Score, ScoreSummary, TraceHandle};
pub use recorder::TelemetryRecorder;
pub use sink::{MemorySink, TelemetrySink};

/// Errors from the telemetry subsystem.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("telemetry request failed: {0}")]
    Request(String),

    #[error("telemetry backend rejected request: {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

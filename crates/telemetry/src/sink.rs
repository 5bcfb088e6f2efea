//! Where traces and scores are sent.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::TelemetryError;
use crate::model::{Score, TraceHandle};

/// A telemetry backend.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Register a new trace.
    async fn create_trace(&self, trace: &TraceHandle) -> Result<(), TelemetryError>;

    /// Attach one score to an existing trace.
    async fn post_score(&self, trace_id: &str, score: &Score) -> Result<(), TelemetryError>;
}

/// Records everything in memory. Used by tests and local runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    traces: Mutex<Vec<TraceHandle>>,
    scores: Mutex<Vec<(String, Score)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn traces(&self) -> Vec<TraceHandle> {
        self.traces.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Recorded `(trace_id, score)` pairs, in submission order.
    pub fn scores(&self) -> Vec<(String, Score)> {
        self.scores.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TelemetrySink for MemorySink {
    async fn create_trace(&self, trace: &TraceHandle) -> Result<(), TelemetryError> {
        if let Ok(mut traces) = self.traces.lock() {
            traces.push(trace.clone());
        }
        Ok(())
    }

    async fn post_score(&self, trace_id: &str, score: &Score) -> Result<(), TelemetryError> {
        if let Ok(mut scores) = self.scores.lock() {
            scores.push((trace_id.to_string(), score.clone()));
        }
        Ok(())
    }
}

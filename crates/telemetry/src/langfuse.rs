//! Langfuse public API client.
//!
//! Traces go through the batch ingestion endpoint, scores through
//! `/api/public/scores`. Both use HTTP Basic auth with the project's
//! public and secret key.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::TelemetryError;
use crate::model::{Score, TraceHandle};
use crate::sink::TelemetrySink;

pub struct LangfuseSink {
    base_url: String,
    authorization: String,
    client: reqwest::Client,
}

impl LangfuseSink {
    pub fn new(base_url: impl Into<String>, public_key: &str, secret_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorization: basic_auth(public_key, secret_key),
            client,
        }
    }

    /// A sink when both keys are configured.
    pub fn from_config(config: &orim_config::LangfuseConfig) -> Option<Self> {
        let (public_key, secret_key) = config.keys()?;
        Some(Self::new(config.base_url.clone(), public_key, secret_key))
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<(), TelemetryError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "Posting to Langfuse");

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.authorization)
            .json(body)
            .send()
            .await
            .map_err(|e| TelemetryError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(TelemetryError::Rejected {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}

fn basic_auth(public_key: &str, secret_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{public_key}:{secret_key}")))
}

fn trace_batch(trace: &TraceHandle) -> serde_json::Value {
    serde_json::json!({
        "batch": [{
            "id": uuid::Uuid::new_v4().to_string(),
            "type": "trace-create",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "body": {
                "id": trace.trace_id,
                "name": trace.name,
                "sessionId": trace.session_id,
                "tags": trace.tags,
                "metadata": trace.metadata,
            }
        }]
    })
}

fn score_body(trace_id: &str, score: &Score) -> serde_json::Value {
    serde_json::json!({
        "traceId": trace_id,
        "name": score.name,
        "value": score.value,
        "dataType": "NUMERIC",
    })
}

#[async_trait]
impl TelemetrySink for LangfuseSink {
    async fn create_trace(&self, trace: &TraceHandle) -> Result<(), TelemetryError> {
        self.post("/api/public/ingestion", &trace_batch(trace)).await
    }

    async fn post_score(&self, trace_id: &str, score: &Score) -> Result<(), TelemetryError> {
        self.post("/api/public/scores", &score_body(trace_id, score)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_encodes_key_pair() {
        assert_eq!(basic_auth("pk", "sk"), "Basic cGs6c2s=");
    }

    #[test]
    fn from_config_requires_both_keys() {
        let mut config = orim_config::LangfuseConfig::default();
        config.public_key = Some("pk".into());
        assert!(LangfuseSink::from_config(&config).is_none());

        config.secret_key = Some("sk".into());
        config.base_url = "https://cloud.langfuse.com/".into();
        let sink = LangfuseSink::from_config(&config).unwrap();
        assert_eq!(sink.base_url, "https://cloud.langfuse.com");
    }

    #[test]
    fn score_body_is_numeric() {
        let body = score_body("t1", &Score { name: "latency_ms".into(), value: 12.0 });
        assert_eq!(body["traceId"], "t1");
        assert_eq!(body["dataType"], "NUMERIC");
        assert_eq!(body["value"], 12.0);
    }

    #[test]
    fn trace_batch_carries_session_and_tags() {
        let trace = TraceHandle::new("b1", "create", "claude-sonnet-4-5");
        let batch = trace_batch(&trace);
        let event = &batch["batch"][0];
        assert_eq!(event["type"], "trace-create");
        assert_eq!(event["body"]["id"], trace.trace_id.as_str());
        assert_eq!(event["body"]["sessionId"], "board:b1");
        assert_eq!(event["body"]["tags"][2], "command:create");
    }

    #[tokio::test]
    async fn unreachable_backend_is_request_error() {
        let sink = LangfuseSink::new("http://127.0.0.1:9", "pk", "sk");
        let err = sink
            .post_score("t1", &Score { name: "error".into(), value: 0.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, TelemetryError::Request(_)));
    }
}

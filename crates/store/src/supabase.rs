//! Supabase store: reads `board_objects` through the PostgREST API.
//!
//! Authenticates with the service role key in both the `apikey` and
//! `Authorization: Bearer` headers.

use async_trait::async_trait;
use orim_core::canvas::{CanvasStore, ObjectSize, StoredObject};
use orim_core::error::StoreError;
use serde::de::DeserializeOwned;
use tracing::debug;

const TABLE: &str = "board_objects";
const OBJECT_COLUMNS: &str = "id,type,x,y,width,height,data,z_index";
const SIZE_COLUMNS: &str = "id,width,height";

pub struct SupabaseStore {
    rest_url: String,
    service_key: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        let url = url.into();

        Self {
            rest_url: format!("{}/rest/v1/{TABLE}", url.trim_end_matches('/')),
            service_key: service_key.into(),
            client,
        }
    }

    async fn select<T: DeserializeOwned>(&self, query: &[(&str, String)]) -> Result<Vec<T>, StoreError> {
        debug!(url = %self.rest_url, ?query, "PostgREST select");

        let response = self
            .client
            .get(&self.rest_url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(query)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::RequestFailed {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// PostgREST `in.(...)` filter with every id double-quoted.
fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[async_trait]
impl CanvasStore for SupabaseStore {
    fn name(&self) -> &str { "supabase" }

    async fn list_objects(&self, board_id: &str) -> Result<Vec<StoredObject>, StoreError> {
        self.select(&[
            ("select", OBJECT_COLUMNS.to_string()),
            ("board_id", format!("eq.{board_id}")),
            ("order", "z_index.asc".to_string()),
        ])
        .await
    }

    async fn object_sizes(&self, board_id: &str, ids: &[String]) -> Result<Vec<ObjectSize>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(&[
            ("select", SIZE_COLUMNS.to_string()),
            ("board_id", format!("eq.{board_id}")),
            ("id", in_filter(ids)),
        ])
        .await
    }
}

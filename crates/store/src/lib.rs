//! Canvas store implementations for Orim.
//!
//! - [`SupabaseStore`]: reads the `board_objects` table through PostgREST
//! - [`InMemoryStore`]: process-local rows, for tests and unconfigured runs

pub mod in_memory;
pub mod supabase;

pub use in_memory::InMemoryStore;
pub use supabase::SupabaseStore;

use orim_core::CanvasStore;
use std::sync::Arc;

/// Select the process-wide store.
///
/// Supabase when both the URL and the service-role key are set, otherwise an
/// empty in-memory store.
pub fn from_config(config: &orim_config::SupabaseConfig) -> Arc<dyn CanvasStore> {
    match config.credentials() {
        Some((url, key)) => Arc::new(SupabaseStore::new(url, key)),
        None => {
            tracing::warn!("Supabase not configured (SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY), using an empty in-memory store");
            Arc::new(InMemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_memory_without_credentials() {
        let mut config = orim_config::SupabaseConfig::default();
        assert_eq!(from_config(&config).name(), "in_memory");

        config.url = Some("https://proj.supabase.co".into());
        assert_eq!(from_config(&config).name(), "in_memory");

        config.service_role_key = Some("service-key".into());
        assert_eq!(from_config(&config).name(), "supabase");
    }
}

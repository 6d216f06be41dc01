//! Experience Store
//!
//! Per-user, append-only memory buckets. Buckets are created lazily on the
//! first store for a user and live for the lifetime of the process; there is no
//! eviction, capacity bound or expiry.
//!
//! All mutations go through a single `RwLock`, so concurrent stores to the same
//! user never lose updates.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::telemetry::AUDIT_TARGET;

/// Returned by [`ExperienceStore::recall`] when a user has nothing stored
pub const NO_MEMORY: &str = "No Memory Available";

/// Bucket used when a request carries no `user_id`
pub const DEFAULT_USER: &str = "default";

/// In-memory experience store keyed by user id
#[derive(Debug, Default)]
pub struct ExperienceStore {
    buckets: RwLock<HashMap<String, Vec<Value>>>,
}

impl ExperienceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an experience to the user's bucket and return the confirmation
    pub async fn store(&self, user_id: &str, experience: Value) -> String {
        let rendered = render(&experience);
        {
            let mut buckets = self.buckets.write().await;
            buckets
                .entry(user_id.to_string())
                .or_default()
                .push(experience);
        }

        tracing::info!(target: AUDIT_TARGET, user_id, "Memory Stored: {}", rendered);
        format!("Memory Stored: {}", rendered)
    }

    /// Most recent experience for the user, or the [`NO_MEMORY`] sentinel
    pub async fn recall(&self, user_id: &str) -> Value {
        let buckets = self.buckets.read().await;
        buckets
            .get(user_id)
            .and_then(|bucket| bucket.last())
            .cloned()
            .unwrap_or_else(|| Value::String(NO_MEMORY.to_string()))
    }

    /// Number of experiences stored for the user
    pub async fn len_for(&self, user_id: &str) -> usize {
        let buckets = self.buckets.read().await;
        buckets.get(user_id).map_or(0, Vec::len)
    }

    /// Number of users with a bucket
    pub async fn user_count(&self) -> usize {
        self.buckets.read().await.len()
    }
}

/// Strings render raw, anything else as compact JSON
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_recall_unknown_user() {
        let store = ExperienceStore::new();
        assert_eq!(store.recall("nobody").await, json!(NO_MEMORY));
    }

    #[tokio::test]
    async fn test_store_confirmation() {
        let store = ExperienceStore::new();
        let result = store.store("u1", json!("m1")).await;
        assert_eq!(result, "Memory Stored: m1");
    }

    #[tokio::test]
    async fn test_store_json_value_renders_compact() {
        let store = ExperienceStore::new();
        let result = store.store("u1", json!({"mood": "calm"})).await;
        assert_eq!(result, r#"Memory Stored: {"mood":"calm"}"#);
        assert_eq!(store.recall("u1").await, json!({"mood": "calm"}));
    }

    #[tokio::test]
    async fn test_recall_returns_last() {
        let store = ExperienceStore::new();
        store.store("u1", json!("first")).await;
        store.store("u1", json!("second")).await;
        store.store("u1", json!("third")).await;

        assert_eq!(store.recall("u1").await, json!("third"));
        assert_eq!(store.len_for("u1").await, 3);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = ExperienceStore::new();
        store.store("u1", json!("a")).await;

        assert_eq!(store.recall("u2").await, json!(NO_MEMORY));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_stores_are_not_lost() {
        let store = Arc::new(ExperienceStore::new());
        let mut handles = Vec::new();

        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.store("shared", json!(i)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len_for("shared").await, 50);
    }
}

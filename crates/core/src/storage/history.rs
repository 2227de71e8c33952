use crate::domain::snack::SnackData;
use crate::storage::{KeyValueStore, HISTORY_KEY};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub snack: SnackData,
}

/// Oldest first. A missing, unreadable or malformed blob reads as an empty history.
pub async fn load(store: &dyn KeyValueStore) -> Vec<HistoryEntry> {
    let raw = match store.get(HISTORY_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "failed to read snack history");
            return Vec::new();
        }
    };
    serde_json::from_value(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "snack history is malformed; treating as empty");
        Vec::new()
    })
}

/// Read-modify-write of the whole list; callers serialise concurrent appends.
///
/// Unlike `load`, a failed read or a malformed blob aborts the append so existing entries are
/// never overwritten.
pub async fn append(store: &dyn KeyValueStore, snack: SnackData) -> anyhow::Result<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = match store
        .get(HISTORY_KEY)
        .await
        .context("failed to read snack history before append")?
    {
        Some(raw) => serde_json::from_value(raw)
            .context("snack history is malformed; refusing to overwrite it")?,
        None => Vec::new(),
    };
    let entry = HistoryEntry {
        id: Uuid::new_v4(),
        saved_at: Utc::now(),
        snack,
    };
    entries.push(entry.clone());

    let value = serde_json::to_value(&entries).context("failed to encode snack history")?;
    store.set(HISTORY_KEY, value).await?;
    tracing::debug!(id = %entry.id, len = entries.len(), "snack appended to history");
    Ok(entry)
}

pub async fn clear(store: &dyn KeyValueStore) -> anyhow::Result<()> {
    store.remove(HISTORY_KEY).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::fallback::FallbackCatalog;
    use crate::storage::MemoryKeyValueStore;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct UnreadableStore {
        inner: MemoryKeyValueStore,
        fail_reads: AtomicBool,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for UnreadableStore {
        async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                anyhow::bail!("connection reset");
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn appends_in_order_and_clears() {
        let store = MemoryKeyValueStore::new();
        assert!(load(&store).await.is_empty());

        let mut snack = FallbackCatalog::default().offline_snack();
        let first = append(&store, snack.clone()).await.unwrap();
        snack.snack_name = "Kettle Corn".to_string();
        let second = append(&store, snack).await.unwrap();

        let entries = load(&store).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], first);
        assert_eq!(entries[1].id, second.id);
        assert_eq!(entries[1].snack.snack_name, "Kettle Corn");

        clear(&store).await.unwrap();
        assert!(load(&store).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_blob_reads_as_empty_and_blocks_append() {
        let store = MemoryKeyValueStore::new();
        store.set(HISTORY_KEY, json!({"not": "a list"})).await.unwrap();
        assert!(load(&store).await.is_empty());

        assert!(append(&store, FallbackCatalog::default().snack).await.is_err());
        assert_eq!(
            store.get(HISTORY_KEY).await.unwrap(),
            Some(json!({"not": "a list"}))
        );
    }

    #[tokio::test]
    async fn failed_read_does_not_wipe_history() {
        let store = UnreadableStore {
            inner: MemoryKeyValueStore::new(),
            fail_reads: AtomicBool::new(false),
        };
        let snack = FallbackCatalog::default().snack;
        for _ in 0..3 {
            append(&store, snack.clone()).await.unwrap();
        }

        store.fail_reads.store(true, Ordering::SeqCst);
        assert!(append(&store, snack.clone()).await.is_err());
        assert!(load(&store).await.is_empty());

        store.fail_reads.store(false, Ordering::SeqCst);
        assert_eq!(load(&store).await.len(), 3);
    }
}

use crate::storage::KeyValueStore;
use anyhow::Context;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct PgKeyValueStore {
    pool: sqlx::PgPool,
}

impl PgKeyValueStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let row: Option<(Value,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = $1")
            .persistent(false)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("select kv_store failed (key={key})"))?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at",
        )
        .persistent(false)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("upsert kv_store failed (key={key})"))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .persistent(false)
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("delete kv_store failed (key={key})"))?;
        Ok(())
    }
}

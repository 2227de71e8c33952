pub mod history;
pub mod memory;
pub mod postgres;
pub mod preferences;
pub mod profile;

pub use memory::MemoryKeyValueStore;
pub use postgres::PgKeyValueStore;

use anyhow::Context;
use serde_json::Value;

pub const HISTORY_KEY: &str = "snackmatch_history";
pub const PROFILE_KEY: &str = "snackmatch_user_profile";
pub const PREFERENCE_MODEL_KEY: &str = "snackmatch_preference_model";

pub async fn migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("sqlx migrations failed")?;
    Ok(())
}

/// Whole-blob JSON storage. Each key holds one independent document.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()>;

    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

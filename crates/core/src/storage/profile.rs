use crate::domain::profile::UserProfile;
use crate::storage::{KeyValueStore, PROFILE_KEY};
use anyhow::Context;

pub async fn load(store: &dyn KeyValueStore) -> anyhow::Result<Option<UserProfile>> {
    let Some(raw) = store.get(PROFILE_KEY).await? else {
        return Ok(None);
    };
    match serde_json::from_value::<UserProfile>(raw) {
        Ok(profile) => Ok(Some(profile)),
        Err(e) => {
            tracing::warn!(error = %e, "stored user profile is malformed; ignoring");
            Ok(None)
        }
    }
}

pub async fn save(store: &dyn KeyValueStore, profile: &UserProfile) -> anyhow::Result<()> {
    let value = serde_json::to_value(profile).context("failed to encode user profile")?;
    store.set(PROFILE_KEY, value).await
}

pub async fn clear(store: &dyn KeyValueStore) -> anyhow::Result<()> {
    store.remove(PROFILE_KEY).await
}

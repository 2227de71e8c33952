use crate::domain::preferences::{FeedbackAction, PreferenceModel};
use crate::storage::{KeyValueStore, PREFERENCE_MODEL_KEY};
use anyhow::Context;

/// Falls back to the all-zero model when nothing usable is stored.
pub async fn load(store: &dyn KeyValueStore) -> anyhow::Result<PreferenceModel> {
    let Some(raw) = store.get(PREFERENCE_MODEL_KEY).await? else {
        return Ok(PreferenceModel::default());
    };
    Ok(serde_json::from_value(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "stored preference model is malformed; resetting");
        PreferenceModel::default()
    }))
}

pub async fn save(store: &dyn KeyValueStore, model: &PreferenceModel) -> anyhow::Result<()> {
    let value = serde_json::to_value(model).context("failed to encode preference model")?;
    store.set(PREFERENCE_MODEL_KEY, value).await
}

pub async fn record_feedback(
    store: &dyn KeyValueStore,
    snack_name: &str,
    action: FeedbackAction,
) -> anyhow::Result<PreferenceModel> {
    let mut model = load(store).await?;
    model.apply_feedback(snack_name, action);
    save(store, &model).await?;
    tracing::debug!(%snack_name, ?action, "preference model updated");
    Ok(model)
}

pub mod fallback;
pub mod normalize;
pub mod prompts;

use crate::domain::contract::GeneratedSnack;
use crate::domain::profile::UserProfile;
use crate::domain::snack::{BookRecommendation, MusicRecommendation, SnackData};
use crate::llm::error::LlmError;
use crate::llm::{LlmClient, Provider};
use crate::recommend::fallback::FallbackCatalog;
use crate::recommend::normalize::{BOOK_KEYS, MUSIC_KEYS};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Turns a vibe into a complete `SnackData`.
///
/// Generation runs in two stages. The snack comes first because the music and book prompts
/// are written around it; those two then run concurrently and land in disjoint fields. Every
/// failure is absorbed at its own task boundary, so callers only ever see degraded content,
/// never an error.
#[derive(Clone)]
pub struct SnackRecommender {
    client: Arc<dyn LlmClient>,
    fallbacks: FallbackCatalog,
}

impl SnackRecommender {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            fallbacks: FallbackCatalog::default(),
        }
    }

    pub fn with_fallbacks(mut self, fallbacks: FallbackCatalog) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn provider(&self) -> Provider {
        self.client.provider()
    }

    pub fn fallbacks(&self) -> &FallbackCatalog {
        &self.fallbacks
    }

    /// `profile` is accepted for API stability but does not influence any prompt yet.
    pub async fn generate_snack(&self, vibe: &str, profile: Option<&UserProfile>) -> SnackData {
        let provider = self.provider();
        tracing::info!(
            %provider,
            vibe_len = vibe.chars().count(),
            has_profile = profile.is_some_and(|p| !p.is_empty()),
            "generating snack"
        );

        let mut snack = match self.generate_base_snack(vibe).await {
            Ok(snack) => snack,
            Err(err) => {
                tracing::warn!(
                    %provider,
                    task = "snack",
                    error = %format!("{err:#}"),
                    "using fallback snack"
                );
                self.fallbacks.snack.clone()
            }
        };

        let music_prompt = prompts::music_prompt(&snack.snack_name, vibe, snack.energy_score);
        let book_prompt = prompts::book_prompt(&snack.snack_name, vibe, snack.energy_score);
        let (music, books) = tokio::join!(
            self.generate_list::<MusicRecommendation>("music", &music_prompt, MUSIC_KEYS),
            self.generate_list::<BookRecommendation>("books", &book_prompt, BOOK_KEYS),
        );

        snack.music_recommendations = music.unwrap_or_else(|err| {
            tracing::warn!(%provider, task = "music", error = %err, "using fallback music");
            self.fallbacks.music_fallback()
        });
        snack.book_recommendations = books.unwrap_or_else(|err| {
            tracing::warn!(%provider, task = "books", error = %err, "using fallback books");
            self.fallbacks.book_fallback()
        });

        tracing::info!(
            %provider,
            snack_name = %snack.snack_name,
            music = snack.music_recommendations.len(),
            books = snack.book_recommendations.len(),
            "snack generated"
        );
        snack
    }

    async fn generate_base_snack(&self, vibe: &str) -> anyhow::Result<SnackData> {
        let raw = self.client.generate(&prompts::snack_prompt(vibe)).await?;
        GeneratedSnack::from_value(raw)?.validate_and_into_snack(&self.fallbacks.nutrition)
    }

    async fn generate_list<T: DeserializeOwned>(
        &self,
        task: &'static str,
        prompt: &str,
        candidate_keys: &[&str],
    ) -> Result<Vec<T>, LlmError> {
        let raw = self.client.generate(prompt).await?;
        let items = normalize::extract_items::<T>(&raw, candidate_keys);
        if items.is_empty() {
            return Err(LlmError::EmptyResult { task });
        }
        tracing::debug!(task, items = items.len(), "recommendations parsed");
        Ok(items)
    }
}

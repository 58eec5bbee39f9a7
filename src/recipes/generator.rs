// ABOUTME: Recipe generation pipeline from user ingredients to a validated draft
// ABOUTME: Builds the prompt, calls the configured LLM provider with a deadline, and normalizes the reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::normalizer::{normalize, NormalizedRecipe};
use super::prompt::{GenerationPreferences, IngredientInput, OutputFormat, RecipePromptBuilder};
use crate::config::{GenerationOptions, LlmConfig};
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatRequest, LlmProvider};
use crate::logging::AppLogger;

/// Ingredients and preferences for a single generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeRequest {
    /// Ingredients the user has on hand
    pub ingredients: Vec<IngredientInput>,
    /// Optional constraints
    #[serde(flatten)]
    pub preferences: GenerationPreferences,
    /// Output shape requested from the model
    #[serde(default)]
    pub format: OutputFormat,
}

/// Turns ingredient lists into recipes through an LLM provider
#[derive(Clone)]
pub struct RecipeGenerator {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
    timeout: Duration,
}

impl RecipeGenerator {
    /// Create a generator with explicit sampling options and deadline
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions, timeout: Duration) -> Self {
        Self {
            provider,
            options,
            timeout,
        }
    }

    /// Create a generator from the LLM section of the server configuration
    #[must_use]
    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self::new(provider, config.generation, config.timeout)
    }

    /// Name of the backing provider
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Whether the provider answers its health check within the deadline
    ///
    /// Errors and timeouts count as unreachable and are logged.
    pub async fn provider_reachable(&self) -> bool {
        match timeout(self.timeout, self.provider.health_check()).await {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(e)) => {
                warn!(provider = self.provider.name(), error = %e, "LLM health check failed");
                false
            }
            Err(_) => {
                warn!(provider = self.provider.name(), "LLM health check timed out");
                false
            }
        }
    }

    /// Generate and validate one recipe
    ///
    /// Structured-text replies never list ingredients, so the draft falls back
    /// to the requested ingredients when the model omits them.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when no usable ingredient was given
    /// - a provider failure code when the call errors or exceeds the deadline
    /// - `MalformedResponse` or `MissingRequiredField` when the reply cannot
    ///   be normalized
    #[instrument(skip(self, request), fields(provider = self.provider.name(), ingredients = request.ingredients.len()))]
    pub async fn generate(&self, request: &RecipeRequest) -> AppResult<NormalizedRecipe> {
        let prompt = RecipePromptBuilder::new(request.ingredients.clone())
            .with_preferences(request.preferences.clone())
            .with_format(request.format)
            .build()?;

        let chat_request =
            ChatRequest::new(prompt.to_messages()).with_generation_options(&self.options);

        let started = Instant::now();
        let response = timeout(self.timeout, self.provider.complete(&chat_request))
            .await
            .map_err(|_| {
                warn!(timeout_secs = self.timeout.as_secs(), "LLM completion timed out");
                AppError::provider_unavailable(
                    self.provider.display_name(),
                    format!("no response within {}s", self.timeout.as_secs()),
                )
            })??;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            model = %response.model,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            content_len = response.content.len(),
            "LLM completion received"
        );

        let mut normalized = normalize(&response.content)?;
        if normalized.draft.ingredients.is_empty() {
            normalized.draft.ingredients = request
                .ingredients
                .iter()
                .filter(|input| !input.name().trim().is_empty())
                .map(IngredientInput::to_ingredient)
                .collect();
        }

        AppLogger::log_recipe_generated(
            self.provider.name(),
            normalized.shape.as_str(),
            &normalized.draft.title,
            duration_ms,
        );

        Ok(normalized)
    }
}

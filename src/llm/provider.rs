// ABOUTME: LLM provider selection from configuration at startup
// ABOUTME: Builds the configured Gemini or OpenAI-compatible provider behind a trait object
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! # LLM Provider Selector
//!
//! `LLM_PROVIDER` selects the backend:
//! - `gemini` (default): requires `GEMINI_API_KEY`
//! - `openai`: uses `OPENAI_BASE_URL` and an optional `OPENAI_API_KEY`

use std::sync::Arc;

use tracing::info;

use super::{GeminiProvider, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::config::{LlmConfig, LlmProviderType};
use crate::errors::AppError;

/// Create the configured provider
///
/// # Errors
///
/// Returns a configuration error if Gemini is selected without an API key,
/// or if the HTTP client cannot be built.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, AppError> {
    let provider: Arc<dyn LlmProvider> = match config.provider {
        LlmProviderType::Gemini => {
            let api_key = config.gemini_api_key.as_deref().ok_or_else(|| {
                AppError::config("GEMINI_API_KEY environment variable not set")
            })?;
            let mut provider = GeminiProvider::new(api_key);
            if let Some(model) = &config.model {
                provider = provider.with_default_model(model);
            }
            Arc::new(provider)
        }
        LlmProviderType::OpenAi => {
            let mut provider_config = OpenAiCompatibleConfig::new(
                config.openai_base_url.clone(),
                config.openai_api_key.clone(),
            );
            if let Some(model) = &config.model {
                provider_config = provider_config.with_default_model(model);
            }
            Arc::new(OpenAiCompatibleProvider::new(provider_config)?)
        }
    };

    info!(
        provider = provider.display_name(),
        model = provider.default_model(),
        "LLM provider initialized (set LLM_PROVIDER to change)"
    );

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_gemini_requires_api_key() {
        let config = LlmConfig::default();
        let Err(err) = create_provider(&config) else {
            panic!("expected missing key error");
        };
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_model_override_applies() {
        let config = LlmConfig {
            gemini_api_key: Some("key".to_owned()),
            model: Some("gemini-1.5-pro".to_owned()),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.default_model(), "gemini-1.5-pro");
    }

    #[test]
    fn test_openai_without_key_is_allowed() {
        let config = LlmConfig {
            provider: LlmProviderType::OpenAi,
            ..LlmConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4");
    }
}

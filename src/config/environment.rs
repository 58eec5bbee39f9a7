// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses HTTP, database, CORS, and LLM settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::info;

use chefgpt_core::constants::{defaults, env_vars};

use super::types::LlmProviderType;

/// Sampling parameters sent with every completion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    /// Response randomness
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Top-k sampling cutoff
    pub top_k: u32,
    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: defaults::TEMPERATURE,
            top_p: defaults::TOP_P,
            top_k: defaults::TOP_K,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
        }
    }
}

/// LLM provider configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Which provider backs recipe generation
    pub provider: LlmProviderType,
    /// Google AI Studio key, required for Gemini
    pub gemini_api_key: Option<String>,
    /// Bearer key for `OpenAI`-compatible endpoints (optional for local servers)
    pub openai_api_key: Option<String>,
    /// Base URL of the `OpenAI`-compatible API
    pub openai_base_url: String,
    /// Model override; providers fall back to their default model
    pub model: Option<String>,
    /// Sampling parameters
    pub generation: GenerationOptions,
    /// Upper bound on a single completion call
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            gemini_api_key: None,
            openai_api_key: None,
            openai_base_url: defaults::OPENAI_BASE_URL.to_owned(),
            model: None,
            generation: GenerationOptions::default(),
            timeout: Duration::from_secs(defaults::LLM_TIMEOUT_SECS),
        }
    }
}

impl Debug for LlmConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("generation", &self.generation)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// `SQLite` connection URL
    pub database_url: String,
    /// Allowed CORS origins; `["*"]` allows any origin
    pub cors_allowed_origins: Vec<String>,
    /// LLM provider settings
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HTTP_HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            database_url: defaults::DATABASE_URL.to_owned(),
            cors_allowed_origins: parse_origins(defaults::CORS_ALLOWED_ORIGINS),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric setting cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let llm = LlmConfig {
            provider: LlmProviderType::from_str_or_default(&env_var_or(
                env_vars::LLM_PROVIDER,
                defaults::LLM_PROVIDER,
            )),
            gemini_api_key: optional_env(env_vars::GEMINI_API_KEY),
            openai_api_key: optional_env(env_vars::OPENAI_API_KEY),
            openai_base_url: env_var_or(env_vars::OPENAI_BASE_URL, defaults::OPENAI_BASE_URL),
            model: optional_env(env_vars::LLM_MODEL),
            generation: GenerationOptions {
                temperature: parse_env(env_vars::LLM_TEMPERATURE, defaults::TEMPERATURE)?,
                top_p: parse_env(env_vars::LLM_TOP_P, defaults::TOP_P)?,
                top_k: parse_env(env_vars::LLM_TOP_K, defaults::TOP_K)?,
                max_output_tokens: parse_env(env_vars::LLM_MAX_TOKENS, defaults::MAX_OUTPUT_TOKENS)?,
            },
            timeout: Duration::from_secs(parse_env(
                env_vars::LLM_TIMEOUT_SECS,
                defaults::LLM_TIMEOUT_SECS,
            )?),
        };

        let config = Self {
            host: env_var_or(env_vars::HTTP_HOST, defaults::HTTP_HOST),
            http_port: parse_env(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            database_url: env_var_or(env_vars::DATABASE_URL, defaults::DATABASE_URL),
            cors_allowed_origins: parse_origins(&env_var_or(
                env_vars::CORS_ALLOWED_ORIGINS,
                defaults::CORS_ALLOWED_ORIGINS,
            )),
            llm,
        };

        info!(
            host = %config.host,
            http_port = config.http_port,
            llm.provider = %config.llm.provider,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Socket address string for the HTTP listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Non-empty value of an environment variable
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an environment variable, using `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}")),
        None => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    let trimmed = origins_str.trim();
    if trimmed.is_empty() || trimmed == "*" {
        vec!["*".to_owned()]
    } else {
        trimmed
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

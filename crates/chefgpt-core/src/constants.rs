// ABOUTME: Application constants organized by domain
// ABOUTME: Environment variable names, defaults, and recipe limits shared across crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! Constants grouped by domain rather than kept in one flat list.

/// Service identity used in logs and health responses
pub mod service_names {
    /// Name of the HTTP server binary and service
    pub const CHEFGPT_SERVER: &str = "chefgpt-server";
    /// Human-readable API name
    pub const API_DISPLAY_NAME: &str = "ChefGPT API";
}

/// Environment variable names
pub mod env_vars {
    /// Interface to bind
    pub const HTTP_HOST: &str = "HTTP_HOST";
    /// Port to bind
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// sqlx database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Comma-separated CORS allow-list
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Which completion provider to use (`gemini` or `openai`)
    pub const LLM_PROVIDER: &str = "LLM_PROVIDER";
    /// Model override for the selected provider
    pub const LLM_MODEL: &str = "LLM_MODEL";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
    /// Nucleus sampling cutoff
    pub const LLM_TOP_P: &str = "LLM_TOP_P";
    /// Top-k sampling cutoff
    pub const LLM_TOP_K: &str = "LLM_TOP_K";
    /// Maximum output tokens
    pub const LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
    /// Seconds before a completion call is abandoned
    pub const LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
    /// Google AI Studio key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// `OpenAI` (or compatible) key
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// `OpenAI`-compatible base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
}

/// Default configuration values
pub mod defaults {
    /// Default bind interface
    pub const HTTP_HOST: &str = "0.0.0.0";
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:chefgpt.db";
    /// Default CORS allow-list (any origin)
    pub const CORS_ALLOWED_ORIGINS: &str = "*";
    /// Default completion provider
    pub const LLM_PROVIDER: &str = "gemini";
    /// Default Gemini model
    pub const GEMINI_MODEL: &str = "gemini-1.5-flash";
    /// Default `OpenAI` model
    pub const OPENAI_MODEL: &str = "gpt-4";
    /// Default `OpenAI` base URL
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default sampling temperature
    pub const TEMPERATURE: f32 = 0.7;
    /// Default nucleus sampling cutoff
    pub const TOP_P: f32 = 0.8;
    /// Default top-k cutoff
    pub const TOP_K: u32 = 40;
    /// Default output token budget
    pub const MAX_OUTPUT_TOKENS: u32 = 2048;
    /// Default completion timeout
    pub const LLM_TIMEOUT_SECS: u64 = 60;
}

/// Recipe domain limits
pub mod recipes {
    /// Lowest accepted rating
    pub const MIN_RATING: f64 = 0.0;
    /// Highest accepted rating
    pub const MAX_RATING: f64 = 5.0;
}

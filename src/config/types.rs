// ABOUTME: Configuration enums shared across server and LLM settings
// ABOUTME: Defines LlmProviderType for runtime provider selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// LLM provider selection for recipe generation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Google Gemini `generateContent` API (default)
    #[default]
    Gemini,
    /// Any `OpenAI`-compatible chat completions endpoint (`OpenAI`, Ollama, vLLM)
    OpenAi,
}

impl LlmProviderType {
    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "openai" | "local" | "ollama" | "vllm" => Self::OpenAi,
            _ => Self::Gemini,
        }
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

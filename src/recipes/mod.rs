// ABOUTME: Recipe generation domain: prompt construction, LLM orchestration, and response normalization
// ABOUTME: Re-exports the builder, generator, and normalizer used by the HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! # Recipes
//!
//! A generation request flows through three stages:
//!
//! - [`RecipePromptBuilder`] renders ingredients and preferences into a
//!   system and user message
//! - [`RecipeGenerator`] sends them to the configured [`crate::llm::LlmProvider`]
//! - [`normalize`] turns whatever text comes back into a validated
//!   [`chefgpt_core::models::RecipeDraft`]

mod generator;
mod normalizer;
mod prompt;

pub use generator::{RecipeGenerator, RecipeRequest};
pub use normalizer::{
    extract_json_payload, normalize, normalize_value, strip_fences, NormalizedRecipe,
    ParsedRecipeShape, RequiredFields, ShapeKind, TextRecipeFields,
};
pub use prompt::{
    GenerationPreferences, IngredientInput, OutputFormat, RecipePrompt, RecipePromptBuilder,
    CHEF_SYSTEM_PROMPT,
};

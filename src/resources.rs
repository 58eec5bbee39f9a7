// ABOUTME: Shared server resources injected into every HTTP handler
// ABOUTME: Bundles configuration, the database, the recipe repository, and the recipe generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::database::{Database, RecipeRepository, SqliteRecipeRepository};
use crate::llm::LlmProvider;
use crate::recipes::RecipeGenerator;

/// Centralized resource container for dependency injection
///
/// Built once at startup and shared read-only behind an `Arc`.
#[derive(Clone)]
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Connection pool owner, used by readiness checks
    pub database: Arc<Database>,
    /// Recipe persistence
    pub recipes: Arc<dyn RecipeRepository>,
    /// LLM-backed recipe generation
    pub generator: Arc<RecipeGenerator>,
}

impl ServerResources {
    /// Wire resources over a connected database and an LLM provider
    #[must_use]
    pub fn new(
        database: Database,
        provider: Arc<dyn LlmProvider>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let recipes = Arc::new(SqliteRecipeRepository::new(database.pool().clone()));
        let generator = Arc::new(RecipeGenerator::from_config(provider, &config.llm));

        Self {
            config,
            database: Arc::new(database),
            recipes,
            generator,
        }
    }

    /// Replace the recipe repository
    #[must_use]
    pub fn with_repository(mut self, recipes: Arc<dyn RecipeRepository>) -> Self {
        self.recipes = recipes;
        self
    }
}

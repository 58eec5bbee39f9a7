// ABOUTME: Route handlers for recipe generation, storage, listing, lookup, and rating
// ABOUTME: Translates HTTP requests into generator and repository calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! Recipe routes
//!
//! Generation optionally persists the result when the body names a user.
//! Every failure is an [`AppError`], rendered as `{"detail", "code"}`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use chefgpt_core::constants::recipes::{MAX_RATING, MIN_RATING};

use crate::{
    errors::AppError,
    recipes::{normalize_value, RecipeRequest, RequiredFields},
    resources::ServerResources,
};

/// Body of `POST /recipes/generate`
#[derive(Debug, Deserialize)]
pub struct GenerateRecipeBody {
    /// Ingredients, preferences, and output format
    #[serde(flatten)]
    pub request: RecipeRequest,
    /// When set, the generated recipe is stored for this user
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of `POST /recipes`
#[derive(Debug, Deserialize)]
pub struct SaveRecipeBody {
    /// Owner of the recipe
    pub user_id: String,
    /// Recipe content in the generated JSON layout
    pub recipe: Value,
}

/// Rating supplied as `?rating=` or as `{"rating": n}`
#[derive(Debug, Default, Deserialize)]
pub struct RatingParams {
    /// Score between 0 and 5
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/recipes", post(Self::handle_save))
            .route("/recipes/generate", post(Self::handle_generate))
            .route("/recipes/:id", get(Self::handle_list_by_user))
            .route("/recipes/:id/rate", post(Self::handle_rate))
            .route("/recipe/:id", get(Self::handle_get))
            .with_state(resources)
    }

    fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
        body.map(|Json(value)| value)
            .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
    }

    /// Handle POST /recipes/generate
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<GenerateRecipeBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = Self::json_body(body)?;
        let generated = resources.generator.generate(&body.request).await?;

        match body.user_id.filter(|user_id| !user_id.trim().is_empty()) {
            Some(user_id) => {
                let recipe = resources.recipes.insert(&user_id, &generated.draft).await?;
                info!(recipe_id = %recipe.id, user_id = %user_id, "Generated recipe stored");
                Ok((StatusCode::OK, Json(recipe)).into_response())
            }
            None => Ok((StatusCode::OK, Json(generated.draft)).into_response()),
        }
    }

    /// Handle POST /recipes - store a recipe the client already holds
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<SaveRecipeBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = Self::json_body(body)?;
        if body.user_id.trim().is_empty() {
            return Err(AppError::missing_field("user_id"));
        }

        let draft = normalize_value(&body.recipe, RequiredFields::JSON)?;
        let recipe = resources.recipes.insert(&body.user_id, &draft).await?;

        info!(recipe_id = %recipe.id, user_id = %body.user_id, "Recipe saved");
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle GET /recipes/:user_id
    async fn handle_list_by_user(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipes = resources.recipes.list_by_user(&user_id).await?;
        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle GET /recipe/:recipe_id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(recipe_id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .recipes
            .get(&recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe").with_resource_id(&recipe_id))?;

        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle POST /recipes/:recipe_id/rate
    async fn handle_rate(
        State(resources): State<Arc<ServerResources>>,
        Path(recipe_id): Path<String>,
        query: Result<Query<RatingParams>, QueryRejection>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let rating = Self::extract_rating(query, &body)?;
        let recipe = resources.recipes.apply_rating(&recipe_id, rating).await?;

        info!(
            recipe_id = %recipe.id,
            rating = recipe.rating,
            total_ratings = recipe.total_ratings,
            "Recipe rated"
        );
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Resolve and validate the rating; the query parameter wins over the body
    fn extract_rating(
        query: Result<Query<RatingParams>, QueryRejection>,
        body: &Bytes,
    ) -> Result<f64, AppError> {
        let Query(query) =
            query.map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;

        let from_body = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice::<RatingParams>(body)
                .map_err(|e| AppError::invalid_input(format!("Invalid rating body: {e}")))?
                .rating
        };

        let rating = query
            .rating
            .or(from_body)
            .ok_or_else(|| AppError::missing_field("rating"))?;

        if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::out_of_range(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
            )));
        }

        Ok(rating)
    }
}

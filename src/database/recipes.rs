// ABOUTME: Recipe persistence: insert, per-user listing, lookup, and atomic rating updates
// ABOUTME: Defines the RecipeRepository seam and its SQLite implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::instrument;
use uuid::Uuid;

use chefgpt_core::models::{CookingTime, Ingredient, Recipe, RecipeDraft};

use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

const TABLE: &str = "recipes";

const RECIPE_COLUMNS: &str = "id, user_id, title, description, ingredients, instructions, \
     cooking_time, difficulty, servings, nutritional_info, tags, tips, rating, total_ratings, \
     created_at, updated_at";

/// Persistence operations for recipes
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Store a validated draft for `user_id` with no ratings
    async fn insert(&self, user_id: &str, draft: &RecipeDraft) -> AppResult<Recipe>;

    /// All recipes owned by `user_id` in insertion order
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Recipe>>;

    /// Look up a single recipe
    async fn get(&self, recipe_id: &str) -> AppResult<Option<Recipe>>;

    /// Fold one rating into the running mean and return the updated recipe
    async fn apply_rating(&self, recipe_id: &str, rating: f64) -> AppResult<Recipe>;
}

/// `SQLite` implementation of [`RecipeRepository`]
#[derive(Clone)]
pub struct SqliteRecipeRepository {
    pool: SqlitePool,
}

impl SqliteRecipeRepository {
    /// Create a repository over an existing pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Fixed-width timestamps so text ordering matches time ordering
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl RecipeRepository for SqliteRecipeRepository {
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn insert(&self, user_id: &str, draft: &RecipeDraft) -> AppResult<Recipe> {
        draft.ensure_persistable()?;

        let started = Instant::now();
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let ingredients_json = serde_json::to_string(&draft.ingredients)?;
        let instructions_json = serde_json::to_string(&draft.instructions)?;
        let cooking_time_json = serde_json::to_string(&draft.cooking_time)?;
        let nutritional_info_json = draft
            .nutritional_info
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let tags_json = draft.tags.as_ref().map(serde_json::to_string).transpose()?;
        let tips_json = draft.tips.as_ref().map(serde_json::to_string).transpose()?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (
                id, user_id, title, description, ingredients, instructions,
                cooking_time, difficulty, servings, nutritional_info, tags, tips,
                rating, total_ratings, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 0, 0, $13, $13)
            ",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&ingredients_json)
        .bind(&instructions_json)
        .bind(&cooking_time_json)
        .bind(&draft.difficulty)
        .bind(draft.servings.map(i64::from))
        .bind(nutritional_info_json)
        .bind(tags_json)
        .bind(tips_json)
        .bind(timestamp(now))
        .execute(&self.pool)
        .await;

        AppLogger::log_database_operation("insert", TABLE, result.is_ok(), elapsed_ms(started));
        result.map_err(|e| AppError::database(format!("Failed to insert recipe: {e}")))?;

        Ok(Recipe {
            id,
            user_id: user_id.to_owned(),
            draft: draft.clone(),
            rating: 0.0,
            total_ratings: 0,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Recipe>> {
        let started = Instant::now();
        let rows = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = $1 ORDER BY created_at ASC, rowid ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;

        AppLogger::log_database_operation("list_by_user", TABLE, rows.is_ok(), elapsed_ms(started));
        let rows = rows.map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    #[instrument(skip(self))]
    async fn get(&self, recipe_id: &str) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.as_ref().map(row_to_recipe).transpose()
    }

    #[instrument(skip(self))]
    async fn apply_rating(&self, recipe_id: &str, rating: f64) -> AppResult<Recipe> {
        let started = Instant::now();

        // Read and write happen in one statement so concurrent raters cannot
        // overwrite each other's contribution
        let row = sqlx::query(&format!(
            r"
            UPDATE recipes
            SET rating = (rating * total_ratings + $1) / (total_ratings + 1),
                total_ratings = total_ratings + 1,
                updated_at = $2
            WHERE id = $3
            RETURNING {RECIPE_COLUMNS}
            "
        ))
        .bind(rating)
        .bind(timestamp(Utc::now()))
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await;

        AppLogger::log_database_operation("apply_rating", TABLE, row.is_ok(), elapsed_ms(started));
        let row = row
            .map_err(|e| AppError::database(format!("Failed to rate recipe: {e}")))?
            .ok_or_else(|| AppError::not_found("Recipe").with_resource_id(recipe_id))?;

        row_to_recipe(&row)
    }
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid timestamp '{value}': {e}")))
}

fn parse_optional_json<T: serde::de::DeserializeOwned>(value: Option<String>) -> AppResult<Option<T>> {
    value
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(Into::into)
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let ingredients_json: String = row.get("ingredients");
    let instructions_json: String = row.get("instructions");
    let cooking_time_json: String = row.get("cooking_time");
    let servings: Option<i64> = row.get("servings");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let ingredients: Vec<Ingredient> = serde_json::from_str(&ingredients_json)?;
    let instructions: Vec<String> = serde_json::from_str(&instructions_json)?;
    let cooking_time: CookingTime = serde_json::from_str(&cooking_time_json)?;
    let nutritional_info: Option<Map<String, Value>> =
        parse_optional_json(row.get("nutritional_info"))?;

    Ok(Recipe {
        id: row.get("id"),
        user_id: row.get("user_id"),
        draft: RecipeDraft {
            title: row.get("title"),
            description: row.get("description"),
            ingredients,
            instructions,
            cooking_time,
            difficulty: row.get("difficulty"),
            servings: servings.and_then(|n| u32::try_from(n).ok()),
            nutritional_info,
            tags: parse_optional_json(row.get("tags"))?,
            tips: parse_optional_json(row.get("tips"))?,
        },
        rating: row.get("rating"),
        total_ratings: row.get("total_ratings"),
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

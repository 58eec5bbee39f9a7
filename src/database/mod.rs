// ABOUTME: SQLite connection management and schema setup for recipe storage
// ABOUTME: Opens the sqlx pool, creates missing databases, and runs idempotent migrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! # Database Management
//!
//! One `recipes` table holds every stored recipe. Nested fields are kept as
//! JSON text so the schema stays flat.

mod recipes;

pub use recipes::{RecipeRepository, SqliteRecipeRepository};

use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

const MAX_CONNECTIONS: u32 = 5;

/// Database manager owning the connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to `database_url` and run migrations
    ///
    /// File databases are created when missing. In-memory databases live
    /// only as long as their connection, so they get a single connection
    /// that is never recycled.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or a
    /// migration statement fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options.connect_with(connect_options).await?;
        let db = Self { pool };
        db.migrate().await?;

        info!(database_url = %database_url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a schema statement fails
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_recipes().await
    }

    async fn migrate_recipes(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                ingredients TEXT NOT NULL,
                instructions TEXT NOT NULL,
                cooking_time TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                servings INTEGER,
                nutritional_info TEXT,
                tags TEXT,
                tips TEXT,
                rating REAL NOT NULL DEFAULT 0,
                total_ratings INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_user_id ON recipes(user_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_rating ON recipes(rating)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_difficulty ON recipes(difficulty)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Check that the database answers a trivial query
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

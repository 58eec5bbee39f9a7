// ABOUTME: Integration tests for SQLite recipe persistence
// ABOUTME: Covers insertion, per-user ordering, lookups, and concurrent rating updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chefgpt_core::models::{CookingTime, CookingTimeBreakdown, Ingredient, RecipeDraft};
use chefgpt_server::{
    database::{Database, RecipeRepository, SqliteRecipeRepository},
    errors::ErrorCode,
};
use futures_util::future::join_all;
use serde_json::json;

async fn repository() -> SqliteRecipeRepository {
    common::init_test_logging();
    let database = Database::new("sqlite::memory:").await.unwrap();
    SqliteRecipeRepository::new(database.pool().clone())
}

fn draft(title: &str) -> RecipeDraft {
    RecipeDraft {
        title: title.to_owned(),
        description: "Test recipe".to_owned(),
        ingredients: vec![
            Ingredient {
                name: "flour".to_owned(),
                amount: "2".to_owned(),
                unit: "cups".to_owned(),
            },
            Ingredient::named("eggs"),
        ],
        instructions: vec!["Mix".to_owned(), "Bake".to_owned()],
        cooking_time: CookingTime::Detailed(CookingTimeBreakdown {
            prep_time: 10,
            cook_time: 25,
            total_time: 35,
        }),
        difficulty: "medium".to_owned(),
        servings: Some(6),
        nutritional_info: json!({"calories": 310}).as_object().cloned(),
        tags: Some(vec!["baking".to_owned()]),
        tips: None,
    }
}

#[tokio::test]
async fn test_insert_assigns_identity_and_zero_rating() {
    let repo = repository().await;

    let recipe = repo.insert("baker", &draft("Bread")).await.unwrap();

    assert!(!recipe.id.is_empty());
    assert_eq!(recipe.user_id, "baker");
    assert!(recipe.rating.abs() < f64::EPSILON);
    assert_eq!(recipe.total_ratings, 0);

    let stored = repo.get(&recipe.id).await.unwrap().unwrap();
    assert_eq!(stored.draft, draft("Bread"));
    assert_eq!(stored.id, recipe.id);
}

#[tokio::test]
async fn test_insert_rejects_incomplete_drafts() {
    let repo = repository().await;

    let mut no_ingredients = draft("Empty");
    no_ingredients.ingredients.clear();
    let err = repo.insert("baker", &no_ingredients).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert_eq!(err.field(), Some("ingredients"));

    let mut no_steps = draft("Empty");
    no_steps.instructions.clear();
    let err = repo.insert("baker", &no_steps).await.unwrap_err();
    assert_eq!(err.field(), Some("instructions"));

    assert!(repo.list_by_user("baker").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_by_user_keeps_insertion_order() {
    let repo = repository().await;
    for title in ["One", "Two", "Three"] {
        repo.insert("baker", &draft(title)).await.unwrap();
    }
    repo.insert("someone-else", &draft("Other")).await.unwrap();

    let titles: Vec<String> = repo
        .list_by_user("baker")
        .await
        .unwrap()
        .into_iter()
        .map(|recipe| recipe.draft.title)
        .collect();

    assert_eq!(titles, vec!["One", "Two", "Three"]);
    assert!(repo.list_by_user("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sequential_ratings_average() {
    let repo = repository().await;
    let recipe = repo.insert("baker", &draft("Cake")).await.unwrap();

    repo.apply_rating(&recipe.id, 4.0).await.unwrap();
    let rated = repo.apply_rating(&recipe.id, 2.0).await.unwrap();

    assert!((rated.rating - 3.0).abs() < f64::EPSILON);
    assert_eq!(rated.total_ratings, 2);
    assert!(rated.updated_at >= rated.created_at);
}

#[tokio::test]
async fn test_concurrent_ratings_all_count() {
    let repo = Arc::new(repository().await);
    let recipe = repo.insert("baker", &draft("Pie")).await.unwrap();

    let tasks = (0..20).map(|i| {
        let repo = Arc::clone(&repo);
        let id = recipe.id.clone();
        tokio::spawn(async move { repo.apply_rating(&id, f64::from(i % 2) * 5.0).await })
    });
    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let rated = repo.get(&recipe.id).await.unwrap().unwrap();
    assert_eq!(rated.total_ratings, 20);
    assert!((rated.rating - 2.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_rating_unknown_recipe_is_not_found() {
    let repo = repository().await;

    let err = repo.apply_rating("missing", 3.0).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(repo.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_database_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("chefgpt.db").display());

    let id = {
        let database = Database::new(&url).await.unwrap();
        let repo = SqliteRecipeRepository::new(database.pool().clone());
        let recipe = repo.insert("baker", &draft("Persisted")).await.unwrap();
        database.pool().close().await;
        recipe.id
    };

    let database = Database::new(&url).await.unwrap();
    let repo = SqliteRecipeRepository::new(database.pool().clone());
    let recipe = repo.get(&id).await.unwrap().unwrap();
    assert_eq!(recipe.draft.title, "Persisted");
}

// ABOUTME: Recipe data models shared by the normalizer, repository, and HTTP layer
// ABOUTME: Defines RecipeDraft, Recipe, Ingredient, CookingTime, and DifficultyLevel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AppError, AppResult};

/// A single recipe ingredient with free-text quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name (e.g., "chicken breast")
    pub name: String,
    /// Quantity as written by the model (e.g., "2", "1/2")
    #[serde(default)]
    pub amount: String,
    /// Unit of measurement (e.g., "cups"); empty for countable items
    #[serde(default)]
    pub unit: String,
}

impl Ingredient {
    /// Create an ingredient known only by name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: String::new(),
            unit: String::new(),
        }
    }
}

/// Prep/cook/total split produced by JSON-capable prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookingTimeBreakdown {
    /// Preparation minutes
    pub prep_time: u32,
    /// Active cooking minutes
    pub cook_time: u32,
    /// Total minutes
    pub total_time: u32,
}

/// Cooking time in its richest available form
///
/// The JSON shape yields a [`CookingTimeBreakdown`]; the structured-text shape
/// only states total minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CookingTime {
    /// Prep, cook, and total minutes
    Detailed(CookingTimeBreakdown),
    /// Total minutes only
    TotalMinutes(u32),
}

impl CookingTime {
    /// Total minutes regardless of representation
    #[must_use]
    pub const fn total_minutes(&self) -> u32 {
        match self {
            Self::Detailed(breakdown) => breakdown.total_time,
            Self::TotalMinutes(minutes) => *minutes,
        }
    }
}

/// Well-known difficulty labels
///
/// Difficulty is stored as free text; this only classifies the common values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    /// Beginner friendly
    Easy,
    /// Some technique required
    Medium,
    /// Advanced
    Hard,
}

impl DifficultyLevel {
    /// Classify a label case-insensitively, ignoring surrounding whitespace
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Canonical lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// A normalized recipe that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    /// Recipe name
    pub title: String,
    /// Short description, may be empty
    #[serde(default)]
    pub description: String,
    /// Ordered ingredient list
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Ordered steps in canonical string form
    pub instructions: Vec<String>,
    /// Cooking time in its richest available form
    pub cooking_time: CookingTime,
    /// Difficulty label as produced by the model
    pub difficulty: String,
    /// Number of servings; absent when the output shape does not carry it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    /// Nutrition facts such as calories or protein
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<Map<String, Value>>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Cooking tips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
}

impl RecipeDraft {
    /// Difficulty classified against the well-known labels
    #[must_use]
    pub fn difficulty_level(&self) -> Option<DifficultyLevel> {
        DifficultyLevel::from_label(&self.difficulty)
    }

    /// Check the invariants every stored recipe must satisfy
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first empty required field.
    pub fn ensure_persistable(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::missing_field("title"));
        }
        if self.ingredients.is_empty() {
            return Err(AppError::missing_field("ingredients"));
        }
        if self.instructions.is_empty() {
            return Err(AppError::missing_field("instructions"));
        }
        Ok(())
    }
}

/// A persisted recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Repository-assigned identifier
    pub id: String,
    /// Owner of the recipe
    pub user_id: String,
    /// Recipe content
    #[serde(flatten)]
    pub draft: RecipeDraft,
    /// Running mean of all submitted ratings
    pub rating: f64,
    /// Number of ratings submitted
    pub total_ratings: i64,
    /// When the recipe was stored
    pub created_at: DateTime<Utc>,
    /// When the recipe was last modified
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cooking_time_untagged_forms() {
        let detailed: CookingTime =
            serde_json::from_value(json!({"prep_time": 10, "cook_time": 20, "total_time": 30}))
                .unwrap();
        assert_eq!(detailed.total_minutes(), 30);

        let total: CookingTime = serde_json::from_value(json!(45)).unwrap();
        assert_eq!(total, CookingTime::TotalMinutes(45));
    }

    #[test]
    fn test_difficulty_level_is_case_insensitive() {
        assert_eq!(DifficultyLevel::from_label(" EASY "), Some(DifficultyLevel::Easy));
        assert_eq!(DifficultyLevel::from_label("Hard"), Some(DifficultyLevel::Hard));
        assert_eq!(DifficultyLevel::from_label("chef level"), None);
    }

    #[test]
    fn test_recipe_serializes_flat() {
        let recipe = Recipe {
            id: "abc".to_owned(),
            user_id: "user-1".to_owned(),
            draft: RecipeDraft {
                title: "Toast".to_owned(),
                description: String::new(),
                ingredients: vec![Ingredient::named("bread")],
                instructions: vec!["Toast the bread".to_owned()],
                cooking_time: CookingTime::TotalMinutes(5),
                difficulty: "easy".to_owned(),
                servings: Some(1),
                nutritional_info: None,
                tags: None,
                tips: None,
            },
            rating: 0.0,
            total_ratings: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["title"], "Toast");
        assert_eq!(value["user_id"], "user-1");
        assert!(value.get("draft").is_none());
        assert!(value.get("tags").is_none());
    }

    #[test]
    fn test_ensure_persistable_rejects_empty_ingredients() {
        let draft = RecipeDraft {
            title: "Water".to_owned(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: vec!["Pour".to_owned()],
            cooking_time: CookingTime::TotalMinutes(1),
            difficulty: "easy".to_owned(),
            servings: None,
            nutritional_info: None,
            tags: None,
            tips: None,
        };
        let err = draft.ensure_persistable().unwrap_err();
        assert_eq!(err.field(), Some("ingredients"));
    }
}

// ABOUTME: Recipe prompt construction from ingredients and cooking preferences
// ABOUTME: Produces the system and user messages sent to the completion provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! # Recipe Prompt Builder
//!
//! Lists the ingredients, adds one constraint line per supplied preference,
//! and appends a fixed block describing the exact output format the model
//! must answer with.

use serde::{Deserialize, Serialize};

use chefgpt_core::models::{DifficultyLevel, Ingredient};

use crate::errors::{AppError, AppResult};
use crate::llm::ChatMessage;

/// System message sent with every generation request
pub const CHEF_SYSTEM_PROMPT: &str =
    "You are a professional chef who creates delicious and practical recipes.";

const JSON_FORMAT_INSTRUCTIONS: &str = r#"Return a JSON object with the following structure. Make sure to use proper JSON formatting with double quotes for all keys and string values:
{
    "title": "Recipe name",
    "description": "Brief description of the recipe",
    "ingredients": [
        {
            "name": "ingredient name",
            "amount": "quantity",
            "unit": "unit of measurement"
        }
    ],
    "instructions": [
        "Step 1 description",
        "Step 2 description"
    ],
    "cooking_time": {
        "prep_time": 10,
        "cook_time": 20,
        "total_time": 30
    },
    "difficulty": "easy",
    "servings": 4
}"#;

const TEXT_FORMAT_INSTRUCTIONS: &str = "Generate a recipe with the following format:
Title: [Recipe Name]
Description: [Brief description of the recipe]
Instructions:
1. [Step 1]
2. [Step 2]
...
Cooking Time: [Time in minutes]
Difficulty: [Easy/Medium/Hard]
Servings: [Number of servings]

Make sure the recipe is practical and uses the given ingredients effectively.";

/// An ingredient as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientInput {
    /// Just the ingredient name
    Name(String),
    /// Name with optional quantity
    Detailed {
        /// Ingredient name
        name: String,
        /// Quantity (e.g., "2")
        #[serde(default)]
        amount: Option<String>,
        /// Unit (e.g., "cups")
        #[serde(default)]
        unit: Option<String>,
    },
}

impl IngredientInput {
    /// Ingredient name, trimmed
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Detailed { name, .. } => name.trim(),
        }
    }

    const fn is_detailed(&self) -> bool {
        matches!(self, Self::Detailed { .. })
    }

    /// `- {amount} {unit} {name}` with absent parts left out
    fn list_line(&self) -> String {
        let parts: Vec<&str> = match self {
            Self::Name(name) => vec![name.trim()],
            Self::Detailed { name, amount, unit } => [
                amount.as_deref().unwrap_or(""),
                unit.as_deref().unwrap_or(""),
                name.as_str(),
            ]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect(),
        };
        format!("- {}", parts.join(" "))
    }

    /// Convert to the stored ingredient shape
    #[must_use]
    pub fn to_ingredient(&self) -> Ingredient {
        match self {
            Self::Name(name) => Ingredient::named(name.trim()),
            Self::Detailed { name, amount, unit } => Ingredient {
                name: name.trim().to_owned(),
                amount: amount.as_deref().unwrap_or("").trim().to_owned(),
                unit: unit.as_deref().unwrap_or("").trim().to_owned(),
            },
        }
    }
}

/// Optional constraints on the generated recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPreferences {
    /// Dietary tags such as "vegetarian"
    #[serde(default)]
    pub dietary_preferences: Option<Vec<String>>,
    /// Maximum cooking time in minutes
    #[serde(default)]
    pub cooking_time: Option<u32>,
    /// Desired difficulty
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Number of servings
    #[serde(default)]
    pub servings: Option<u32>,
}

impl GenerationPreferences {
    /// Constraint lines for the preferences that are present
    fn constraint_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let dietary: Vec<&str> = self
            .dietary_preferences
            .iter()
            .flatten()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .collect();
        if !dietary.is_empty() {
            lines.push(format!("Dietary preferences: {}", dietary.join(", ")));
        }

        if let Some(minutes) = self.cooking_time.filter(|m| *m > 0) {
            lines.push(format!("Maximum cooking time: {minutes} minutes"));
        }

        if let Some(difficulty) = self
            .difficulty
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            let label = DifficultyLevel::from_label(difficulty)
                .map_or(difficulty, |level| level.as_str());
            lines.push(format!("Difficulty level: {label}"));
        }

        if let Some(servings) = self.servings.filter(|s| *s > 0) {
            lines.push(format!("Number of servings: {servings}"));
        }

        lines
    }
}

/// Output format requested from the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A JSON object with the full recipe schema
    #[default]
    Json,
    /// Labeled `Title:` / `Instructions:` / `Cooking Time:` lines
    Text,
}

/// A fully rendered generation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePrompt {
    /// System message
    pub system: String,
    /// User message containing ingredients, constraints, and format block
    pub user: String,
}

impl RecipePrompt {
    /// Chat messages in provider order
    #[must_use]
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(self.user.clone()),
        ]
    }
}

/// Builder for recipe generation prompts
#[derive(Debug, Clone, Default)]
pub struct RecipePromptBuilder {
    ingredients: Vec<IngredientInput>,
    preferences: GenerationPreferences,
    format: OutputFormat,
}

impl RecipePromptBuilder {
    /// Start a prompt for the given ingredients
    #[must_use]
    pub fn new(ingredients: Vec<IngredientInput>) -> Self {
        Self {
            ingredients,
            ..Self::default()
        }
    }

    /// Attach optional constraints
    #[must_use]
    pub fn with_preferences(mut self, preferences: GenerationPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Select the output format block
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Render the prompt
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no ingredient has a non-blank name.
    pub fn build(&self) -> AppResult<RecipePrompt> {
        let ingredients: Vec<&IngredientInput> = self
            .ingredients
            .iter()
            .filter(|ingredient| !ingredient.name().is_empty())
            .collect();

        if ingredients.is_empty() {
            return Err(AppError::invalid_input(
                "At least one ingredient is required",
            ));
        }

        let mut sections = vec![Self::ingredient_section(&ingredients)];
        sections.extend(self.preferences.constraint_lines());
        sections.push(String::new());
        sections.push(
            match self.format {
                OutputFormat::Json => JSON_FORMAT_INSTRUCTIONS,
                OutputFormat::Text => TEXT_FORMAT_INSTRUCTIONS,
            }
            .to_owned(),
        );

        Ok(RecipePrompt {
            system: CHEF_SYSTEM_PROMPT.to_owned(),
            user: sections.join("\n"),
        })
    }

    fn ingredient_section(ingredients: &[&IngredientInput]) -> String {
        if ingredients.iter().any(|ingredient| ingredient.is_detailed()) {
            let lines: Vec<String> = ingredients.iter().map(|i| i.list_line()).collect();
            format!("Create a recipe using these ingredients:\n{}", lines.join("\n"))
        } else {
            let names: Vec<&str> = ingredients.iter().map(|i| i.name()).collect();
            format!("Create a recipe using these ingredients: {}", names.join(", "))
        }
    }
}

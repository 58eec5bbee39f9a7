// ABOUTME: Converts raw completion text into a validated recipe draft
// ABOUTME: Handles fenced or prose-wrapped JSON and the labeled structured-text format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! # Response Normalizer
//!
//! Models wrap JSON in markdown fences, add commentary around it, or answer in
//! labeled lines instead. Normalization runs in a fixed order:
//!
//! 1. Strip a leading and trailing code fence.
//! 2. If a `{` is followed later by a `}`, the text between the first `{` and
//!    the last `}` is the JSON payload. A parse failure is a malformed response.
//! 3. Otherwise the text is parsed as `Title:` / `Description:` /
//!    `Instructions:` / `Cooking Time:` / `Difficulty:` lines.
//!
//! Each shape then validates its own [`RequiredFields`] and coerces loosely
//! typed values into a [`RecipeDraft`].

use serde_json::{Map, Value};
use tracing::{debug, warn};

use chefgpt_core::models::{CookingTime, CookingTimeBreakdown, Ingredient, RecipeDraft};

use crate::errors::{AppError, AppResult};

const TITLE_LABEL: &str = "Title:";
const DESCRIPTION_LABEL: &str = "Description:";
const INSTRUCTIONS_LABEL: &str = "Instructions:";
const COOKING_TIME_LABEL: &str = "Cooking Time:";
const DIFFICULTY_LABEL: &str = "Difficulty:";
const SERVINGS_LABEL: &str = "Servings:";

/// Fields that must be present for a shape to yield a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFields(&'static [&'static str]);

impl RequiredFields {
    /// Required by the JSON shape
    pub const JSON: Self = Self(&[
        "title",
        "ingredients",
        "instructions",
        "cooking_time",
        "difficulty",
        "servings",
    ]);

    /// Required by the structured-text shape, which never states ingredients
    /// and only optionally states servings
    pub const STRUCTURED_TEXT: Self =
        Self(&["title", "instructions", "cooking_time", "difficulty"]);

    /// Whether `field` is required
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|required| *required == field)
    }

    /// Required field names in check order
    #[must_use]
    pub const fn fields(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Which output shape a response was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// JSON object, possibly fenced or wrapped in prose
    Json,
    /// Labeled lines
    StructuredText,
}

impl ShapeKind {
    /// Label used in logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::StructuredText => "structured_text",
        }
    }

    /// Fields this shape must provide
    #[must_use]
    pub const fn required_fields(&self) -> RequiredFields {
        match self {
            Self::Json => RequiredFields::JSON,
            Self::StructuredText => RequiredFields::STRUCTURED_TEXT,
        }
    }
}

/// Fields extracted from the structured-text shape before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecipeFields {
    /// First line minus the `Title:` label
    pub title: String,
    /// Second line minus the `Description:` label
    pub description: String,
    /// Steps between `Instructions:` and `Cooking Time:`
    pub instructions: Vec<String>,
    /// Minutes from the `Cooking Time:` line
    pub cooking_minutes: u32,
    /// Trailing text of the `Difficulty:` line
    pub difficulty: String,
    /// Count from an optional `Servings:` line
    pub servings: Option<u32>,
}

/// A provider response recognized as one of the supported shapes
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecipeShape {
    /// Parsed JSON object
    Json(Map<String, Value>),
    /// Extracted labeled lines
    StructuredText(TextRecipeFields),
}

impl ParsedRecipeShape {
    /// Recognize the shape of raw provider text
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` (carrying `raw`) when the JSON payload does
    /// not parse into an object, or when the text shape lacks a parseable
    /// `Cooking Time:` or a `Difficulty:` line.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let text = strip_fences(raw);

        if let Some(payload) = extract_json_payload(text) {
            let value: Value = serde_json::from_str(payload).map_err(|e| {
                AppError::malformed_response(
                    format!("Failed to parse AI response as JSON: {e}"),
                    raw,
                )
            })?;
            return match value {
                Value::Object(map) => Ok(Self::Json(map)),
                _ => Err(AppError::malformed_response(
                    "AI response JSON is not an object",
                    raw,
                )),
            };
        }

        parse_structured_text(text, raw).map(Self::StructuredText)
    }

    /// Which shape this is
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Json(_) => ShapeKind::Json,
            Self::StructuredText(_) => ShapeKind::StructuredText,
        }
    }

    /// Validate this shape's required fields and build the draft
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` naming the first required field that is
    /// absent, null, empty, or of the wrong type.
    pub fn into_draft(self) -> AppResult<RecipeDraft> {
        match self {
            Self::Json(map) => draft_from_object(&map, RequiredFields::JSON),
            Self::StructuredText(fields) => draft_from_text(fields),
        }
    }
}

/// A normalized draft together with the shape it came from
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecipe {
    /// Validated recipe content
    pub draft: RecipeDraft,
    /// Shape the provider answered with
    pub shape: ShapeKind,
}

/// Normalize raw provider output into a validated draft
///
/// # Errors
///
/// `MalformedResponse` when no supported shape can be parsed, and
/// `MissingRequiredField` when a parsed shape lacks a required field.
pub fn normalize(raw: &str) -> AppResult<NormalizedRecipe> {
    let parsed = ParsedRecipeShape::parse(raw)?;
    let shape = parsed.kind();
    debug!(shape = shape.as_str(), raw_len = raw.len(), "Recognized response shape");

    let draft = parsed.into_draft().inspect_err(|e| {
        warn!(shape = shape.as_str(), field = e.field().unwrap_or(""), "Recipe failed validation");
    })?;

    Ok(NormalizedRecipe { draft, shape })
}

/// Validate an already-parsed JSON recipe against `required`
///
/// # Errors
///
/// Returns `InvalidInput` if `value` is not an object, or
/// `MissingRequiredField` naming the first absent or ill-typed field.
pub fn normalize_value(value: &Value, required: RequiredFields) -> AppResult<RecipeDraft> {
    let map = value
        .as_object()
        .ok_or_else(|| AppError::invalid_input("Recipe must be a JSON object"))?;
    draft_from_object(map, required)
}

/// Remove a leading code fence line and a trailing fence marker
#[must_use]
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(after_marker) = text.strip_prefix("```") {
        // The opening fence may carry a language tag such as ```json, and a
        // single-line reply keeps its payload on the fence line itself
        text = match after_marker.find('\n') {
            Some(newline) => &after_marker[newline + 1..],
            None => after_marker.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }

    text.trim()
}

/// The substring from the first `{` to the last `}`, inclusive
#[must_use]
pub fn extract_json_payload(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

// ============================================================================
// Structured text
// ============================================================================

/// Text after the first occurrence of `label`, trimmed
fn after_label<'a>(line: &'a str, label: &str) -> &'a str {
    line.find(label)
        .map_or(line, |pos| &line[pos + label.len()..])
        .trim()
}

fn first_line_with<'a>(lines: &[&'a str], label: &str) -> Option<&'a str> {
    lines.iter().copied().find(|line| line.contains(label))
}

/// Strip a leading step marker such as `1. `, `2) ` or `- `
fn strip_ordinal(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | ')' | '-' | ' '))
}

fn parse_instruction_block(text: &str) -> Vec<String> {
    let Some(start) = text.find(INSTRUCTIONS_LABEL) else {
        return Vec::new();
    };
    let block_start = start + INSTRUCTIONS_LABEL.len();
    let Some(block_len) = text[block_start..].find(COOKING_TIME_LABEL) else {
        return Vec::new();
    };

    text[block_start..block_start + block_len]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| strip_ordinal(line).trim())
        .filter(|step| !step.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Extract the labeled fields of the structured-text shape
///
/// Title and description are read from the first two lines by position.
fn parse_structured_text(text: &str, raw: &str) -> AppResult<TextRecipeFields> {
    let lines: Vec<&str> = text.lines().collect();

    let title = lines
        .first()
        .map(|line| after_label(line, TITLE_LABEL).to_owned())
        .unwrap_or_default();
    let description = lines
        .get(1)
        .map(|line| after_label(line, DESCRIPTION_LABEL).to_owned())
        .unwrap_or_default();

    let instructions = parse_instruction_block(text);

    let cooking_line = first_line_with(&lines, COOKING_TIME_LABEL).ok_or_else(|| {
        AppError::malformed_response("AI response has no 'Cooking Time:' line", raw)
    })?;
    let minutes_text = after_label(cooking_line, COOKING_TIME_LABEL)
        .replace("minutes", "");
    let cooking_minutes = minutes_text.trim().parse::<u32>().map_err(|e| {
        AppError::malformed_response(
            format!("Could not parse cooking time '{}': {e}", minutes_text.trim()),
            raw,
        )
    })?;

    let difficulty = first_line_with(&lines, DIFFICULTY_LABEL)
        .map(|line| after_label(line, DIFFICULTY_LABEL).to_owned())
        .ok_or_else(|| AppError::malformed_response("AI response has no 'Difficulty:' line", raw))?;

    let servings = first_line_with(&lines, SERVINGS_LABEL)
        .and_then(|line| leading_integer(after_label(line, SERVINGS_LABEL)));

    Ok(TextRecipeFields {
        title,
        description,
        instructions,
        cooking_minutes,
        difficulty,
        servings,
    })
}

fn draft_from_text(fields: TextRecipeFields) -> AppResult<RecipeDraft> {
    let required = RequiredFields::STRUCTURED_TEXT;

    if required.contains("title") && fields.title.is_empty() {
        return Err(AppError::missing_field("title"));
    }
    if required.contains("instructions") && fields.instructions.is_empty() {
        return Err(AppError::missing_field("instructions"));
    }
    if required.contains("difficulty") && fields.difficulty.is_empty() {
        return Err(AppError::missing_field("difficulty"));
    }

    Ok(RecipeDraft {
        title: fields.title,
        description: fields.description,
        ingredients: Vec::new(),
        instructions: fields.instructions,
        cooking_time: CookingTime::TotalMinutes(fields.cooking_minutes),
        difficulty: fields.difficulty,
        servings: fields.servings,
        nutritional_info: None,
        tags: None,
        tips: None,
    })
}

// ============================================================================
// JSON
// ============================================================================

/// Leading run of ASCII digits, so "30 minutes" yields 30
fn leading_integer(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Non-negative integer from a number or a numeric string
fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f.round() as u32)
            }),
        Value::String(text) => leading_integer(text),
        _ => None,
    }
}

/// Present and non-null
fn present<'a>(map: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    map.get(field).filter(|value| !value.is_null())
}

/// Fetch a field, failing with `MissingRequiredField` when required and absent
fn lookup<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    required: RequiredFields,
) -> AppResult<Option<&'a Value>> {
    match present(map, field) {
        Some(value) => Ok(Some(value)),
        None if required.contains(field) => Err(AppError::missing_field(field)),
        None => Ok(None),
    }
}

fn non_blank_string(value: &Value, field: &str) -> AppResult<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Ok(text.clone()),
        Value::String(_) => Err(AppError::missing_field(field)),
        _ => Err(AppError::invalid_field(field, "expected a string")),
    }
}

/// Amount or unit: strings pass through, numbers become strings
fn quantity_text(value: Option<&Value>) -> AppResult<String> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(_) => Err(AppError::invalid_field(
            "ingredients",
            "amount and unit must be strings or numbers",
        )),
    }
}

fn coerce_ingredient(value: &Value) -> AppResult<Ingredient> {
    match value {
        Value::String(name) => Ok(Ingredient::named(name.trim())),
        Value::Object(entry) => {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| AppError::invalid_field("ingredients", "ingredient without a name"))?;
            Ok(Ingredient {
                name: name.to_owned(),
                amount: quantity_text(entry.get("amount"))?,
                unit: quantity_text(entry.get("unit"))?,
            })
        }
        _ => Err(AppError::invalid_field(
            "ingredients",
            "expected strings or {name, amount, unit} objects",
        )),
    }
}

fn coerce_ingredients(value: &Value) -> AppResult<Vec<Ingredient>> {
    let items = value
        .as_array()
        .ok_or_else(|| AppError::invalid_field("ingredients", "expected a list"))?;
    items
        .iter()
        .filter(|item| !matches!(item, Value::String(name) if name.trim().is_empty()))
        .map(coerce_ingredient)
        .collect()
}

/// Instruction steps as strings; `{step, description}` objects become their description
fn coerce_instructions(value: &Value) -> AppResult<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| AppError::invalid_field("instructions", "expected a list"))?;

    let mut steps = Vec::with_capacity(items.len());
    for item in items {
        let step = match item {
            Value::String(text) => text.as_str(),
            Value::Object(entry) => entry
                .get("description")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    AppError::invalid_field("instructions", "step object without a description")
                })?,
            _ => {
                return Err(AppError::invalid_field(
                    "instructions",
                    "expected strings or {step, description} objects",
                ))
            }
        };
        if !step.trim().is_empty() {
            steps.push(step.to_owned());
        }
    }
    Ok(steps)
}

fn coerce_cooking_time(value: &Value) -> AppResult<CookingTime> {
    let invalid = || AppError::invalid_field("cooking_time", "expected minutes or {prep_time, cook_time, total_time}");

    let Value::Object(parts) = value else {
        return coerce_u32(value)
            .map(CookingTime::TotalMinutes)
            .ok_or_else(invalid);
    };

    let minutes = |key: &str| -> AppResult<Option<u32>> {
        present(parts, key)
            .map(|v| coerce_u32(v).ok_or_else(invalid))
            .transpose()
    };

    let prep_time = minutes("prep_time")?;
    let cook_time = minutes("cook_time")?;
    let total_time = match minutes("total_time")? {
        Some(total) => total,
        None => match (prep_time, cook_time) {
            (Some(prep), Some(cook)) => prep.saturating_add(cook),
            _ => return Err(invalid()),
        },
    };

    Ok(CookingTime::Detailed(CookingTimeBreakdown {
        prep_time: prep_time.unwrap_or(0),
        cook_time: cook_time.unwrap_or(0),
        total_time,
    }))
}

fn string_list(value: &Value, field: &str) -> AppResult<Vec<String>> {
    value
        .as_array()
        .ok_or_else(|| AppError::invalid_field(field, "expected a list of strings"))?
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| AppError::invalid_field(field, "expected a list of strings"))
        })
        .collect()
}

fn draft_from_object(map: &Map<String, Value>, required: RequiredFields) -> AppResult<RecipeDraft> {
    // Report absent fields in the declared order before any type errors
    for field in required.fields() {
        if present(map, field).is_none() {
            return Err(AppError::missing_field(*field));
        }
    }

    let title = lookup(map, "title", required)?
        .map(|v| non_blank_string(v, "title"))
        .transpose()?
        .unwrap_or_default();

    let description = match present(map, "description") {
        Some(Value::String(text)) => text.clone(),
        Some(_) => return Err(AppError::invalid_field("description", "expected a string")),
        None => String::new(),
    };

    let ingredients = lookup(map, "ingredients", required)?
        .map(coerce_ingredients)
        .transpose()?
        .unwrap_or_default();
    if ingredients.is_empty() && required.contains("ingredients") {
        return Err(AppError::missing_field("ingredients"));
    }

    let instructions = lookup(map, "instructions", required)?
        .map(coerce_instructions)
        .transpose()?
        .unwrap_or_default();
    if instructions.is_empty() && required.contains("instructions") {
        return Err(AppError::missing_field("instructions"));
    }

    let cooking_time = lookup(map, "cooking_time", required)?
        .map(coerce_cooking_time)
        .transpose()?
        .unwrap_or(CookingTime::TotalMinutes(0));

    let difficulty = lookup(map, "difficulty", required)?
        .map(|v| non_blank_string(v, "difficulty"))
        .transpose()?
        .unwrap_or_default();

    let servings = lookup(map, "servings", required)?
        .map(|v| {
            coerce_u32(v)
                .ok_or_else(|| AppError::invalid_field("servings", "expected a whole number"))
        })
        .transpose()?;

    let nutritional_info = match present(map, "nutritional_info") {
        Some(Value::Object(info)) => Some(info.clone()),
        Some(_) => {
            return Err(AppError::invalid_field("nutritional_info", "expected an object"))
        }
        None => None,
    };

    let tags = present(map, "tags").map(|v| string_list(v, "tags")).transpose()?;
    let tips = present(map, "tips").map(|v| string_list(v, "tips")).transpose()?;

    Ok(RecipeDraft {
        title,
        description,
        ingredients,
        instructions,
        cooking_time,
        difficulty,
        servings,
        nutritional_info,
        tags,
        tips,
    })
}

//! Recipe model
//!
//! This module provides:
//! - `Recipe`, the aggregate of a recipe and its ordered children
//! - `RecipeStatus` for publication states
//! - `RecipeSummary` for list views
//! - Input types for creating and updating recipes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Translations;

/// Recipe publication status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeStatus {
    /// Draft - only visible in the admin views
    #[default]
    Draft,
    /// Published - visible to the public
    Published,
}

impl RecipeStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeStatus::Draft => "draft",
            RecipeStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RecipeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(anyhow::anyhow!("Invalid recipe status: {}", s)),
        }
    }
}

/// An ingredient line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub id: i64,
    /// Display order within the recipe
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub name: Translations,
    /// Free-form note such as "finely chopped"
    #[serde(default)]
    pub note: Translations,
}

/// A preparation step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub content: Translations,
}

/// A named component of a recipe (e.g. "sauce", "dough")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubRecipe {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub name: Translations,
}

/// Recipe aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug
    pub slug: String,
    pub status: RecipeStatus,
    pub name: Translations,
    pub description: Translations,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub sub_recipes: Vec<SubRecipe>,
    /// Publication timestamp
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a new draft recipe with no children
    pub fn new(slug: String, name: Translations, description: Translations) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by database
            slug,
            status: RecipeStatus::default(),
            name,
            description,
            ingredients: Vec::new(),
            steps: Vec::new(),
            sub_recipes: Vec::new(),
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_sub_recipes(mut self, sub_recipes: Vec<SubRecipe>) -> Self {
        self.sub_recipes = sub_recipes;
        self
    }

    /// Sort children by position; ties keep their current relative order
    pub fn sort_children(&mut self) {
        self.ingredients.sort_by_key(|i| i.position);
        self.steps.sort_by_key(|s| s.position);
        self.sub_recipes.sort_by_key(|s| s.position);
    }
}

/// Recipe row without children, used by list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub slug: String,
    pub status: RecipeStatus,
    pub name: Translations,
    pub description: Translations,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRecipeInput {
    pub slug: String,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub sub_recipes: Vec<SubRecipe>,
}

/// Input for updating a recipe.
///
/// Child collections, when given, replace the stored ones wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeInput {
    pub slug: Option<String>,
    pub name: Option<Translations>,
    pub description: Option<Translations>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub steps: Option<Vec<Step>>,
    pub sub_recipes: Option<Vec<SubRecipe>>,
}

impl UpdateRecipeInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.slug.is_some()
            || self.name.is_some()
            || self.description.is_some()
            || self.ingredients.is_some()
            || self.steps.is_some()
            || self.sub_recipes.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;

    #[test]
    fn test_status_parse() {
        assert_eq!("Published".parse::<RecipeStatus>().unwrap(), RecipeStatus::Published);
        assert_eq!("draft".parse::<RecipeStatus>().unwrap(), RecipeStatus::Draft);
        assert!("archived".parse::<RecipeStatus>().is_err());
    }

    #[test]
    fn test_new_recipes_are_drafts() {
        assert_eq!(RecipeStatus::default(), RecipeStatus::Draft);
        let recipe = Recipe::new("soup".into(), Translations::default(), Translations::default());
        assert_eq!(recipe.status, RecipeStatus::Draft);
    }

    #[test]
    fn test_sort_children_is_stable() {
        let mut recipe = Recipe::new("soup".into(), Translations::default(), Translations::default())
            .with_steps(vec![
                Step { id: 1, position: 2, content: Translations::new().with(Language::En, "b") },
                Step { id: 2, position: 1, content: Translations::new().with(Language::En, "a") },
                Step { id: 3, position: 2, content: Translations::new().with(Language::En, "c") },
            ]);
        recipe.sort_children();
        let ids: Vec<i64> = recipe.steps.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_update_input_has_changes() {
        assert!(!UpdateRecipeInput::default().has_changes());
        let input = UpdateRecipeInput { steps: Some(vec![]), ..Default::default() };
        assert!(input.has_changes());
    }
}

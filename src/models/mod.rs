//! Data models
//!
//! This module contains the data structures used throughout recipebook.
//! Models represent:
//! - Database entities (Recipe and its ingredients, steps and sub-recipes)
//! - Translatable text keyed by `Language`
//! - Pagination request and result types

mod language;
mod pagination;
mod recipe;

pub use language::{Language, Translations};
pub use pagination::{page_count, PageItem, PagedResult, PaginationRequest};
pub use recipe::{
    CreateRecipeInput, Ingredient, Recipe, RecipeStatus, RecipeSummary, Step, SubRecipe,
    UpdateRecipeInput,
};

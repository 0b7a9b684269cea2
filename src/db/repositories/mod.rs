//! Database repositories
//!
//! Repository pattern implementations for database access.

pub mod recipe;

pub use recipe::{GuardedWrite, PublishGate, RecipeRepository, SqlxRecipeRepository};

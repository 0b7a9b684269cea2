//! Recipe service
//!
//! Implements business logic for recipe management:
//! - Create, read, update, delete recipes
//! - Input validation
//! - Paginated listing with out-of-range page correction
//! - Translation completeness and the publish gate

use std::sync::Arc;

use crate::db::repositories::{GuardedWrite, RecipeRepository};
use crate::models::{
    CreateRecipeInput, Language, PagedResult, PaginationRequest, Recipe, RecipeStatus,
    RecipeSummary, UpdateRecipeInput,
};
use crate::services::completeness::{build_completeness_report, CompletenessReport};
use crate::services::pagination::correct_page;

/// Maximum slug length
const MAX_SLUG_LEN: usize = 120;

/// Error types for recipe service operations
#[derive(Debug, thiserror::Error)]
pub enum RecipeServiceError {
    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Recipe slug already exists: {0}")]
    DuplicateSlug(String),

    /// No language has every field a published recipe needs
    #[error("Recipe cannot be published until at least one language is complete")]
    NotPublishable(Box<CompletenessReport>),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RecipeServiceError>;

/// Recipe service
pub struct RecipeService {
    repo: Arc<dyn RecipeRepository>,
    languages: Vec<Language>,
}

impl RecipeService {
    pub fn new(repo: Arc<dyn RecipeRepository>) -> Self {
        Self {
            repo,
            languages: Language::ALL.to_vec(),
        }
    }

    pub async fn create(&self, input: CreateRecipeInput) -> Result<Recipe> {
        let slug = input.slug.trim().to_string();
        validate_slug(&slug)?;
        if input.name.is_blank() {
            return Err(RecipeServiceError::ValidationError(
                "Recipe name is required in at least one language".to_string(),
            ));
        }
        if self.repo.exists_by_slug(&slug).await? {
            return Err(RecipeServiceError::DuplicateSlug(slug));
        }

        let mut recipe = Recipe::new(slug, input.name, input.description)
            .with_ingredients(input.ingredients)
            .with_steps(input.steps)
            .with_sub_recipes(input.sub_recipes);
        normalize_positions(&mut recipe);

        let created = self.repo.create(&recipe).await?;
        tracing::info!(id = created.id, slug = %created.slug, "Recipe created");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Recipe> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| RecipeServiceError::NotFound(id.to_string()))
    }

    /// Published recipe by slug; drafts are reported as missing
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Recipe> {
        self.repo
            .get_by_slug(slug)
            .await?
            .filter(|recipe| recipe.status == RecipeStatus::Published)
            .ok_or_else(|| RecipeServiceError::NotFound(slug.to_string()))
    }

    pub async fn update(&self, id: i64, input: UpdateRecipeInput) -> Result<Recipe> {
        let mut recipe = self.get_by_id(id).await?;
        if !input.has_changes() {
            return Ok(recipe);
        }

        if let Some(slug) = input.slug {
            let slug = slug.trim().to_string();
            validate_slug(&slug)?;
            if slug != recipe.slug && self.repo.exists_by_slug(&slug).await? {
                return Err(RecipeServiceError::DuplicateSlug(slug));
            }
            recipe.slug = slug;
        }
        if let Some(name) = input.name {
            if name.is_blank() {
                return Err(RecipeServiceError::ValidationError(
                    "Recipe name is required in at least one language".to_string(),
                ));
            }
            recipe.name = name;
        }
        if let Some(description) = input.description {
            recipe.description = description;
        }
        if let Some(ingredients) = input.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(steps) = input.steps {
            recipe.steps = steps;
        }
        if let Some(sub_recipes) = input.sub_recipes {
            recipe.sub_recipes = sub_recipes;
        }
        normalize_positions(&mut recipe);

        // A published recipe must stay publishable after an edit. The status
        // is re-read inside the write, so a concurrent publish is honoured.
        let gate = |r: &Recipe| self.report_for(r).is_publishable();
        match self.repo.update_content(&recipe, &gate).await? {
            GuardedWrite::Saved(updated) => {
                tracing::info!(id = updated.id, slug = %updated.slug, "Recipe updated");
                Ok(updated)
            }
            GuardedWrite::Rejected(judged) => {
                tracing::warn!(id, slug = %judged.slug, "Edit rejected, published recipe would have no complete language");
                Err(RecipeServiceError::NotPublishable(Box::new(self.report_for(&judged))))
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(RecipeServiceError::NotFound(id.to_string()));
        }
        tracing::info!(id, "Recipe deleted");
        Ok(())
    }

    /// List one page of recipes.
    ///
    /// The item count is read first; a page past the end is pulled back to
    /// the last page before querying and the result is flagged `corrected`.
    pub async fn list_page(
        &self,
        request: PaginationRequest,
        status: Option<RecipeStatus>,
    ) -> Result<PagedResult<RecipeSummary>> {
        let total = self.repo.count(status).await?;
        let correction = correct_page(request.page, request.limit, total);
        if correction.corrected {
            tracing::debug!(
                requested = request.page,
                corrected = correction.request.page,
                total,
                "Page out of range, corrected"
            );
        }

        let items = self.repo.list(status, &correction.request).await?;
        Ok(PagedResult {
            items,
            total,
            page: correction.request.page,
            limit: correction.request.limit,
            corrected: correction.corrected,
        })
    }

    /// Completeness of a stored recipe in every supported language
    pub async fn completeness(&self, id: i64) -> Result<CompletenessReport> {
        let recipe = self.get_by_id(id).await?;
        Ok(self.report_for(&recipe))
    }

    pub fn report_for(&self, recipe: &Recipe) -> CompletenessReport {
        build_completeness_report(recipe, &self.languages)
    }

    /// Move a recipe between draft and published.
    ///
    /// Publishing requires at least one complete language; unpublishing is
    /// always allowed. The check runs on the recipe as stored inside the
    /// status write.
    pub async fn set_status(&self, id: i64, status: RecipeStatus) -> Result<Recipe> {
        let recipe = self.get_by_id(id).await?;
        if recipe.status == status {
            return Ok(recipe);
        }

        let gate = |r: &Recipe| self.report_for(r).is_publishable();
        match self.repo.update_status(id, status, &gate).await? {
            GuardedWrite::Saved(updated) => {
                tracing::info!(id, slug = %updated.slug, status = %status, "Recipe status changed");
                Ok(updated)
            }
            GuardedWrite::Rejected(judged) => {
                tracing::warn!(id, slug = %judged.slug, "Publish rejected, no complete language");
                Err(RecipeServiceError::NotPublishable(Box::new(self.report_for(&judged))))
            }
        }
    }
}

/// Slugs are lowercase ASCII letters, digits and single dashes
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(RecipeServiceError::ValidationError("Slug cannot be empty".to_string()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(RecipeServiceError::ValidationError(format!(
            "Slug is longer than {} characters",
            MAX_SLUG_LEN
        )));
    }
    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(RecipeServiceError::ValidationError(format!(
            "Invalid slug '{}': use lowercase letters, digits and single dashes",
            slug
        )));
    }
    Ok(())
}

/// Re-number children 0..n in their current display order
fn normalize_positions(recipe: &mut Recipe) {
    recipe.sort_children();
    for (i, ingredient) in recipe.ingredients.iter_mut().enumerate() {
        ingredient.position = i as i32;
    }
    for (i, step) in recipe.steps.iter_mut().enumerate() {
        step.position = i as i32;
    }
    for (i, sub_recipe) in recipe.sub_recipes.iter_mut().enumerate() {
        sub_recipe.position = i as i32;
    }
}

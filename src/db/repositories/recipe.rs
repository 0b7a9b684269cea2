//! Recipe repository
//!
//! Stores a recipe aggregate across four tables. Child rows are always
//! replaced as a whole inside a transaction, so a reader never sees a recipe
//! with half of its steps updated.
//!
//! Writes that can leave a recipe published take a publish gate. The gate is
//! evaluated on the aggregate as it stands inside the write transaction, so a
//! concurrent edit cannot slip between the check and the write.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;

use crate::db::DynDatabasePool;
use crate::models::{
    Ingredient, PaginationRequest, Recipe, RecipeStatus, RecipeSummary, Step, SubRecipe,
    Translations,
};

/// Decides whether an aggregate may be (or stay) published
pub type PublishGate<'a> = dyn Fn(&Recipe) -> bool + Send + Sync + 'a;

/// Outcome of a gated write
#[derive(Debug)]
pub enum GuardedWrite {
    /// Committed; holds the stored aggregate
    Saved(Recipe),
    /// Rolled back because the gate refused; holds the aggregate it judged
    Rejected(Recipe),
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its children and return the stored aggregate
    async fn create(&self, recipe: &Recipe) -> Result<Recipe>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Recipe>>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Recipe>>;
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;
    /// Number of recipes, optionally restricted to one status
    async fn count(&self, status: Option<RecipeStatus>) -> Result<i64>;
    /// One page of recipes, newest first
    async fn list(
        &self,
        status: Option<RecipeStatus>,
        params: &PaginationRequest,
    ) -> Result<Vec<RecipeSummary>>;
    /// Save slug, texts and children. Status is left untouched; if the stored
    /// recipe is published, the new content must pass `gate`.
    async fn update_content(&self, recipe: &Recipe, gate: &PublishGate<'_>) -> Result<GuardedWrite>;
    /// Change status; `published_at` is set on publish and cleared on
    /// unpublish. Publishing requires the stored aggregate to pass `gate`.
    async fn update_status(
        &self,
        id: i64,
        status: RecipeStatus,
        gate: &PublishGate<'_>,
    ) -> Result<GuardedWrite>;
    /// Returns false when no such recipe existed
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxRecipeRepository {
    pool: DynDatabasePool,
}

impl SqlxRecipeRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn RecipeRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> &SqlitePool {
        self.pool.as_sqlite()
    }
}

const RECIPE_COLUMNS: &str =
    "id, slug, status, name, description, published_at, created_at, updated_at";

#[async_trait]
impl RecipeRepository for SqlxRecipeRepository {
    async fn create(&self, recipe: &Recipe) -> Result<Recipe> {
        let now = Utc::now();
        let mut tx = self.sqlite().begin().await?;

        let result = sqlx::query(
            "INSERT INTO recipes (slug, status, name, description, published_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&recipe.slug)
        .bind(recipe.status.as_str())
        .bind(encode_text(&recipe.name)?)
        .bind(encode_text(&recipe.description)?)
        .bind(recipe.published_at)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to create recipe")?;

        let id = result.last_insert_rowid();
        insert_children(&mut tx, id, recipe).await?;
        let created = fetch_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Recipe not found after create"))?;
        tx.commit().await.context("Failed to commit recipe")?;

        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        let mut conn = self.sqlite().acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Recipe>> {
        let mut conn = self.sqlite().acquire().await?;
        let row = sqlx::query(&format!("SELECT {} FROM recipes WHERE slug = ?", RECIPE_COLUMNS))
            .bind(slug)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to get recipe")?;
        match row {
            Some(row) => Ok(Some(load_aggregate(&mut conn, row_to_summary(&row)?).await?)),
            None => Ok(None),
        }
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM recipes WHERE slug = ?")
            .bind(slug)
            .fetch_one(self.sqlite())
            .await?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn count(&self, status: Option<RecipeStatus>) -> Result<i64>;
    /// One page of recipes, newest first
    async fn list(
        &self,
        status: Option<RecipeStatus>,
        params: &PaginationRequest,
    ) -> Result<Vec<RecipeSummary>>;
    /// Save slug, texts and children. Status is left untouched.
    async fn update_content(&self, recipe: &Recipe, gate: &PublishGate<'_>) -> Result<GuardedWrite> {
        let mut tx = self.sqlite().begin().await?;

        let result = sqlx::query(
            "UPDATE recipes SET slug = ?, name = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&recipe.slug)
        .bind(encode_text(&recipe.name)?)
        .bind(encode_text(&recipe.description)?)
        .bind(Utc::now())
        .bind(recipe.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update recipe")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Recipe not found: {}", recipe.id);
        }

        for table in ["recipe_ingredients", "recipe_steps", "recipe_sub_recipes"] {
            sqlx::query(&format!("DELETE FROM {} WHERE recipe_id = ?", table))
                .bind(recipe.id)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to clear {}", table))?;
        }
        insert_children(&mut tx, recipe.id, recipe).await?;

        let updated = fetch_by_id(&mut tx, recipe.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Recipe not found after update"))?;
        if updated.status == RecipeStatus::Published && !gate(&updated) {
            tx.rollback().await.context("Failed to roll back recipe update")?;
            return Ok(GuardedWrite::Rejected(updated));
        }

        tx.commit().await.context("Failed to commit recipe update")?;
        Ok(GuardedWrite::Saved(updated))
    }

    async fn update_status(
        &self,
        id: i64,
        status: RecipeStatus,
        gate: &PublishGate<'_>,
    ) -> Result<GuardedWrite> {
        let mut tx = self.sqlite().begin().await?;

        let current = fetch_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Recipe not found: {}", id))?;
        if status == RecipeStatus::Published && !gate(&current) {
            tx.rollback().await.context("Failed to roll back status update")?;
            return Ok(GuardedWrite::Rejected(current));
        }

        let now = Utc::now();
        let published_at = match status {
            RecipeStatus::Published => Some(now),
            RecipeStatus::Draft => None,
        };

        sqlx::query("UPDATE recipes SET status = ?, published_at = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(published_at)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to update recipe status")?;

        let updated = fetch_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Recipe not found after status update"))?;
        tx.commit().await.context("Failed to commit status update")?;
        Ok(GuardedWrite::Saved(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(self.sqlite())
            .await
            .context("Failed to delete recipe")?;
        Ok(result.rows_affected() > 0)
    }
}

async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Recipe>> {
    let row = sqlx::query(&format!("SELECT {} FROM recipes WHERE id = ?", RECIPE_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to get recipe")?;
    match row {
        Some(row) => Ok(Some(load_aggregate(conn, row_to_summary(&row)?).await?)),
        None => Ok(None),
    }
}

async fn load_aggregate(conn: &mut SqliteConnection, summary: RecipeSummary) -> Result<Recipe> {
    let ingredients = sqlx::query(
        "SELECT id, position, name, note FROM recipe_ingredients WHERE recipe_id = ? ORDER BY position, id",
    )
    .bind(summary.id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to load ingredients")?
    .iter()
    .map(|row| Ingredient {
        id: row.get("id"),
        position: row.get("position"),
        name: decode_text(row.get("name")),
        note: decode_text(row.get("note")),
    })
    .collect();

    let steps = sqlx::query(
        "SELECT id, position, content FROM recipe_steps WHERE recipe_id = ? ORDER BY position, id",
    )
    .bind(summary.id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to load steps")?
    .iter()
    .map(|row| Step {
        id: row.get("id"),
        position: row.get("position"),
        content: decode_text(row.get("content")),
    })
    .collect();

    let sub_recipes = sqlx::query(
        "SELECT id, position, name FROM recipe_sub_recipes WHERE recipe_id = ? ORDER BY position, id",
    )
    .bind(summary.id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to load sub-recipes")?
    .iter()
    .map(|row| SubRecipe {
        id: row.get("id"),
        position: row.get("position"),
        name: decode_text(row.get("name")),
    })
    .collect();

    Ok(Recipe {
        id: summary.id,
        slug: summary.slug,
        status: summary.status,
        name: summary.name,
        description: summary.description,
        ingredients,
        steps,
        sub_recipes,
        published_at: summary.published_at,
        created_at: summary.created_at,
        updated_at: summary.updated_at,
    })
}

async fn insert_children(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    recipe: &Recipe,
) -> Result<()> {
    for ingredient in &recipe.ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, position, name, note) VALUES (?, ?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(ingredient.position)
        .bind(encode_text(&ingredient.name)?)
        .bind(encode_text(&ingredient.note)?)
        .execute(&mut **tx)
        .await
        .context("Failed to insert ingredient")?;
    }

    for step in &recipe.steps {
        sqlx::query("INSERT INTO recipe_steps (recipe_id, position, content) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(step.position)
            .bind(encode_text(&step.content)?)
            .execute(&mut **tx)
            .await
            .context("Failed to insert step")?;
    }

    for sub_recipe in &recipe.sub_recipes {
        sqlx::query("INSERT INTO recipe_sub_recipes (recipe_id, position, name) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(sub_recipe.position)
            .bind(encode_text(&sub_recipe.name)?)
            .execute(&mut **tx)
            .await
            .context("Failed to insert sub-recipe")?;
    }

    Ok(())
}

fn encode_text(text: &Translations) -> Result<String> {
    serde_json::to_string(text).context("Failed to encode translations")
}

/// Unreadable stored JSON reads as untranslated rather than failing the load
fn decode_text(raw: String) -> Translations {
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed translation column: {}", e);
        Translations::default()
    })
}

fn row_to_summary(row: &SqliteRow) -> Result<RecipeSummary> {
    let status: String = row.get("status");
    Ok(RecipeSummary {
        id: row.get("id"),
        slug: row.get("slug"),
        status: status.parse()?,
        name: decode_text(row.get("name")),
        description: decode_text(row.get("description")),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

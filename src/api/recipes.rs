//! Public recipe API endpoints
//!
//! - GET /api/v1/recipes - List published recipes with pagination
//! - GET /api/v1/recipes/{slug} - Get a published recipe by slug
//!
//! Text fields are rendered in the request language, falling back to any
//! other language that has content.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::common::{page_query, LangQuery, PaginationBlock, PublicListQuery};
use crate::api::i18n::resolve_language;
use crate::api::middleware::{ApiError, AppState};
use crate::models::{Language, Recipe, RecipeStatus, RecipeSummary, Translations};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes))
        .route("/{slug}", get(get_recipe))
}

/// Recipe list entry rendered in one language
#[derive(Debug, Serialize, Deserialize)]
pub struct LocalizedSummary {
    pub id: i64,
    pub slug: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
}

impl LocalizedSummary {
    fn new(summary: RecipeSummary, language: Language) -> Self {
        Self {
            id: summary.id,
            name: localize(&summary.name, language),
            description: localize(&summary.description, language),
            slug: summary.slug,
            published_at: summary.published_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalizedIngredient {
    pub name: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalizedRecipe {
    pub id: i64,
    pub slug: String,
    pub language: Language,
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<LocalizedIngredient>,
    pub steps: Vec<Option<String>>,
    pub sub_recipes: Vec<Option<String>>,
    pub published_at: Option<String>,
}

impl LocalizedRecipe {
    fn new(mut recipe: Recipe, language: Language) -> Self {
        recipe.sort_children();
        Self {
            id: recipe.id,
            language,
            name: localize(&recipe.name, language),
            description: localize(&recipe.description, language),
            ingredients: recipe
                .ingredients
                .iter()
                .map(|i| LocalizedIngredient {
                    name: localize(&i.name, language),
                    note: localize(&i.note, language),
                })
                .collect(),
            steps: recipe.steps.iter().map(|s| localize(&s.content, language)).collect(),
            sub_recipes: recipe
                .sub_recipes
                .iter()
                .map(|s| localize(&s.name, language))
                .collect(),
            slug: recipe.slug,
            published_at: recipe.published_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

fn localize(text: &Translations, language: Language) -> Option<String> {
    text.resolve(language).map(str::to_string)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeListResponse {
    pub language: Language,
    pub recipes: Vec<LocalizedSummary>,
    pub pagination: PaginationBlock,
}

/// GET /api/v1/recipes
///
/// A page past the end answers `303 See Other` pointing at the last page.
pub async fn list_recipes(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(query): Query<PublicListQuery>,
) -> Result<Response, ApiError> {
    let language = resolve_language(query.lang.as_deref(), &headers, state.default_language);
    let request = state
        .pagination
        .request(query.page.as_deref(), query.limit.as_deref());

    let result = state
        .recipe_service
        .list_page(request, Some(RecipeStatus::Published))
        .await?;

    if result.corrected {
        let location = format!(
            "{}?{}",
            uri.path(),
            page_query(result.page, result.limit, query.lang.as_deref().map(|l| ("lang", l)))
        );
        return Ok(Redirect::to(&location).into_response());
    }

    let pagination = PaginationBlock::from(&result);
    let recipes = result
        .items
        .into_iter()
        .map(|summary| LocalizedSummary::new(summary, language))
        .collect();

    Ok(Json(RecipeListResponse {
        language,
        recipes,
        pagination,
    })
    .into_response())
}

/// GET /api/v1/recipes/{slug}
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Query(query): Query<LangQuery>,
) -> Result<Json<LocalizedRecipe>, ApiError> {
    let language = resolve_language(query.lang.as_deref(), &headers, state.default_language);
    let recipe = state.recipe_service.get_published_by_slug(&slug).await?;
    Ok(Json(LocalizedRecipe::new(recipe, language)))
}

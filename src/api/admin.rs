//! Admin recipe API endpoints
//!
//! - GET /api/v1/admin/recipes - List all recipes, optionally by status
//! - POST /api/v1/admin/recipes - Create a draft recipe
//! - GET/PUT/DELETE /api/v1/admin/recipes/{id}
//! - GET /api/v1/admin/recipes/{id}/completeness - Translation report
//! - PUT /api/v1/admin/recipes/{id}/status - Publish or unpublish

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::common::{page_query, AdminListQuery, PaginationBlock};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    CreateRecipeInput, Language, Recipe, RecipeStatus, RecipeSummary, UpdateRecipeInput,
};
use crate::services::completeness::CompletenessReport;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/recipes/{id}/completeness", get(get_completeness))
        .route("/recipes/{id}/status", put(update_status))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminRecipeListResponse {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: PaginationBlock,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletenessResponse {
    pub recipe_id: i64,
    pub publishable: bool,
    pub complete_languages: Vec<Language>,
    pub languages: CompletenessReport,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn parse_status(value: &str) -> Result<RecipeStatus, ApiError> {
    value
        .parse::<RecipeStatus>()
        .map_err(|_| ApiError::validation_error(format!("Invalid status: {}", value)))
}

/// GET /api/v1/admin/recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AdminListQuery>,
) -> Result<Response, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };
    let request = state
        .pagination
        .request(query.page.as_deref(), query.limit.as_deref());

    let result = state.recipe_service.list_page(request, status).await?;

    if result.corrected {
        let status_param = status.map(|s| ("status", s.as_str()));
        let location = format!(
            "{}?{}",
            uri.path(),
            page_query(result.page, result.limit, status_param)
        );
        return Ok(Redirect::to(&location).into_response());
    }

    let pagination = PaginationBlock::from(&result);
    Ok(Json(AdminRecipeListResponse {
        recipes: result.items,
        pagination,
    })
    .into_response())
}

/// POST /api/v1/admin/recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(input): Json<CreateRecipeInput>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe = state.recipe_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/v1/admin/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Recipe>, ApiError> {
    Ok(Json(state.recipe_service.get_by_id(id).await?))
}

/// PUT /api/v1/admin/recipes/{id}
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateRecipeInput>,
) -> Result<Json<Recipe>, ApiError> {
    Ok(Json(state.recipe_service.update(id, input).await?))
}

/// DELETE /api/v1/admin/recipes/{id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.recipe_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/recipes/{id}/completeness
pub async fn get_completeness(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CompletenessResponse>, ApiError> {
    let report = state.recipe_service.completeness(id).await?;
    Ok(Json(CompletenessResponse {
        recipe_id: id,
        publishable: report.is_publishable(),
        complete_languages: report.complete_languages(),
        languages: report,
    }))
}

/// PUT /api/v1/admin/recipes/{id}/status
///
/// Publishing is refused with `VALIDATION_ERROR` while no language is
/// complete; the report is returned in `details`.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let status = parse_status(&body.status)?;
    Ok(Json(state.recipe_service.set_status(id, status).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_server;
    use axum::http::header;
    use serde_json::json;

    fn complete_body(slug: &str) -> serde_json::Value {
        json!({
            "slug": slug,
            "name": {"en": "Banitsa", "bg": "Баница"},
            "description": {"en": "Cheese pastry"},
            "ingredients": [{"name": {"en": "Filo"}, "note": {}}],
            "steps": [{"content": {"en": "Bake"}}],
            "sub_recipes": []
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (server, _) = test_server().await;

        let response = server.post("/api/v1/admin/recipes").json(&complete_body("banitsa")).await;
        response.assert_status(StatusCode::CREATED);
        let created: Recipe = response.json();
        assert_eq!(created.status, RecipeStatus::Draft);
        assert_eq!(created.ingredients.len(), 1);

        let fetched: Recipe = server
            .get(&format!("/api/v1/admin/recipes/{}", created.id))
            .await
            .json();
        assert_eq!(fetched.slug, "banitsa");
    }

    #[tokio::test]
    async fn test_create_invalid_and_duplicate() {
        let (server, _) = test_server().await;

        let response = server
            .post("/api/v1/admin/recipes")
            .json(&json!({"slug": "Not Valid", "name": {"en": "x"}}))
            .await;
        response.assert_status_bad_request();

        server.post("/api/v1/admin/recipes").json(&complete_body("banitsa")).await;
        let response = server.post("/api/v1/admin/recipes").json(&complete_body("banitsa")).await;
        response.assert_status(StatusCode::CONFLICT);
        let body: ApiError = response.json();
        assert_eq!(body.error.code, "CONFLICT");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (server, _) = test_server().await;
        let created: Recipe = server
            .post("/api/v1/admin/recipes")
            .json(&complete_body("banitsa"))
            .await
            .json();
        let path = format!("/api/v1/admin/recipes/{}", created.id);

        let updated: Recipe = server
            .put(&path)
            .json(&json!({"steps": [{"content": {"en": "Roll"}}, {"content": {"en": "Bake"}}]}))
            .await
            .json();
        assert_eq!(updated.steps.len(), 2);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_completeness_endpoint() {
        let (server, _) = test_server().await;
        let created: Recipe = server
            .post("/api/v1/admin/recipes")
            .json(&complete_body("banitsa"))
            .await
            .json();

        let body: CompletenessResponse = server
            .get(&format!("/api/v1/admin/recipes/{}/completeness", created.id))
            .await
            .json();
        assert!(body.publishable);
        assert_eq!(body.complete_languages, vec![Language::En]);
        let bg = body.languages.get(Language::Bg).unwrap();
        assert!(bg.recipe.name);
        assert!(!bg.recipe.description);
    }

    #[tokio::test]
    async fn test_publish_gate() {
        let (server, _) = test_server().await;
        let incomplete: Recipe = server
            .post("/api/v1/admin/recipes")
            .json(&json!({"slug": "stub", "name": {"en": "Stub"}}))
            .await
            .json();

        let response = server
            .put(&format!("/api/v1/admin/recipes/{}/status", incomplete.id))
            .json(&json!({"status": "published"}))
            .await;
        response.assert_status_bad_request();
        let body: ApiError = response.json();
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        assert!(body.error.details.unwrap()["completeness"]["en"].is_object());

        let complete: Recipe = server
            .post("/api/v1/admin/recipes")
            .json(&complete_body("banitsa"))
            .await
            .json();
        let status_path = format!("/api/v1/admin/recipes/{}/status", complete.id);
        let published: Recipe = server
            .put(&status_path)
            .json(&json!({"status": "published"}))
            .await
            .json();
        assert_eq!(published.status, RecipeStatus::Published);

        let draft: Recipe = server.put(&status_path).json(&json!({"status": "draft"})).await.json();
        assert_eq!(draft.status, RecipeStatus::Draft);

        server
            .put(&status_path)
            .json(&json!({"status": "archived"}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_admin_list_filter_and_redirect() {
        let (server, _) = test_server().await;
        for i in 0..3 {
            server
                .post("/api/v1/admin/recipes")
                .json(&json!({"slug": format!("draft-{}", i), "name": {"en": "Draft"}}))
                .await;
        }

        let body: AdminRecipeListResponse = server
            .get("/api/v1/admin/recipes?status=draft")
            .await
            .json();
        assert_eq!(body.recipes.len(), 3);
        assert_eq!(body.pagination.total, 3);

        let body: AdminRecipeListResponse = server
            .get("/api/v1/admin/recipes?status=published")
            .await
            .json();
        assert!(body.recipes.is_empty());

        let response = server.get("/api/v1/admin/recipes?page=5&status=draft").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header(header::LOCATION),
            "/api/v1/admin/recipes?page=1&limit=10&status=draft"
        );

        server
            .get("/api/v1/admin/recipes?status=bogus")
            .await
            .assert_status_bad_request();
    }
}

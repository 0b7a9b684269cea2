//! Shared API state and error envelope
//!
//! Every handler error is rendered as
//! `{"error": {"code": ..., "message": ..., "details": ...}}` with the HTTP
//! status derived from `code`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::DynDatabasePool;
use crate::models::Language;
use crate::services::pagination::PaginationPolicy;
use crate::services::recipe::{RecipeService, RecipeServiceError};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub recipe_service: Arc<RecipeService>,
    pub pagination: Arc<PaginationPolicy>,
    pub default_language: Language,
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<RecipeServiceError> for ApiError {
    fn from(err: RecipeServiceError) -> Self {
        match err {
            RecipeServiceError::NotFound(key) => {
                ApiError::not_found(format!("Recipe not found: {}", key))
            }
            RecipeServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            RecipeServiceError::DuplicateSlug(slug) => ApiError::with_details(
                "CONFLICT",
                format!("Recipe slug already exists: {}", slug),
                serde_json::json!({"field": "slug", "value": slug}),
            ),
            RecipeServiceError::NotPublishable(report) => ApiError::with_details(
                "VALIDATION_ERROR",
                "Recipe cannot be published until at least one language is complete",
                serde_json::json!({ "completeness": report }),
            ),
            RecipeServiceError::InternalError(e) => {
                tracing::error!("Recipe service failure: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::completeness::CompletenessReport;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation_error("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::new("CONFLICT", "x").status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::internal_error("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::new("SOMETHING_ELSE", "x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_service_error() {
        let err: ApiError = RecipeServiceError::DuplicateSlug("soup".to_string()).into();
        assert_eq!(err.error.code, "CONFLICT");
        assert_eq!(err.error.details.unwrap()["value"], "soup");

        let err: ApiError =
            RecipeServiceError::NotPublishable(Box::new(CompletenessReport::default())).into();
        assert_eq!(err.error.code, "VALIDATION_ERROR");
        assert!(err.error.details.unwrap().get("completeness").is_some());

        let err: ApiError = RecipeServiceError::InternalError(anyhow::anyhow!("disk on fire")).into();
        assert_eq!(err.error.code, "INTERNAL_ERROR");
        assert!(!err.error.message.contains("disk"));
    }

    #[test]
    fn test_error_serialization_skips_empty_details() {
        let json = serde_json::to_value(ApiError::not_found("gone")).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert!(json["error"].get("details").is_none());
    }
}

//! Services layer - Business logic
//!
//! - `pagination`: page correction and the page window
//! - `completeness`: per-language translation reports and the publish gate
//! - `recipe`: recipe CRUD, listing and status transitions

pub mod completeness;
pub mod pagination;
pub mod recipe;

pub use completeness::{build_completeness_report, CompletenessReport, LanguageReport};
pub use pagination::{build_page_window, correct_page, PageCorrection, PaginationPolicy};
pub use recipe::{RecipeService, RecipeServiceError};

use crate::models::domain::QueryFilters;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Browser search form (POST /search, form-encoded)
///
/// Field names match the HTML form inputs. The facet fields are only
/// rendered on the VuFind form but are accepted by either backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub nl: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub year_from: Option<String>,
    #[serde(default)]
    pub year_to: Option<String>,
}

impl SearchForm {
    /// Facets the user picked, with blank selections dropped
    pub fn facet_filters(&self) -> QueryFilters {
        QueryFilters {
            language: non_blank(&self.language),
            material_type: non_blank(&self.material_type),
            year_from: non_blank(&self.year_from),
            year_to: non_blank(&self.year_to),
            ..Default::default()
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// JSON search request (POST /api/v1/search)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchApiRequest {
    #[validate(length(min = 1))]
    pub query: String,
    #[serde(default)]
    pub filters: QueryFilters,
}

use crate::models::domain::{SearchRecord, TranslatedQuery};
use serde::{Deserialize, Serialize};

/// Response for the JSON search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchApiResponse {
    pub query: String,
    pub translated: TranslatedQuery,
    pub results: Vec<SearchRecord>,
    /// AI summary as markdown; absent when summarization failed
    pub summary: Option<String>,
    pub result_count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

use crate::models::{SearchRecord, TranslatedQuery};
use crate::services::ai::QueryDialect;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying a discovery system
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("search API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Abstracts the discovery system behind the search pipeline
///
/// Implementations (Primo, VuFind) translate a `TranslatedQuery` into their
/// REST API's parameters and normalize the institution-specific JSON into
/// `SearchRecord`s. The pipeline, routes, and server runner are generic over
/// this trait.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Short backend name for logs and the health endpoint
    fn name(&self) -> &'static str;

    /// Which translation prompt this backend's query syntax needs
    fn dialect(&self) -> QueryDialect;

    /// Run the search and return at most `limit` normalized records
    async fn search(
        &self,
        query: &TranslatedQuery,
        limit: usize,
    ) -> Result<Vec<SearchRecord>, DiscoveryError>;
}

use crate::core::translate::parse_translated;
use crate::models::{QueryFilters, SearchRecord, TranslatedQuery};
use crate::services::{AiClient, DiscoveryClient, DiscoveryError};
use std::sync::Arc;

/// Result of one full search request
#[derive(Debug)]
pub struct SearchOutcome {
    pub query: String,
    pub translated: TranslatedQuery,
    pub records: Vec<SearchRecord>,
    /// AI summary as markdown; None when summarization failed
    pub summary_markdown: Option<String>,
}

/// Orchestrates one search request end to end
///
/// # Pipeline Stages
/// 1. AI translation of the natural-language query (fallback: raw query)
/// 2. Merge of user-selected facets over AI-derived filters
/// 3. Discovery system search
/// 4. AI summary of the normalized results (degrades to no summary)
pub struct SearchPipeline<C: DiscoveryClient> {
    ai: Arc<AiClient>,
    backend: Arc<C>,
    max_results: usize,
}

impl<C: DiscoveryClient> SearchPipeline<C> {
    pub fn new(ai: Arc<AiClient>, backend: Arc<C>, max_results: usize) -> Self {
        Self {
            ai,
            backend,
            max_results,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run the full pipeline for one query
    ///
    /// Only discovery failures propagate: the page cannot render without
    /// results, while translation falls back to the raw query and a failed
    /// summary just leaves the summary out.
    pub async fn run(
        &self,
        nl_query: &str,
        user_filters: QueryFilters,
    ) -> Result<SearchOutcome, DiscoveryError> {
        let mut translated = match self.ai.translate(nl_query, self.backend.dialect()).await {
            Ok(text) => parse_translated(&text, nl_query),
            Err(e) => {
                tracing::warn!("AI translation failed, using raw query: {}", e);
                TranslatedQuery::fallback(nl_query)
            }
        };

        // User-selected facets win over what the model inferred
        translated.filters = translated.filters.overridden_by(&user_filters);

        tracing::info!(
            "Searching {} with query \"{}\" ({} facets)",
            self.backend.name(),
            translated.query,
            translated.filters.applied().len()
        );

        let records = self.backend.search(&translated, self.max_results).await?;

        tracing::debug!("{} records after normalization", records.len());

        let summary_markdown = match self.ai.summarize(nl_query, &records).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!("AI summary failed, rendering without it: {}", e);
                None
            }
        };

        Ok(SearchOutcome {
            query: nl_query.to_string(),
            translated,
            records,
            summary_markdown,
        })
    }
}

use crate::config::VuFindSettings;
use crate::models::{SearchRecord, TranslatedQuery};
use crate::services::ai::QueryDialect;
use crate::services::discovery::{DiscoveryClient, DiscoveryError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// VuFind REST API client
///
/// Sends `lookfor` searches with repeated `filter[]` facet parameters and
/// normalizes the `records` array of the response.
pub struct VuFindClient {
    endpoint: String,
    client: Client,
}

impl VuFindClient {
    pub fn new(settings: &VuFindSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: settings.endpoint.clone(),
            client,
        }
    }

    /// Build the query-string parameters, including the `filter[]` facets
    pub fn build_query_params(
        &self,
        query: &TranslatedQuery,
        limit: usize,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lookfor", query.query.clone()),
            ("limit", limit.to_string()),
        ];

        if let Some(search_type) = &query.search_type {
            params.push(("type", search_type.clone()));
        }

        let filters = &query.filters;
        if let Some(language) = &filters.language {
            params.push(("filter[]", format!("language::{}", language)));
        }
        if let Some(material_type) = &filters.material_type {
            params.push(("filter[]", format!("type::{}", material_type)));
        }
        if filters.year_from.is_some() || filters.year_to.is_some() {
            let year_from = filters.year_from.as_deref().unwrap_or("");
            let year_to = filters.year_to.as_deref().unwrap_or("");
            params.push(("filter[]", format!("year::{}-{}", year_from, year_to)));
        }

        params
    }
}

#[async_trait]
impl DiscoveryClient for VuFindClient {
    fn name(&self) -> &'static str {
        "vufind"
    }

    fn dialect(&self) -> QueryDialect {
        QueryDialect::VuFind
    }

    async fn search(
        &self,
        query: &TranslatedQuery,
        limit: usize,
    ) -> Result<Vec<SearchRecord>, DiscoveryError> {
        let params = self.build_query_params(query, limit);

        tracing::debug!("VuFind search: lookfor=\"{}\"", query.query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("VuFind search failed: {} - {}", status, body);
            return Err(DiscoveryError::ApiError { status, body });
        }

        let json: Value = response.json().await?;
        let records = normalize_vufind_response(&json, limit);

        tracing::debug!("VuFind returned {} normalized records", records.len());

        Ok(records)
    }
}

/// Normalize a VuFind API response into `SearchRecord`s
pub fn normalize_vufind_response(raw: &Value, max_items: usize) -> Vec<SearchRecord> {
    let records = match raw.get("records").and_then(|r| r.as_array()) {
        Some(r) => r,
        None => return Vec::new(),
    };

    records
        .iter()
        .take(max_items)
        .map(|rec| SearchRecord {
            title: string_field(rec, "title").unwrap_or_else(|| "No title".to_string()),
            authors: authors_field(rec),
            year: string_field(rec, "date").unwrap_or_default(),
            format: string_field(rec, "format").unwrap_or_default(),
            snippet: string_field(rec, "description").unwrap_or_default(),
            link: string_field(rec, "url").unwrap_or_else(|| "#".to_string()),
        })
        .collect()
}

fn string_field(rec: &Value, key: &str) -> Option<String> {
    rec.get(key)?.as_str().map(String::from)
}

/// `author` may be a single string or an array of strings
fn authors_field(rec: &Value) -> String {
    match rec.get("author") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

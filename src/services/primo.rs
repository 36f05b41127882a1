use crate::config::PrimoSettings;
use crate::models::{SearchRecord, TranslatedQuery};
use crate::services::ai::QueryDialect;
use crate::services::discovery::{DiscoveryClient, DiscoveryError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Primo REST API client
///
/// Sends `q=any,contains,{query}` searches to the configured Primo endpoint
/// (plus the institutional apikey/scope/tab/vid parameters when set) and
/// normalizes the returned PNX documents.
pub struct PrimoClient {
    endpoint: String,
    api_key: Option<String>,
    scope: Option<String>,
    tab: Option<String>,
    vid: Option<String>,
    client: Client,
}

impl PrimoClient {
    pub fn new(settings: &PrimoSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            scope: settings.scope.clone(),
            tab: settings.tab.clone(),
            vid: settings.vid.clone(),
            client,
        }
    }

    /// Build the query-string parameters for one search
    pub fn build_query_params(&self, query: &TranslatedQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", format!("any,contains,{}", query.query))];

        if let Some(api_key) = &self.api_key {
            params.push(("apikey", api_key.clone()));
        }
        if let Some(scope) = &self.scope {
            params.push(("scope", scope.clone()));
        }
        if let Some(tab) = &self.tab {
            params.push(("tab", tab.clone()));
        }
        if let Some(vid) = &self.vid {
            params.push(("vid", vid.clone()));
        }

        let filters = &query.filters;
        if let Some(year_from) = &filters.year_from {
            params.push(("fromYear", year_from.clone()));
        }
        if let Some(year_to) = &filters.year_to {
            params.push(("toYear", year_to.clone()));
        }
        if let Some(language) = &filters.language {
            params.push(("lang", language.clone()));
        }
        if let Some(material_type) = &filters.material_type {
            params.push(("materialType", material_type.clone()));
        }

        params
    }
}

#[async_trait]
impl DiscoveryClient for PrimoClient {
    fn name(&self) -> &'static str {
        "primo"
    }

    fn dialect(&self) -> QueryDialect {
        QueryDialect::Primo
    }

    async fn search(
        &self,
        query: &TranslatedQuery,
        limit: usize,
    ) -> Result<Vec<SearchRecord>, DiscoveryError> {
        let params = self.build_query_params(query);

        tracing::debug!("Primo search: q=\"{}\"", query.query);

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
            tracing::error!("Primo search failed: {} - {}", status, body);
            return Err(DiscoveryError::ApiError { status, body });
        }

        let json: Value = response.json().await?;
        let records = normalize_primo_response(&json, limit);

        tracing::debug!("Primo returned {} normalized records", records.len());

        Ok(records)
    }
}

/// Normalize institution-specific Primo JSON into `SearchRecord`s
///
/// The document array may live under `docs`, `records`, `pnx`, or `items`
/// depending on the Primo flavor, or the response may itself be an array.
/// Each document's PNX sections supply the display fields.
pub fn normalize_primo_response(raw: &Value, max_items: usize) -> Vec<SearchRecord> {
    let docs = locate_docs(raw);
    let docs = match docs {
        Some(d) => d,
        None => return Vec::new(),
    };

    docs.iter()
        .take(max_items)
        .filter_map(normalize_doc)
        .collect()
}

fn locate_docs(raw: &Value) -> Option<&Vec<Value>> {
    if let Some(obj) = raw.as_object() {
        for key in ["docs", "records", "pnx", "items"] {
            if let Some(arr) = obj.get(key).and_then(|v| v.as_array()) {
                return Some(arr);
            }
        }
        return None;
    }
    raw.as_array()
}

fn normalize_doc(doc: &Value) -> Option<SearchRecord> {
    // Some responses nest the PNX record, some are the PNX record
    let pnx = doc.get("pnx").unwrap_or(doc);
    if !pnx.is_object() {
        return None;
    }

    let title = section_first(pnx, "display", "title").unwrap_or_default();
    let authors = section_join(pnx, "display", "contributor", ", ").unwrap_or_default();
    let year = section_first(pnx, "display", "creationdate")
        .or_else(|| section_first(pnx, "addata", "date"))
        .unwrap_or_default();
    let format = section_first(pnx, "display", "format").unwrap_or_default();
    let snippet = section_join(pnx, "display", "description", " ")
        .or_else(|| section_join(pnx, "addata", "abstract", " "))
        .unwrap_or_default();
    let link = section_first(pnx, "links", "openurl");

    Some(SearchRecord {
        title: if title.is_empty() { "No title".to_string() } else { title },
        authors,
        year,
        format,
        snippet,
        link: link.unwrap_or_else(|| "#".to_string()),
    })
}

/// First string of a PNX field, e.g. `pnx.display.title[0]`
fn section_first(pnx: &Value, section: &str, field: &str) -> Option<String> {
    pnx.get(section)?
        .get(field)?
        .as_array()?
        .first()?
        .as_str()
        .map(String::from)
}

/// All strings of a PNX field joined with `sep`; None when absent or empty
fn section_join(pnx: &Value, section: &str, field: &str, sep: &str) -> Option<String> {
    let values: Vec<&str> = pnx
        .get(section)?
        .get(field)?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(sep))
    }
}

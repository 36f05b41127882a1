use serde::{Deserialize, Serialize};

/// A catalog record normalized from an institution-specific discovery response
///
/// Both backends collapse their JSON into this shape before rendering or
/// summarization. Missing titles become "No title", missing links "#".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub format: String,
    pub snippet: String,
    pub link: String,
}

impl SearchRecord {
    /// One-line rendering used when enumerating records in an AI prompt
    pub fn prompt_line(&self, index: usize) -> String {
        format!(
            "{}. {} — {} ({}) — {}",
            index, self.title, self.authors, self.year, self.snippet
        )
    }
}

/// Optional facet set: the translation model may emit these, and the search
/// form may supply them. User-selected facets override AI-derived ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl QueryFilters {
    pub fn is_empty(&self) -> bool {
        self.year_from.is_none()
            && self.year_to.is_none()
            && self.language.is_none()
            && self.material_type.is_none()
            && self.subject.is_none()
            && self.author.is_none()
            && self.title.is_none()
    }

    /// Merge `overrides` on top of these filters, field by field
    pub fn overridden_by(&self, overrides: &QueryFilters) -> QueryFilters {
        QueryFilters {
            year_from: overrides.year_from.clone().or_else(|| self.year_from.clone()),
            year_to: overrides.year_to.clone().or_else(|| self.year_to.clone()),
            language: overrides.language.clone().or_else(|| self.language.clone()),
            material_type: overrides
                .material_type
                .clone()
                .or_else(|| self.material_type.clone()),
            subject: overrides.subject.clone().or_else(|| self.subject.clone()),
            author: overrides.author.clone().or_else(|| self.author.clone()),
            title: overrides.title.clone().or_else(|| self.title.clone()),
        }
    }

    /// (name, value) pairs of the facets that are set, for display
    pub fn applied(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        let fields: [(&'static str, &Option<String>); 7] = [
            ("year_from", &self.year_from),
            ("year_to", &self.year_to),
            ("language", &self.language),
            ("material_type", &self.material_type),
            ("subject", &self.subject),
            ("author", &self.author),
            ("title", &self.title),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                out.push((name, v.as_str()));
            }
        }
        out
    }
}

/// Structured search produced by the translation step
///
/// `query` holds the core search expression (the model's `q` for Primo,
/// `lookfor` for VuFind). When translation fails, the fallback carries the
/// raw natural-language query with no filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedQuery {
    pub query: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
    #[serde(default)]
    pub filters: QueryFilters,
}

impl TranslatedQuery {
    pub fn fallback(nl_query: &str) -> Self {
        Self {
            query: nl_query.to_string(),
            search_type: None,
            filters: QueryFilters::default(),
        }
    }
}

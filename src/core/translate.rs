use crate::models::{QueryFilters, TranslatedQuery};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref FENCE_OPEN: Regex = Regex::new(r"^```(?:json)?\s*").unwrap();
    static ref FENCE_CLOSE: Regex = Regex::new(r"\s*```$").unwrap();
}

/// Strip a leading ```/```json fence and a trailing fence from model output
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let opened = FENCE_OPEN.replace(trimmed, "");
    FENCE_CLOSE.replace(&opened, "").into_owned()
}

/// Parse the translation model's output into a `TranslatedQuery`
///
/// Accepts `q` (Primo dialect) or `lookfor` (VuFind dialect) as the query
/// key, an optional `type`, and a `filters` object whose values may be
/// strings or numbers. Any parse failure falls back to the raw query with
/// empty filters, exactly like the original front-ends.
pub fn parse_translated(raw: &str, fallback_query: &str) -> TranslatedQuery {
    let cleaned = strip_code_fences(raw);

    let value: Value = match serde_json::from_str(&cleaned) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Translation output is not JSON ({}), using raw query", e);
            return TranslatedQuery::fallback(fallback_query);
        }
    };

    let query = value
        .get("q")
        .or_else(|| value.get("lookfor"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from);

    let query = match query {
        Some(q) => q,
        None => {
            tracing::debug!("Translation output has no usable query key, using raw query");
            return TranslatedQuery::fallback(fallback_query);
        }
    };

    let search_type = value
        .get("type")
        .and_then(|v| v.as_str())
        .map(String::from);

    let filters = value
        .get("filters")
        .map(parse_filters)
        .unwrap_or_default();

    TranslatedQuery {
        query,
        search_type,
        filters,
    }
}

fn parse_filters(value: &Value) -> QueryFilters {
    QueryFilters {
        year_from: filter_value(value, "year_from"),
        year_to: filter_value(value, "year_to"),
        language: filter_value(value, "language"),
        material_type: filter_value(value, "material_type"),
        subject: filter_value(value, "subject"),
        author: filter_value(value, "author"),
        title: filter_value(value, "title"),
    }
}

/// A filter value may be a string or a number (models emit years both ways)
fn filter_value(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_fences() {
        assert_eq!(strip_code_fences("```\n{\"q\":\"x\"}\n```"), "{\"q\":\"x\"}");
    }

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(
            strip_code_fences("```json\n{\"q\": \"cats\"}\n```"),
            "{\"q\": \"cats\"}"
        );
    }

    #[test]
    fn test_strip_leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("{\"q\": \"cats\"}"), "{\"q\": \"cats\"}");
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn test_parse_primo_shape() {
        let raw = r#"{"q": "climate resilience", "filters": {"year_from": 2019, "year_to": "2024", "language": "eng"}}"#;
        let t = parse_translated(raw, "fallback");

        assert_eq!(t.query, "climate resilience");
        assert!(t.search_type.is_none());
        assert_eq!(t.filters.year_from.as_deref(), Some("2019"));
        assert_eq!(t.filters.year_to.as_deref(), Some("2024"));
        assert_eq!(t.filters.language.as_deref(), Some("eng"));
    }

    #[test]
    fn test_parse_vufind_shape() {
        let raw = r#"{"lookfor": "urban planning", "type": "AllFields", "filters": {"material_type": "Articles"}}"#;
        let t = parse_translated(raw, "fallback");

        assert_eq!(t.query, "urban planning");
        assert_eq!(t.search_type.as_deref(), Some("AllFields"));
        assert_eq!(t.filters.material_type.as_deref(), Some("Articles"));
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = "```json\n{\"q\": \"dogs\"}\n```";
        let t = parse_translated(raw, "fallback");
        assert_eq!(t.query, "dogs");
    }

    #[test]
    fn test_parse_falls_back_on_prose() {
        let t = parse_translated("Sure! Here is your query: cats", "recent articles on cats");
        assert_eq!(t.query, "recent articles on cats");
        assert!(t.filters.is_empty());
    }

    #[test]
    fn test_parse_falls_back_on_missing_query_key() {
        let t = parse_translated(r#"{"filters": {"language": "eng"}}"#, "raw query");
        assert_eq!(t.query, "raw query");
        assert!(t.filters.is_empty());
    }

    #[test]
    fn test_parse_falls_back_on_blank_query() {
        let t = parse_translated(r#"{"q": "   "}"#, "raw query");
        assert_eq!(t.query, "raw query");
    }

    #[test]
    fn test_parse_ignores_blank_and_non_scalar_filters() {
        let raw = r#"{"q": "x", "filters": {"language": "  ", "subject": ["a", "b"], "author": "Doe"}}"#;
        let t = parse_translated(raw, "fallback");
        assert!(t.filters.language.is_none());
        assert!(t.filters.subject.is_none());
        assert_eq!(t.filters.author.as_deref(), Some("Doe"));
    }
}

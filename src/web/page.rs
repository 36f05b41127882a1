use crate::core::SearchOutcome;
use crate::models::SearchRecord;
use pulldown_cmark::{html, Parser};

/// Per-backend page chrome: heading, example query, and whether the facet
/// form (language / material type / year range) is rendered.
#[derive(Debug, Clone, Copy)]
pub struct PageStyle {
    pub title: &'static str,
    pub example: &'static str,
    pub facet_form: bool,
}

impl PageStyle {
    pub fn primo() -> Self {
        Self {
            title: "Primo AI Search Frontend",
            example: "e.g. Recent articles (2019-2024) on climate resilience in urban planning, English, peer-reviewed",
            facet_form: false,
        }
    }

    pub fn vufind() -> Self {
        Self {
            title: "VuFind AI Search Frontend",
            example: "Recent articles on climate resilience in urban planning, English, peer-reviewed",
            facet_form: true,
        }
    }
}

const PAGE_CSS: &str = "\
body { font-family: Arial, Helvetica, sans-serif; margin: 2rem; }\n\
input[type=text], input[type=number], select, textarea { width: 100%; padding: 0.5rem; margin-bottom: 0.5rem; }\n\
button { padding: 0.5rem 1rem; }\n\
.result { border: 1px solid #ddd; padding: 0.75rem; margin-bottom: 0.5rem; border-radius: 6px; }\n\
.meta { color: #666; font-size: 0.9rem; }\n\
.summ { background: #f7f7f9; padding: 0.75rem; border-radius: 6px; margin-top: 1rem; }\n\
.error { background: #fbeaea; border: 1px solid #e0b4b4; padding: 0.75rem; border-radius: 6px; }\n";

/// Escape text for embedding into HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an AI summary (markdown) to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// The search form page
pub fn render_index(style: &PageStyle) -> String {
    render_page(style, "")
}

/// The results page: query echo, translated JSON, record cards, AI summary
pub fn render_results(style: &PageStyle, outcome: &SearchOutcome) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<h2>Query: <em>{}</em></h2>\n",
        escape_html(&outcome.query)
    ));

    let translated_json = serde_json::to_string_pretty(&outcome.translated)
        .unwrap_or_else(|_| outcome.translated.query.clone());
    body.push_str("<h3>AI translated query</h3>\n");
    body.push_str(&format!("<pre>{}</pre>\n", escape_html(&translated_json)));

    let applied = outcome.translated.filters.applied();
    if !applied.is_empty() {
        let facets: Vec<String> = applied
            .iter()
            .map(|(name, value)| format!("{} = {}", name, escape_html(value)))
            .collect();
        body.push_str(&format!(
            "<div><strong>Applied facets:</strong> {}</div>\n",
            facets.join(", ")
        ));
    }

    body.push_str(&format!(
        "<h3>Search results ({})</h3>\n",
        outcome.records.len()
    ));
    for record in &outcome.records {
        body.push_str(&render_record(record));
    }

    if let Some(summary) = &outcome.summary_markdown {
        body.push_str("<h3>AI Summary</h3>\n");
        body.push_str(&format!(
            "<div class=\"summ\">{}</div>\n",
            markdown_to_html(summary)
        ));
    }

    render_page(style, &body)
}

/// An error page in the same chrome as the results page
pub fn render_error(style: &PageStyle, message: &str) -> String {
    let body = format!("<div class=\"error\">{}</div>\n", escape_html(message));
    render_page(style, &body)
}

fn render_record(record: &SearchRecord) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"result\">\n");
    out.push_str(&format!(
        "  <div><strong>{}</strong></div>\n",
        escape_html(&record.title)
    ));
    out.push_str(&format!(
        "  <div class=\"meta\">{} — {} — {} — <a href=\"{}\" target=\"_blank\">Open record</a></div>\n",
        escape_html(&record.authors),
        escape_html(&record.year),
        escape_html(&record.format),
        escape_html(&record.link)
    ));
    if !record.snippet.is_empty() {
        out.push_str(&format!(
            "  <div style=\"margin-top:.5rem\">{}</div>\n",
            escape_html(&record.snippet)
        ));
    }
    out.push_str("</div>\n");
    out
}

fn render_form(style: &PageStyle) -> String {
    let mut form = String::new();
    form.push_str("<form method=\"post\" action=\"/search\">\n");
    form.push_str("<label for=\"nl\">Search (natural language)</label>\n");
    form.push_str(&format!(
        "<textarea id=\"nl\" name=\"nl\" rows=\"3\" placeholder=\"{}\"></textarea>\n",
        escape_html(style.example)
    ));

    if style.facet_form {
        form.push_str(concat!(
            "<label for=\"language\">Language</label>\n",
            "<select id=\"language\" name=\"language\">\n",
            "  <option value=\"\">Any</option>\n",
            "  <option value=\"English\">English</option>\n",
            "  <option value=\"German\">German</option>\n",
            "  <option value=\"French\">French</option>\n",
            "</select>\n",
            "<label for=\"material_type\">Material type</label>\n",
            "<select id=\"material_type\" name=\"material_type\">\n",
            "  <option value=\"\">Any</option>\n",
            "  <option value=\"Books\">Books</option>\n",
            "  <option value=\"Articles\">Articles</option>\n",
            "  <option value=\"Theses\">Theses</option>\n",
            "</select>\n",
            "<label for=\"year_from\">Year from</label>\n",
            "<input type=\"number\" id=\"year_from\" name=\"year_from\" placeholder=\"e.g., 2019\">\n",
            "<label for=\"year_to\">Year to</label>\n",
            "<input type=\"number\" id=\"year_to\" name=\"year_to\" placeholder=\"e.g., 2024\">\n",
        ));
    }

    form.push_str("<button type=\"submit\">Search</button>\n</form>\n");
    form
}

fn render_page(style: &PageStyle, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n<title>{title}</title>\n\
         <style>\n{css}</style>\n</head>\n<body>\n<h1>{title}</h1>\n{form}{body}</body>\n</html>\n",
        title = escape_html(style.title),
        css = PAGE_CSS,
        form = render_form(style),
        body = body,
    )
}

// Integration tests for maidisco
//
// All external HTTP traffic (the OpenAI-compatible endpoint and the
// discovery APIs) is stubbed with mockito.

use actix_web::{test, web, App};
use maidisco::config::{AiSettings, PrimoSettings, VuFindSettings};
use maidisco::core::SearchPipeline;
use maidisco::models::{HealthResponse, QueryFilters, SearchApiResponse};
use maidisco::routes::{configure_routes, AppState};
use maidisco::services::{AiClient, PrimoClient, VuFindClient};
use maidisco::web::PageStyle;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;

fn ai_settings(base_url: &str) -> AiSettings {
    AiSettings {
        api_url: base_url.to_string(),
        api_key: "sk-test".to_string(),
        model: "gpt-4".to_string(),
        translation_max_tokens: None,
        summary_max_tokens: None,
        translation_timeout_secs: Some(5),
        summary_timeout_secs: Some(5),
    }
}

fn chat_body(content: &str) -> String {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
    .to_string()
}

/// Stub the translation and summary chat completions on `server`
async fn mock_ai(server: &mut ServerGuard, translation: &str, summary: &str) {
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("search parameters".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body(translation))
        .create_async()
        .await;

    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("academic research assistant".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body(summary))
        .create_async()
        .await;
}

fn primo_docs() -> serde_json::Value {
    json!({
        "docs": [{
            "pnx": {
                "display": {
                    "title": ["Climate Resilience in Urban Planning"],
                    "contributor": ["Doe, Jane"],
                    "creationdate": ["2021"],
                    "format": ["article"],
                    "description": ["A study of resilient cities."]
                },
                "links": { "openurl": ["https://resolver.example.org/1"] }
            }
        }]
    })
}

#[tokio::test]
async fn test_primo_pipeline_end_to_end() {
    let mut server = Server::new_async().await;

    mock_ai(
        &mut server,
        "```json\n{\"q\": \"climate resilience\", \"filters\": {\"year_from\": 2019}}\n```",
        "**Summary**: one highly relevant article.",
    )
    .await;

    let discovery_mock = server
        .mock("GET", "/primo/v1/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "any,contains,climate resilience".into()),
            Matcher::UrlEncoded("fromYear".into(), "2019".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(primo_docs().to_string())
        .create_async()
        .await;

    let ai = Arc::new(AiClient::new(&ai_settings(&server.url())));
    let primo = Arc::new(PrimoClient::new(&PrimoSettings {
        endpoint: format!("{}/primo/v1/search", server.url()),
        api_key: None,
        scope: None,
        tab: None,
        vid: None,
    }));

    let pipeline = SearchPipeline::new(ai, primo, 10);
    let outcome = pipeline
        .run("recent articles on climate resilience", QueryFilters::default())
        .await
        .expect("pipeline should succeed");

    discovery_mock.assert_async().await;

    assert_eq!(outcome.translated.query, "climate resilience");
    assert_eq!(outcome.translated.filters.year_from.as_deref(), Some("2019"));
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].title, "Climate Resilience in Urban Planning");
    assert_eq!(
        outcome.summary_markdown.as_deref(),
        Some("**Summary**: one highly relevant article.")
    );
}

#[tokio::test]
async fn test_vufind_pipeline_applies_user_facets() {
    let mut server = Server::new_async().await;

    mock_ai(
        &mut server,
        "{\"lookfor\": \"urban planning\", \"filters\": {\"language\": \"eng\"}}",
        "Summary text.",
    )
    .await;

    // The user-selected language must override the AI's "eng"
    let discovery_mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("lookfor".into(), "urban planning".into()),
            Matcher::UrlEncoded("filter[]".into(), "language::German".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "records": [{ "title": "Stadtplanung", "author": "Muster, Max", "date": "2020" }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let ai = Arc::new(AiClient::new(&ai_settings(&server.url())));
    let vufind = Arc::new(VuFindClient::new(&VuFindSettings {
        endpoint: format!("{}/api/search", server.url()),
    }));

    let pipeline = SearchPipeline::new(ai, vufind, 10);
    let user_filters = QueryFilters {
        language: Some("German".to_string()),
        ..Default::default()
    };

    let outcome = pipeline
        .run("urban planning", user_filters)
        .await
        .expect("pipeline should succeed");

    discovery_mock.assert_async().await;

    assert_eq!(outcome.translated.filters.language.as_deref(), Some("German"));
    assert_eq!(outcome.records[0].title, "Stadtplanung");
}

#[tokio::test]
async fn test_pipeline_degrades_when_ai_is_down() {
    let mut server = Server::new_async().await;

    // Every chat completion fails
    server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream error")
        .create_async()
        .await;

    server
        .mock("GET", "/primo/v1/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(primo_docs().to_string())
        .create_async()
        .await;

    let ai = Arc::new(AiClient::new(&ai_settings(&server.url())));
    let primo = Arc::new(PrimoClient::new(&PrimoSettings {
        endpoint: format!("{}/primo/v1/search", server.url()),
        api_key: None,
        scope: None,
        tab: None,
        vid: None,
    }));

    let pipeline = SearchPipeline::new(ai, primo, 10);
    let outcome = pipeline
        .run("recent articles on climate resilience", QueryFilters::default())
        .await
        .expect("pipeline should degrade, not fail");

    // Translation fell back to the raw query, summary was dropped
    assert_eq!(outcome.translated.query, "recent articles on climate resilience");
    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.summary_markdown.is_none());
}

#[tokio::test]
async fn test_pipeline_surfaces_discovery_failure() {
    let mut server = Server::new_async().await;

    mock_ai(&mut server, "{\"q\": \"cats\"}", "unused").await;

    server
        .mock("GET", "/primo/v1/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let ai = Arc::new(AiClient::new(&ai_settings(&server.url())));
    let primo = Arc::new(PrimoClient::new(&PrimoSettings {
        endpoint: format!("{}/primo/v1/search", server.url()),
        api_key: None,
        scope: None,
        tab: None,
        vid: None,
    }));

    let pipeline = SearchPipeline::new(ai, primo, 10);
    let result = pipeline.run("cats", QueryFilters::default()).await;

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("503"), "unexpected error: {}", message);
}

fn primo_state(server: &ServerGuard) -> AppState<PrimoClient> {
    let ai = Arc::new(AiClient::new(&ai_settings(&server.url())));
    let primo = Arc::new(PrimoClient::new(&PrimoSettings {
        endpoint: format!("{}/primo/v1/search", server.url()),
        api_key: None,
        scope: None,
        tab: None,
        vid: None,
    }));

    AppState {
        pipeline: Arc::new(SearchPipeline::new(ai, primo, 10)),
        style: PageStyle::primo(),
    }
}

#[actix_web::test]
async fn test_health_endpoint() {
    let server = Server::new_async().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(primo_state(&server)))
            .configure(configure_routes::<PrimoClient>),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let response: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(response.status, "healthy");
    assert_eq!(response.backend, "primo");
}

#[actix_web::test]
async fn test_index_page_serves_form() {
    let server = Server::new_async().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(primo_state(&server)))
            .configure(configure_routes::<PrimoClient>),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Primo AI Search Frontend"));
    assert!(html.contains("name=\"nl\""));
}

#[actix_web::test]
async fn test_search_form_empty_query_redirects() {
    let server = Server::new_async().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(primo_state(&server)))
            .configure(configure_routes::<PrimoClient>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/search")
        .set_form(&[("nl", "   ")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(resp.headers().get("location").unwrap(), "/");
}

#[actix_web::test]
async fn test_api_search_validates_empty_query() {
    let server = Server::new_async().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(primo_state(&server)))
            .configure(configure_routes::<PrimoClient>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/search")
        .set_json(json!({ "query": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_api_search_returns_results() {
    let mut server = Server::new_async().await;

    mock_ai(&mut server, "{\"q\": \"climate resilience\"}", "A short summary.").await;

    server
        .mock("GET", "/primo/v1/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(primo_docs().to_string())
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(primo_state(&server)))
            .configure(configure_routes::<PrimoClient>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/search")
        .set_json(json!({ "query": "recent articles on climate resilience" }))
        .to_request();
    let response: SearchApiResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(response.result_count, 1);
    assert_eq!(response.results[0].title, "Climate Resilience in Urban Planning");
    assert_eq!(response.translated.query, "climate resilience");
    assert_eq!(response.summary.as_deref(), Some("A short summary."));
}

use crate::core::SearchPipeline;
use crate::models::{ErrorResponse, HealthResponse, SearchApiRequest, SearchApiResponse, SearchForm};
use crate::services::DiscoveryClient;
use crate::web::page::{render_error, render_index, render_results, PageStyle};
use actix_web::{http::header, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
pub struct AppState<C: DiscoveryClient> {
    pub pipeline: Arc<SearchPipeline<C>>,
    pub style: PageStyle,
}

impl<C: DiscoveryClient> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            style: self.style,
        }
    }
}

/// Configure the browser-facing routes
pub fn configure_pages<C: DiscoveryClient + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index::<C>))
        .route("/search", web::post().to(search_form::<C>))
        .route("/health", web::get().to(health::<C>));
}

/// Configure the JSON API routes (mounted under /api/v1 by the caller)
pub fn configure_api<C: DiscoveryClient + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::post().to(search_api::<C>));
}

/// Search form page
async fn index<C: DiscoveryClient>(state: web::Data<AppState<C>>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_index(&state.style))
}

/// Health check endpoint
async fn health<C: DiscoveryClient>(state: web::Data<AppState<C>>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.pipeline.backend_name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Browser search endpoint
///
/// POST /search (form-encoded: nl, plus optional facet fields)
///
/// An empty query redirects back to the form, mirroring the original
/// front-ends. Discovery failures render an error page.
async fn search_form<C: DiscoveryClient>(
    state: web::Data<AppState<C>>,
    form: web::Form<SearchForm>,
) -> impl Responder {
    let nl_query = form.nl.trim();
    if nl_query.is_empty() {
        return HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/"))
            .finish();
    }

    tracing::info!("Search request ({} chars)", nl_query.len());

    match state.pipeline.run(nl_query, form.facet_filters()).await {
        Ok(outcome) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render_results(&state.style, &outcome)),
        Err(e) => {
            tracing::error!("Search failed: {}", e);
            HttpResponse::BadGateway()
                .content_type("text/html; charset=utf-8")
                .body(render_error(
                    &state.style,
                    &format!("Search failed: {}", e),
                ))
        }
    }
}

/// JSON search endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "query": "string",
///   "filters": {"language": "eng", "year_from": "2019"}
/// }
/// ```
async fn search_api<C: DiscoveryClient>(
    state: web::Data<AppState<C>>,
    req: web::Json<SearchApiRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.pipeline.run(req.query.trim(), req.filters.clone()).await {
        Ok(outcome) => {
            let response = SearchApiResponse {
                query: outcome.query,
                translated: outcome.translated,
                result_count: outcome.records.len(),
                results: outcome.records,
                summary: outcome.summary_markdown,
            };

            tracing::info!(
                "Returning {} results from {}",
                response.result_count,
                state.pipeline.backend_name()
            );

            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            tracing::error!("Search failed: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Search failed".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_shape() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            backend: "primo".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
        assert_eq!(response.backend, "primo");
    }
}

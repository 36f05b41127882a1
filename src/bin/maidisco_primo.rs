use maidisco::config::Settings;
use maidisco::core::SearchPipeline;
use maidisco::routes::AppState;
use maidisco::server;
use maidisco::services::{AiClient, PrimoClient};
use maidisco::web::PageStyle;
use std::sync::Arc;
use tracing::{error, info};

const DEFAULT_MAX_RESULTS: usize = 10;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    server::init_tracing();

    info!("Starting maidisco Primo front-end...");

    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    let ai = Arc::new(AiClient::new(&settings.ai));
    let primo = Arc::new(PrimoClient::new(&settings.primo));

    info!("AI and Primo clients initialized (model: {})", settings.ai.model);

    let max_results = settings.search.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    let pipeline = Arc::new(SearchPipeline::new(ai, primo, max_results));

    let state = AppState {
        pipeline,
        style: PageStyle::primo(),
    };

    server::run(&settings.server_primo, state).await
}

use maidisco::config::Settings;
use maidisco::core::SearchPipeline;
use maidisco::routes::AppState;
use maidisco::server;
use maidisco::services::{AiClient, VuFindClient};
use maidisco::web::PageStyle;
use std::sync::Arc;
use tracing::{error, info};

const DEFAULT_MAX_RESULTS: usize = 10;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    server::init_tracing();

    info!("Starting maidisco VuFind front-end...");

    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    let ai = Arc::new(AiClient::new(&settings.ai));
    let vufind = Arc::new(VuFindClient::new(&settings.vufind));

    info!("AI and VuFind clients initialized (model: {})", settings.ai.model);

    let max_results = settings.search.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    let pipeline = Arc::new(SearchPipeline::new(ai, vufind, max_results));

    let state = AppState {
        pipeline,
        style: PageStyle::vufind(),
    };

    server::run(&settings.server_vufind, state).await
}

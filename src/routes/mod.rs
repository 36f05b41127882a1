// Route exports
pub mod search;

use crate::services::DiscoveryClient;
use actix_web::web;

pub use search::AppState;

pub fn configure_routes<C: DiscoveryClient + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.configure(search::configure_pages::<C>)
        .service(web::scope("/api/v1").configure(search::configure_api::<C>));
}

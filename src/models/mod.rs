// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{QueryFilters, SearchRecord, TranslatedQuery};
pub use requests::{SearchApiRequest, SearchForm};
pub use responses::{ErrorResponse, HealthResponse, SearchApiResponse};

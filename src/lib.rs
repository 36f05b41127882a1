//! maidisco - AI-assisted search front-ends for library discovery systems
//!
//! Two web front-ends (Primo, VuFind) that translate natural-language search
//! queries into discovery-system parameters with an LLM call, run the search
//! against the external discovery API, normalize the results, and summarize
//! them with a second LLM call.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod web;

// Re-export commonly used types
pub use config::Settings;
pub use core::{parse_translated, strip_code_fences, SearchOutcome, SearchPipeline};
pub use models::{QueryFilters, SearchRecord, TranslatedQuery};
pub use services::{AiClient, DiscoveryClient, PrimoClient, VuFindClient};

// Service exports
pub mod ai;
pub mod discovery;
pub mod primo;
pub mod vufind;

pub use ai::{AiClient, AiError, QueryDialect};
pub use discovery::{DiscoveryClient, DiscoveryError};
pub use primo::PrimoClient;
pub use vufind::VuFindClient;

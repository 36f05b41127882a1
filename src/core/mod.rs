// Core pipeline exports
pub mod pipeline;
pub mod translate;

pub use pipeline::{SearchOutcome, SearchPipeline};
pub use translate::{parse_translated, strip_code_fences};

// HTML rendering exports
pub mod page;

pub use page::{escape_html, markdown_to_html, render_error, render_index, render_results, PageStyle};

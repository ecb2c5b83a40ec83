pub mod config;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_urls_from_file, merge_edit, parse_category_arg, parse_url_line};

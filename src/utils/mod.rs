pub mod base64;
pub mod file;
pub mod http;
pub mod string;
pub mod url;

// Re-export common utilities
pub use string::{is_truthy_flag, non_empty, parse_leading_int, yaml_single_quote};
pub use url::{first_param, parse_query, url_decode};

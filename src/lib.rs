pub mod error;
pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod settings;
pub mod template;
pub mod utils;

// Re-export the main proxy types for easier access
pub use error::{ConvertError, TemplateError};
pub use models::{ProxyKind, ProxyRecord};

// Re-export the conversion entry points
pub use interfaces::convert_links;
pub use settings::Settings;

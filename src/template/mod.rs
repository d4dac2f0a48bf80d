//! Config templates: the catalog they come from and the merge step that
//! drops a rendered `proxies:` block into them.

pub mod catalog;
pub mod merge;

pub use catalog::{TemplateCatalog, TemplateEntry, TemplateSource};
pub use merge::merge_template_with_proxies;

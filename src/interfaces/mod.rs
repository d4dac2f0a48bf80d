pub mod linkconv;

pub use linkconv::{convert_links, records_from_json, records_to_json, render_records};

pub mod explodes;

pub use explodes::{explode, explode_links, explode_text};

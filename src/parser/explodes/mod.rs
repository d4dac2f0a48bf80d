//! Share-link parsers, one per dialect, plus the scheme dispatcher

mod common;
pub mod hysteria2;
pub mod ss;
pub mod trojan;
pub mod vless;
pub mod vmess;

pub use common::{explode, explode_links, explode_text};

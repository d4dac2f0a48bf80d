//! Core data models for the application
//!
//! This module contains the normalized proxy records produced by the link
//! parsers and consumed by the YAML generator, separated from the logic
//! that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use mihomo_linkconv::models::{ProxyKind, ProxyRecord};
//! use mihomo_linkconv::parser::explodes::explode;
//!
//! let record = explode("trojan://secret@example.com:443#Home").unwrap();
//! assert_eq!(record.kind(), ProxyKind::Trojan);
//! assert_eq!(record.name(), "Home");
//! ```

mod proxy;
mod transport;

pub use proxy::*;
pub use transport::*;

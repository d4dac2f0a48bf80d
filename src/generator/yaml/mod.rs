//! YAML output for the mihomo `proxies:` section

mod proxy_output;
mod writer;

pub use proxy_output::{build_proxies_yaml, proxy_to_yaml};

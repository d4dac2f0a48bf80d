pub mod yaml;

pub use yaml::{build_proxies_yaml, proxy_to_yaml};

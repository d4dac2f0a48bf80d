use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::error::TemplateError;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT: u64 = 15;

/// Fetches a URL and returns the response body as text
///
/// # Arguments
/// * `url` - The URL to request
///
/// # Returns
/// * `Ok(String)` - The response body
/// * `Err(TemplateError)` - Transport failure or a non-success status
pub fn web_get(url: &str) -> Result<String, TemplateError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT))
        .user_agent(concat!("mihomo-linkconv/", env!("CARGO_PKG_VERSION")))
        .build()?;

    debug!("Fetching {}", url);
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(TemplateError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text()?)
}

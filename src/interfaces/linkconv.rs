//! End-to-end conversion: share links in, merged mihomo config out.

use std::str::FromStr;

use log::info;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConvertError, Result};
use crate::generator::build_proxies_yaml;
use crate::models::{ProxyKind, ProxyRecord};
use crate::parser::explode_text;
use crate::template::merge_template_with_proxies;

/// Convert a newline-separated block of share links and merge the result
/// into `template_text`.
///
/// Any malformed or unsupported line fails the whole batch; input holding
/// no links at all is [`ConvertError::EmptyInput`].
pub fn convert_links(links_text: &str, template_text: &str) -> Result<String> {
    let records = explode_text(links_text)?;
    if records.is_empty() {
        return Err(ConvertError::EmptyInput);
    }
    info!("Parsed {} proxies", records.len());
    Ok(render_records(&records, template_text))
}

/// Render already-parsed records and merge them into `template_text`.
pub fn render_records(records: &[ProxyRecord], template_text: &str) -> String {
    merge_template_with_proxies(template_text, &build_proxies_yaml(records))
}

/// Pretty-printed JSON array of records, tagged by `type`.
pub fn records_to_json(records: &[ProxyRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| ConvertError::InvalidRecords(e.to_string()))
}

/// Read records back from the JSON produced by [`records_to_json`].
///
/// Every element's `type` tag is checked first, so an unknown kind is
/// reported as [`ConvertError::UnknownProxyKind`] rather than a generic
/// decoding error.
pub fn records_from_json(json: &str) -> Result<Vec<ProxyRecord>> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ConvertError::InvalidRecords(e.to_string()))?;
    let items = value
        .as_array()
        .ok_or_else(|| ConvertError::InvalidRecords("expected a JSON array".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let kind = item
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ConvertError::InvalidRecords(format!("record {} has no type", index))
                })?;
            ProxyKind::from_str(kind)?;
            ProxyRecord::deserialize(item).map_err(|e| {
                ConvertError::InvalidRecords(format!("record {}: {}", index, e))
            })
        })
        .collect()
}

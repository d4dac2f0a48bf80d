//! Splice a rendered `proxies:` block into a host config document.
//!
//! The host text is never parsed as YAML: section boundaries are found by
//! plain substring search for top-level key literals, so documents that are
//! not valid YAML still merge as long as the markers are there.

use log::debug;

const PROXIES_MARKER: &str = "proxies:";

/// Sections that may follow an existing `proxies:` block.
const BLOCK_END_MARKERS: [&str; 7] = [
    "proxy-providers:",
    "proxy-groups:",
    "rule-providers:",
    "rules:",
    "sniffer:",
    "dns:",
    "tun:",
];

/// Sections a new `proxies:` block is inserted before, in priority order.
const INSERT_BEFORE_MARKERS: [&str; 7] = [
    "proxy-groups:",
    "proxy-providers:",
    "rule-providers:",
    "rules:",
    "sniffer:",
    "dns:",
    "tun:",
];

/// Merge `proxies_yaml` into `template`.
///
/// * An existing `proxies:` block is replaced up to the next known section
///   (or the end of the document).
/// * Otherwise the block goes right before the first known section found.
/// * Otherwise it is appended after a blank line.
///
/// The result always ends with a newline.
pub fn merge_template_with_proxies(template: &str, proxies_yaml: &str) -> String {
    if let Some(proxies_idx) = template.find(PROXIES_MARKER) {
        let search_from = proxies_idx + 1;
        let end = BLOCK_END_MARKERS
            .iter()
            .filter_map(|marker| template[search_from..].find(marker))
            .map(|i| i + search_from)
            .min()
            .unwrap_or(template.len());
        debug!("Replacing proxies block at {}..{}", proxies_idx, end);
        return splice(&template[..proxies_idx], proxies_yaml, &template[end..]);
    }

    let insert_at = INSERT_BEFORE_MARKERS
        .iter()
        .find_map(|marker| template.find(marker));
    if let Some(insert_at) = insert_at {
        debug!("Inserting proxies block at {}", insert_at);
        return splice(&template[..insert_at], proxies_yaml, &template[insert_at..]);
    }

    debug!("No known section in template, appending proxies block");
    splice(template, proxies_yaml, "")
}

/// Join trimmed non-empty pieces with blank lines. Trailing blank lines
/// collapse into a single final newline.
fn splice(before: &str, block: &str, after: &str) -> String {
    let mut merged = [before.trim_end(), block, after.trim_start()]
        .iter()
        .filter(|piece| !piece.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n");
    merged.truncate(merged.trim_end_matches('\n').len());
    merged.push('\n');
    merged
}

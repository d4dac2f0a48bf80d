//! URL encoding/decoding utilities

use linked_hash_map::LinkedHashMap;

/// Decodes a URL-encoded string
///
/// # Arguments
/// * `input` - The URL-encoded string to decode
///
/// # Returns
/// * String containing the decoded input
/// * Returns the original string if decoding fails
///
/// # Examples
/// ```
/// use mihomo_linkconv::utils::url::url_decode;
///
/// let decoded = url_decode("Hello%20World%21");
/// assert_eq!(decoded, "Hello World!");
/// ```
pub fn url_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Splits a raw query string into percent-decoded key/value pairs.
///
/// Pairs are separated by `&` and split on their first `=`; a pair with no
/// `=` gets an empty value. Keys are kept verbatim; a repeated key takes
/// the later value.
pub fn parse_query(query: &str) -> LinkedHashMap<String, String> {
    let mut params = LinkedHashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(key.to_string(), url_decode(value));
    }
    params
}

/// Returns the first key among `keys` whose value is present and non-empty.
pub fn first_param<'a>(
    params: &'a LinkedHashMap<String, String>,
    keys: &[&str],
) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| params.get(*k))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

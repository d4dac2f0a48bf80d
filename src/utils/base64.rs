use base64::alphabet;
use base64::engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_allow_trailing_bits(true)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Decodes a Base64 string to UTF-8 text.
///
/// Share links come with every flavour of Base64: padded or not, standard
/// or URL-safe alphabet, sometimes with non-zero trailing bits. Both
/// alphabets are tried with lenient padding; surrounding whitespace is
/// ignored.
///
/// # Returns
/// The decoded text, or `None` if no engine accepts the input or the bytes
/// are not valid UTF-8.
pub fn base64_decode(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    STANDARD_LENIENT
        .decode(input)
        .or_else(|_| URL_SAFE_LENIENT.decode(input))
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

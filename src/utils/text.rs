// src/utils/text.rs

use base64::{Engine, engine::general_purpose::STANDARD};

/// Normalizes one upstream text field.
///
/// `encoded` says whether the whole record arrived base64-encoded; it is
/// decided once per record (see [`is_base64_record`]) because short plain
/// words like "Type" or "Side" are themselves valid base64. HTML character
/// entities are always decoded.
pub fn normalize_field(input: &str, encoded: bool) -> String {
    let decoded = if encoded {
        decode_base64_field(input)
    } else {
        None
    };
    let text = decoded.as_deref().unwrap_or(input);
    html_escape::decode_html_entities(text).into_owned()
}

/// A record is treated as base64-encoded when its prompt decodes.
///
/// Plain-text prompts carry spaces and punctuation, so they never qualify.
pub fn is_base64_record(prompt: &str) -> bool {
    decode_base64_field(prompt).is_some()
}

/// Returns the decoded text when `input` is standard base64 (length a multiple
/// of 4) that decodes to printable UTF-8.
pub fn decode_base64_field(input: &str) -> Option<String> {
    if input.is_empty() || input.len() % 4 != 0 {
        return None;
    }

    let bytes = STANDARD.decode(input).ok()?;
    let text = String::from_utf8(bytes).ok()?;

    if text.chars().any(|c| c.is_control() && !c.is_whitespace()) {
        return None;
    }

    Some(text)
}

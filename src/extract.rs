//! Body decoding and text extraction from the message part tree.

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use log::warn;

use crate::gmail::types::MessagePart;

/// Decode a part's inline body. The API ships URL-safe base64 (padding is
/// inconsistent in practice, so both forms are accepted). Bytes that are not
/// valid UTF-8 come back as replacement characters; absent or malformed data
/// degrades to an empty string rather than an error.
pub fn decode_body(part: &MessagePart) -> String {
    let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) else {
        return String::new();
    };
    let bytes = match URL_SAFE
        .decode(data)
        .or_else(|_| URL_SAFE_NO_PAD.decode(data.trim_end_matches('=')))
    {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("skipping undecodable body data ({e})");
            return String::new();
        }
    };
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Collect every text/plain leaf in document order.
///
/// A root that is itself text/plain short-circuits to its own body. Otherwise
/// each direct child contributes either its leaf body (when text/plain) or
/// its own recursive extraction (when it has children); non-empty fragments
/// are joined with a newline. Returns an empty string when the tree holds no
/// text/plain leaf at all.
pub fn extract_text(part: &MessagePart) -> String {
    if part.mime_type == "text/plain" {
        return decode_body(part);
    }
    let mut fragments: Vec<String> = Vec::new();
    for child in part.parts.as_deref().unwrap_or_default() {
        if child.mime_type == "text/plain" {
            let text = decode_body(child);
            if !text.is_empty() {
                fragments.push(text);
            }
        } else if child.parts.as_ref().is_some_and(|p| !p.is_empty()) {
            let nested = extract_text(child);
            if !nested.is_empty() {
                fragments.push(nested);
            }
        }
    }
    fragments.join("\n")
}

/// Raw markup of the first direct text/html child, for callers that opted
/// into the fallback. Deliberately not recursive and with no HTML-to-text
/// conversion.
pub fn html_fallback(part: &MessagePart) -> String {
    part.parts
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|child| child.mime_type == "text/html")
        .map(decode_body)
        .unwrap_or_default()
}

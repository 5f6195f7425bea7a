//! Header normalization: case-insensitive lookup, RFC 2047 decoding, and
//! address-list rendering.

use std::collections::HashMap;

use mailparse::MailAddr;

use crate::gmail::types::Header;

/// Lower-cased name -> raw value; the last occurrence of a repeated name
/// wins, matching the provider's own precedence for duplicate headers.
pub fn header_map(headers: &[Header]) -> HashMap<String, String> {
    headers
        .iter()
        .map(|h| (h.name.to_lowercase(), h.value.clone()))
        .collect()
}

/// Decode RFC 2047 encoded-words in a raw header value.
///
/// mailparse wants a full "Key: value" line, so one is synthesized around
/// the value. Falls back to the raw string when parsing fails.
pub fn decode_value(raw: &str) -> String {
    let mut line = b"X: ".to_vec();
    line.extend_from_slice(raw.as_bytes());
    line.extend_from_slice(b"\r\n");

    match mailparse::parse_header(&line) {
        Ok((h, _idx)) => h.get_value(),
        Err(_) => raw.to_string(),
    }
}

/// Render an address-list header value as `"Name <addr>"` entries joined by
/// `", "`; entries without a display name render as the bare address. Empty
/// input yields an empty string; input the address grammar rejects is
/// returned unchanged rather than dropped.
pub fn format_addresses(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let parsed = match mailparse::addrparse(raw) {
        Ok(list) => list,
        Err(_) => return raw.to_string(),
    };

    let mut entries: Vec<String> = Vec::new();
    for addr in parsed.iter() {
        match addr {
            MailAddr::Single(info) => entries.push(render_single(
                info.display_name.as_deref(),
                &info.addr,
            )),
            MailAddr::Group(group) => {
                for info in &group.addrs {
                    entries.push(render_single(info.display_name.as_deref(), &info.addr));
                }
            }
        }
    }
    entries.join(", ")
}

fn render_single(display_name: Option<&str>, addr: &str) -> String {
    match display_name {
        Some(name) if !name.is_empty() => format!("{name} <{addr}>"),
        _ => addr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hdr(name: &str, value: &str) -> Header {
        Header {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn map_lowercases_names() {
        let map = header_map(&[hdr("Subject", "Hi"), hdr("FROM", "a@b.com")]);
        assert_eq!(map.get("subject").unwrap(), "Hi");
        assert_eq!(map.get("from").unwrap(), "a@b.com");
    }

    #[test]
    fn map_last_duplicate_wins() {
        let map = header_map(&[hdr("Received", "first"), hdr("received", "second")]);
        assert_eq!(map.get("received").unwrap(), "second");
    }

    #[test]
    fn formats_mixed_address_list() {
        assert_eq!(
            format_addresses("Alice <a@x.com>, b@y.com"),
            "Alice <a@x.com>, b@y.com"
        );
    }

    #[test]
    fn formats_empty_as_empty() {
        assert_eq!(format_addresses(""), "");
        assert_eq!(format_addresses("   "), "");
    }

    #[test]
    fn bare_address_stays_bare() {
        assert_eq!(format_addresses("user@example.com"), "user@example.com");
    }

    #[test]
    fn quoted_display_name_with_comma() {
        assert_eq!(
            format_addresses(r#""Last, First" <a@b.com>, other@c.com"#),
            "Last, First <a@b.com>, other@c.com"
        );
    }

    #[test]
    fn decodes_encoded_words() {
        assert_eq!(
            decode_value("=?UTF-8?B?SsO8cmdlbg==?= <j@example.de>"),
            "Jürgen <j@example.de>"
        );
        assert_eq!(decode_value("plain subject"), "plain subject");
    }
}

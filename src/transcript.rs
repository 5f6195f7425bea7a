//! Assembles fetched threads into one plain-text document.

use log::info;

use crate::extract::{extract_text, html_fallback};
use crate::gmail::types::{Message, Thread};
use crate::gmail::{ApiError, GmailApi};
use crate::headers::{decode_value, format_addresses, header_map};

const SEPARATOR_WIDTH: usize = 72;
const EMPTY_BODY_PLACEHOLDER: &str = "[no text/plain body]";

/// Fetch each resolved thread in order and render the whole document:
/// blocks joined by newlines, surrounding whitespace trimmed, one trailing
/// newline. Threads are fetched strictly one at a time.
pub fn assemble(
    api: &dyn GmailApi,
    thread_ids: &[String],
    use_html_fallback: bool,
) -> Result<String, ApiError> {
    let total = thread_ids.len();
    let mut lines: Vec<String> = Vec::new();

    for (index, thread_id) in thread_ids.iter().enumerate() {
        let thread = api.thread(thread_id)?;
        info!(
            "thread {} ({} message(s))",
            thread.id,
            thread.messages.len()
        );
        if total > 1 {
            lines.push(format!("[Thread {}/{}: {}]", index + 1, total, thread.id));
        }
        lines.extend(thread_lines(&thread, use_html_fallback));
    }

    Ok(format!("{}\n", lines.join("\n").trim()))
}

fn thread_lines(thread: &Thread, use_html_fallback: bool) -> Vec<String> {
    thread
        .messages
        .iter()
        .flat_map(|msg| message_lines(msg, use_html_fallback))
        .collect()
}

/// One message block: separator, the four fixed header lines, a blank line,
/// then the body (or the placeholder).
fn message_lines(msg: &Message, use_html_fallback: bool) -> Vec<String> {
    let headers = msg
        .payload
        .as_ref()
        .and_then(|p| p.headers.as_deref())
        .map(header_map)
        .unwrap_or_default();
    let raw = |name: &str| headers.get(name).cloned().unwrap_or_default();

    let mut lines = vec![
        "=".repeat(SEPARATOR_WIDTH),
        format!("From: {}", format_addresses(&decode_value(&raw("from")))),
        format!("To: {}", format_addresses(&decode_value(&raw("to")))),
        format!("Date: {}", raw("date")),
        format!("Subject: {}", decode_value(&raw("subject"))),
        String::new(),
    ];

    let mut body = msg
        .payload
        .as_ref()
        .map(|p| extract_text(p).trim().to_string())
        .unwrap_or_default();
    if body.is_empty() && use_html_fallback {
        body = msg
            .payload
            .as_ref()
            .map(|p| html_fallback(p).trim().to_string())
            .unwrap_or_default();
    }
    if body.is_empty() {
        body = EMPTY_BODY_PLACEHOLDER.to_string();
    }
    lines.push(body);
    lines
}

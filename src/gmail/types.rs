//! Serde models for the Gmail API wire shapes (threads.get format=full).

use serde::{Deserialize, Serialize};

/// One conversation as grouped by Gmail; messages arrive in provider order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub internal_date: Option<String>,
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

/// A node in the message body tree. The root payload and nested parts share
/// the same shape; a part is a leaf when `body.data` is set, a container when
/// `parts` is non-empty (container form wins when both are present).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    #[serde(default)]
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Option<Vec<MessagePart>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    #[serde(default)]
    pub attachment_id: Option<String>,
    #[serde(default)]
    pub size: u64,
    /// URL-safe base64, as documented by the API.
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Minimal view returned by messages.get with format=metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    pub thread_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadListResponse {
    #[serde(default)]
    pub threads: Option<Vec<ThreadRef>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_format_thread() {
        let json = r#"{
            "id": "thr_001",
            "messages": [
                {
                    "id": "msg_001",
                    "threadId": "thr_001",
                    "snippet": "Hello…",
                    "internalDate": "1731401723000",
                    "payload": {
                        "mimeType": "multipart/alternative",
                        "headers": [
                            {"name": "From", "value": "Alice <alice@example.com>"},
                            {"name": "Subject", "value": "Hi"}
                        ],
                        "parts": [
                            {
                                "mimeType": "text/plain",
                                "body": {"size": 5, "data": "SGVsbG8="}
                            },
                            {
                                "mimeType": "text/html",
                                "body": {"size": 12, "data": "PGI-SGVsbG88L2I-"}
                            }
                        ]
                    }
                }
            ]
        }"#;
        let thread: Thread = serde_json::from_str(json).unwrap();
        assert_eq!(thread.id, "thr_001");
        assert_eq!(thread.messages.len(), 1);
        let payload = thread.messages[0].payload.as_ref().unwrap();
        assert_eq!(payload.mime_type, "multipart/alternative");
        assert_eq!(payload.parts.as_ref().unwrap().len(), 2);
        assert_eq!(payload.headers.as_ref().unwrap()[0].name, "From");
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id": "m1"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert!(msg.payload.is_none());
        assert!(msg.snippet.is_none());
    }

    #[test]
    fn thread_list_without_matches() {
        let resp: ThreadListResponse = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(resp.threads.is_none());
    }
}

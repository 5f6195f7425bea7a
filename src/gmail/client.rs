//! Blocking Gmail REST client. One request at a time, no retries; the first
//! upstream failure is terminal for the run.

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;

use crate::gmail::types::{MessageRef, Thread, ThreadListResponse};

const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gmail api returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// True for 4xx responses, i.e. the request itself was rejected rather
    /// than the upstream being unavailable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if status.is_client_error())
    }
}

/// Seam between the resolver/assembler and the network, so both can be
/// exercised against stubs.
pub trait GmailApi {
    /// Full nested structure of one thread (format=full).
    fn thread(&self, thread_id: &str) -> Result<Thread, ApiError>;

    /// Owning thread id of a message (format=metadata).
    fn owning_thread_id(&self, message_id: &str) -> Result<String, ApiError>;

    /// Thread ids matching a search query, capped at `max`, in search order.
    fn search_thread_ids(&self, query: &str, max: u32) -> Result<Vec<String>, ApiError>;
}

pub struct GmailClient {
    http: Client,
    access_token: String,
    base_url: String,
}

impl GmailClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .bearer_auth(&self.access_token)
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

impl GmailApi for GmailClient {
    fn thread(&self, thread_id: &str) -> Result<Thread, ApiError> {
        self.get_json(
            &format!("users/me/threads/{thread_id}"),
            &[("format", "full".to_string())],
        )
    }

    fn owning_thread_id(&self, message_id: &str) -> Result<String, ApiError> {
        let msg: MessageRef = self.get_json(
            &format!("users/me/messages/{message_id}"),
            &[("format", "metadata".to_string())],
        )?;
        Ok(msg.thread_id)
    }

    fn search_thread_ids(&self, query: &str, max: u32) -> Result<Vec<String>, ApiError> {
        let resp: ThreadListResponse = self.get_json(
            "users/me/threads",
            &[
                ("q", query.to_string()),
                ("maxResults", max.to_string()),
            ],
        )?;
        Ok(resp
            .threads
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.id)
            .collect())
    }
}

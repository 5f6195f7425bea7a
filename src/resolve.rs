//! Turns the user's selector (thread id, message id, Gmail URL, or search
//! query) into the concrete thread ids to fetch.

use log::debug;
use thiserror::Error;
use url::Url;

use crate::gmail::{ApiError, GmailApi};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("nothing to fetch: pass --thread-id, --message-id, --url or --query")]
    MissingSelector,

    #[error("no threads found for query {query:?}")]
    NoMatches { query: String },

    #[error(
        "Gmail rejected {id:?} as a message id. Ids taken from the web UI url are \
         not always API message ids; try --thread-id with an id from the API, or \
         --query (e.g. --query 'subject:\"...\"') to search instead"
    )]
    InvalidMessageId {
        id: String,
        #[source]
        source: ApiError,
    },

    #[error("could not extract a message id from url {0:?}")]
    BadUrl(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// At most one selector is acted on, in fixed precedence order; the explicit
/// thread id short-circuits everything else.
#[derive(Debug, Default, Clone)]
pub struct Selector {
    pub thread_id: Option<String>,
    pub message_id: Option<String>,
    pub url: Option<String>,
    pub query: Option<String>,
}

impl Selector {
    pub fn is_empty(&self) -> bool {
        self.thread_id.is_none()
            && self.message_id.is_none()
            && self.url.is_none()
            && self.query.is_none()
    }

    /// Usage check, callable before any network or auth work.
    pub fn require_any(&self) -> Result<(), ResolveError> {
        if self.is_empty() {
            Err(ResolveError::MissingSelector)
        } else {
            Ok(())
        }
    }
}

/// Resolve the selector to one or more thread ids.
///
/// Precedence: thread id, then message id (explicit or from a URL), then
/// query. A query returning zero matches fails before any thread fetch.
/// With `expand` set, a query yields up to `max` ids in search order;
/// otherwise only the first match.
pub fn resolve(
    api: &dyn GmailApi,
    selector: &Selector,
    max: u32,
    expand: bool,
) -> Result<Vec<String>, ResolveError> {
    if let Some(id) = &selector.thread_id {
        return Ok(vec![id.clone()]);
    }

    let message_id = match (&selector.message_id, &selector.url) {
        (Some(id), _) => Some(id.clone()),
        (None, Some(url)) => Some(message_id_from_url(url)?),
        (None, None) => None,
    };
    if let Some(id) = message_id {
        debug!("resolving owning thread of message {id}");
        return match api.owning_thread_id(&id) {
            Ok(thread_id) => Ok(vec![thread_id]),
            Err(e) if e.is_rejection() => Err(ResolveError::InvalidMessageId { id, source: e }),
            Err(e) => Err(e.into()),
        };
    }

    if let Some(query) = &selector.query {
        debug!("searching threads for query {query:?}");
        let ids = api.search_thread_ids(query, max)?;
        if ids.is_empty() {
            return Err(ResolveError::NoMatches {
                query: query.clone(),
            });
        }
        let take = if expand { max.max(1) as usize } else { 1 };
        return Ok(ids.into_iter().take(take).collect());
    }

    Err(ResolveError::MissingSelector)
}

/// Trailing segment of a Gmail web URL. The web UI puts the message id at
/// the end of the fragment ("…/#inbox/<id>"); plain path URLs use the last
/// non-empty path segment.
fn message_id_from_url(raw: &str) -> Result<String, ResolveError> {
    let parsed = Url::parse(raw).map_err(|_| ResolveError::BadUrl(raw.to_string()))?;

    if let Some(fragment) = parsed.fragment()
        && let Some(seg) = fragment.rsplit('/').find(|s| !s.is_empty())
    {
        return Ok(seg.to_string());
    }

    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .map(|s| s.to_string())
        .ok_or_else(|| ResolveError::BadUrl(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gmail::types::Thread;
    use reqwest::StatusCode;
    use std::cell::RefCell;

    /// Records calls; answers from canned data.
    #[derive(Default)]
    struct StubApi {
        owning: Option<Result<String, StatusCode>>,
        search: Vec<String>,
        calls: RefCell<Vec<String>>,
    }

    impl GmailApi for StubApi {
        fn thread(&self, thread_id: &str) -> Result<Thread, ApiError> {
            self.calls.borrow_mut().push(format!("thread:{thread_id}"));
            Ok(Thread {
                id: thread_id.to_string(),
                messages: vec![],
            })
        }

        fn owning_thread_id(&self, message_id: &str) -> Result<String, ApiError> {
            self.calls.borrow_mut().push(format!("message:{message_id}"));
            match self.owning.clone().expect("unexpected owning_thread_id call") {
                Ok(id) => Ok(id),
                Err(status) => Err(ApiError::Status {
                    endpoint: format!("users/me/messages/{message_id}"),
                    status,
                    body: "{}".to_string(),
                }),
            }
        }

        fn search_thread_ids(&self, query: &str, _max: u32) -> Result<Vec<String>, ApiError> {
            self.calls.borrow_mut().push(format!("search:{query}"));
            Ok(self.search.clone())
        }
    }

    #[test]
    fn explicit_thread_id_short_circuits() {
        let api = StubApi::default();
        let selector = Selector {
            thread_id: Some("thr_9".to_string()),
            query: Some("should be ignored".to_string()),
            ..Default::default()
        };
        let ids = resolve(&api, &selector, 5, true).unwrap();
        assert_eq!(ids, vec!["thr_9".to_string()]);
        assert!(api.calls.borrow().is_empty(), "no api call expected");
    }

    #[test]
    fn message_id_maps_to_owning_thread() {
        let api = StubApi {
            owning: Some(Ok("thr_1".to_string())),
            ..Default::default()
        };
        let selector = Selector {
            message_id: Some("msg_1".to_string()),
            ..Default::default()
        };
        let ids = resolve(&api, &selector, 1, false).unwrap();
        assert_eq!(ids, vec!["thr_1".to_string()]);
        assert_eq!(api.calls.borrow().as_slice(), ["message:msg_1"]);
    }

    #[test]
    fn rejected_message_id_gets_actionable_error() {
        let api = StubApi {
            owning: Some(Err(StatusCode::BAD_REQUEST)),
            ..Default::default()
        };
        let selector = Selector {
            message_id: Some("bogus".to_string()),
            ..Default::default()
        };
        let err = resolve(&api, &selector, 1, false).unwrap_err();
        match err {
            ResolveError::InvalidMessageId { id, .. } => assert_eq!(id, "bogus"),
            other => panic!("expected InvalidMessageId, got {other:?}"),
        }
    }

    #[test]
    fn transient_failure_propagates_unmodified() {
        let api = StubApi {
            owning: Some(Err(StatusCode::INTERNAL_SERVER_ERROR)),
            ..Default::default()
        };
        let selector = Selector {
            message_id: Some("msg_1".to_string()),
            ..Default::default()
        };
        let err = resolve(&api, &selector, 1, false).unwrap_err();
        assert!(matches!(err, ResolveError::Api(_)));
    }

    #[test]
    fn empty_search_is_not_found_before_any_fetch() {
        let api = StubApi::default();
        let selector = Selector {
            query: Some("from:nobody".to_string()),
            ..Default::default()
        };
        let err = resolve(&api, &selector, 3, false).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatches { .. }));
        assert_eq!(api.calls.borrow().as_slice(), ["search:from:nobody"]);
    }

    #[test]
    fn query_without_expand_takes_first_match() {
        let api = StubApi {
            search: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        let selector = Selector {
            query: Some("meeting".to_string()),
            ..Default::default()
        };
        let ids = resolve(&api, &selector, 3, false).unwrap();
        assert_eq!(ids, vec!["a".to_string()]);
    }

    #[test]
    fn query_with_expand_takes_up_to_max() {
        let api = StubApi {
            search: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        let selector = Selector {
            query: Some("meeting".to_string()),
            ..Default::default()
        };
        let ids = resolve(&api, &selector, 2, true).unwrap();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn no_selector_is_a_usage_error() {
        let api = StubApi::default();
        let err = resolve(&api, &Selector::default(), 1, false).unwrap_err();
        assert!(matches!(err, ResolveError::MissingSelector));
        assert!(api.calls.borrow().is_empty());
    }

    #[test]
    fn url_fragment_yields_trailing_segment() {
        let id =
            message_id_from_url("https://mail.google.com/mail/u/0/#inbox/FMfcgzQbdrfW").unwrap();
        assert_eq!(id, "FMfcgzQbdrfW");
    }

    #[test]
    fn plain_path_url_yields_last_segment() {
        let id = message_id_from_url("https://mail.google.com/mail/u/0/msg_42").unwrap();
        assert_eq!(id, "msg_42");
    }

    #[test]
    fn unparseable_url_is_rejected() {
        assert!(matches!(
            message_id_from_url("not a url"),
            Err(ResolveError::BadUrl(_))
        ));
    }
}

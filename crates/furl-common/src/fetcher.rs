//! Post thread fetching: handle resolution, AT-URI construction and
//! post-URL parsing.

use std::sync::Arc;

use http::StatusCode;
use tracing::debug;
use url::Url;

use furl_api::feed::{self, GetPostThreadResponse};
use furl_api::identity::{self, ResolveHandleResponse};

use crate::client::{Transport, XrpcRequest};
use crate::error::Error;
use crate::session::SessionManager;

pub struct PostThreadFetcher<T> {
    session: Arc<SessionManager<T>>,
}

impl<T: Transport> PostThreadFetcher<T> {
    pub fn new(session: Arc<SessionManager<T>>) -> Self {
        Self { session }
    }

    /// Resolve a human-readable handle to its durable DID.
    pub async fn resolve_handle(&self, handle: &str) -> Result<String, Error> {
        debug!(handle, "resolving handle");

        let request = XrpcRequest::query(
            identity::RESOLVE_HANDLE,
            vec![("handle", handle.to_owned())],
        );
        let response = self.session.execute(request).await?;

        if response.status.is_success() {
            let resolved: ResolveHandleResponse = response.parse(identity::RESOLVE_HANDLE)?;
            return Ok(resolved.did);
        }
        if response.status.is_client_error() {
            return Err(Error::NotFound {
                what: format!("handle {handle}"),
            });
        }
        Err(Error::Upstream {
            status: Some(response.status),
            message: response.failure_message(),
        })
    }

    /// Fetch the thread of `at://{did}/app.bsky.feed.post/{rkey}`.
    pub async fn get_post_thread(
        &self,
        did: &str,
        rkey: &str,
    ) -> Result<GetPostThreadResponse, Error> {
        let uri = format!("at://{did}/{}/{rkey}", feed::POST_COLLECTION);
        debug!(%uri, "fetching post thread");

        let request = XrpcRequest::query(feed::GET_POST_THREAD, vec![("uri", uri.clone())]);
        let response = self.session.execute(request).await?;

        if response.status.is_success() {
            return response.parse(feed::GET_POST_THREAD);
        }

        let not_found = response.status == StatusCode::NOT_FOUND
            || response
                .error_envelope()
                .is_some_and(|envelope| envelope.error == "NotFound");
        if response.status.is_client_error() && not_found {
            return Err(Error::NotFound {
                what: format!("post {uri}"),
            });
        }
        Err(Error::Upstream {
            status: Some(response.status),
            message: response.failure_message(),
        })
    }

    /// Unfurl entrypoint: `…/profile/<handle>/post/<rkey>` → thread.
    pub async fn thread_for_url(&self, url: &str) -> Result<GetPostThreadResponse, Error> {
        let (handle, rkey) = parse_post_url(url)?;
        let did = self.resolve_handle(&handle).await?;
        self.get_post_thread(&did, &rkey).await
    }
}

/// Extract the handle and post-id segments from a post URL of the form
/// `…/profile/<handle>/post/<rkey>`.
pub fn parse_post_url(url: &str) -> Result<(String, String), Error> {
    let invalid = |reason| Error::InvalidUrl {
        url: url.to_owned(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|_| invalid("not a valid url"))?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let profile = segments
        .iter()
        .position(|seg| *seg == "profile")
        .ok_or_else(|| invalid("missing profile segment"))?;

    let handle = segments
        .get(profile + 1)
        .copied()
        .filter(|seg| !seg.is_empty())
        .ok_or_else(|| invalid("missing handle segment"))?;
    if segments.get(profile + 2).copied() != Some("post") {
        return Err(invalid("missing post segment"));
    }
    let rkey = segments
        .get(profile + 3)
        .copied()
        .filter(|seg| !seg.is_empty())
        .ok_or_else(|| invalid("missing post id segment"))?;

    Ok((handle.to_owned(), rkey.to_owned()))
}

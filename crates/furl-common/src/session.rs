//! Authenticated session lifecycle against the Bluesky service.
//!
//! State machine: unauthenticated → authenticating → authenticated; an
//! unauthorized response while authenticated triggers a refresh, and a
//! failed refresh falls back to a full login with the stored credentials.
//! There is no terminal state; the manager lives for the process.
//!
//! Refresh is single-flight: concurrent callers that observe an expired
//! session serialize behind one gate, and every caller that loses the race
//! reuses the winner's session instead of issuing its own upstream call.

use http::StatusCode;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use url::Url;

use furl_api::session::{self, CreateSessionRequest, Session};

use crate::client::{Transport, XrpcRequest, XrpcResponse};
use crate::error::Error;

/// Login identity, supplied at construction and reused for every full
/// re-authentication.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The session slot. `epoch` increases on every replacement, which is how
/// a caller waiting on the gate detects that someone else already
/// refreshed on its behalf.
#[derive(Default)]
struct Slot {
    session: Option<Session>,
    epoch: u64,
}

pub struct SessionManager<T> {
    transport: T,
    service: Url,
    credentials: Credentials,
    slot: RwLock<Slot>,
    gate: Mutex<()>,
}

impl<T: Transport> SessionManager<T> {
    /// No upstream call happens here; the first caller that needs a
    /// session drives authentication.
    pub fn new(transport: T, service: Url, credentials: Credentials) -> Self {
        Self {
            transport,
            service,
            credentials,
            slot: RwLock::new(Slot::default()),
            gate: Mutex::new(()),
        }
    }

    /// Execute an authenticated request. On an expired access token the
    /// session is refreshed once (single-flight) and the request retried
    /// exactly once; a second unauthorized response is an auth failure.
    pub async fn execute(&self, request: XrpcRequest) -> Result<XrpcResponse, Error> {
        let (active, epoch) = self.current().await?;
        let response = self
            .transport
            .send(&self.service, &request, Some(&active.access_jwt))
            .await?;
        if !token_expired(&response) {
            return Ok(response);
        }

        debug!(nsid = request.nsid(), "access token expired, refreshing");
        let (active, _) = self.establish(epoch, true).await?;
        let response = self
            .transport
            .send(&self.service, &request, Some(&active.access_jwt))
            .await?;
        if token_expired(&response) {
            return Err(Error::Auth {
                message: format!("{} unauthorized after refresh", request.nsid()),
            });
        }
        Ok(response)
    }

    /// The current session, logging in first when none exists yet.
    async fn current(&self) -> Result<(Session, u64), Error> {
        let observed = {
            let slot = self.slot.read().await;
            if let Some(active) = &slot.session {
                return Ok((active.clone(), slot.epoch));
            }
            slot.epoch
        };
        self.establish(observed, false).await
    }

    /// Replace the session, serialized behind the gate. Callers pass the
    /// epoch they observed; whoever acquires the gate after the winner
    /// finds a newer epoch and reuses the fresh session.
    async fn establish(&self, observed: u64, refresh: bool) -> Result<(Session, u64), Error> {
        let _gate = self.gate.lock().await;

        let refresh_jwt = {
            let slot = self.slot.read().await;
            if slot.epoch != observed {
                if let Some(active) = &slot.session {
                    return Ok((active.clone(), slot.epoch));
                }
            }
            if refresh {
                slot.session.as_ref().map(|s| s.refresh_jwt.clone())
            } else {
                None
            }
        };

        let result = match refresh_jwt {
            Some(token) => self.refresh(&token).await,
            None => self.authenticate().await,
        };

        let mut slot = self.slot.write().await;
        slot.epoch += 1;
        match result {
            Ok(active) => {
                slot.session = Some(active.clone());
                Ok((active, slot.epoch))
            }
            Err(err) => {
                // Leave the slot empty so the next caller re-attempts
                // a full login rather than reusing dead tokens.
                slot.session = None;
                Err(err)
            }
        }
    }

    /// Exchange credentials for a fresh session. Upstream rejection is
    /// fatal for the operation and surfaced to the caller.
    async fn authenticate(&self) -> Result<Session, Error> {
        debug!(identifier = %self.credentials.identifier, "begin authentication");

        let body = serde_json::to_value(CreateSessionRequest {
            identifier: self.credentials.identifier.clone(),
            password: self.credentials.password.clone(),
        })
        .expect("session request serializes");
        let request = XrpcRequest::procedure_with(session::CREATE_SESSION, body);

        let response = self.transport.send(&self.service, &request, None).await?;
        if !response.status.is_success() {
            return Err(Error::Auth {
                message: response.failure_message(),
            });
        }

        let active: Session = response.parse(session::CREATE_SESSION)?;
        debug!(handle = %active.handle, "authentication complete");
        Ok(active)
    }

    /// Exchange the refresh token for a new session. Any failure, network
    /// error or non-success status alike, falls back to a full login,
    /// since a stale refresh token is recoverable that way.
    async fn refresh(&self, refresh_jwt: &str) -> Result<Session, Error> {
        debug!("begin session refresh");

        let request = XrpcRequest::procedure(session::REFRESH_SESSION);
        match self
            .transport
            .send(&self.service, &request, Some(refresh_jwt))
            .await
        {
            Ok(response) if response.status.is_success() => {
                let active: Session = response.parse(session::REFRESH_SESSION)?;
                debug!("session refresh complete");
                Ok(active)
            }
            Ok(response) => {
                warn!(
                    status = %response.status,
                    "session refresh rejected, re-authenticating"
                );
                self.authenticate().await
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed, re-authenticating");
                self.authenticate().await
            }
        }
    }
}

/// An expired access token shows up either as a 401 or as an
/// `ExpiredToken` error envelope on a non-success response.
fn token_expired(response: &XrpcResponse) -> bool {
    if response.status == StatusCode::UNAUTHORIZED {
        return true;
    }
    !response.status.is_success()
        && response
            .error_envelope()
            .is_some_and(|envelope| envelope.is_expired_token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TEST_NSID: &str = "app.bsky.feed.getPostThread";

    /// Scripted upstream: issues numbered token generations and accepts an
    /// authenticated call only for the newest access token at or above
    /// `valid_from`.
    struct MockTransport {
        create_calls: AtomicUsize,
        refresh_calls: AtomicUsize,
        issued: AtomicUsize,
        /// Token generations below this are treated as expired.
        valid_from: AtomicUsize,
        reject_credentials: bool,
        reject_refresh: bool,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                create_calls: AtomicUsize::new(0),
                refresh_calls: AtomicUsize::new(0),
                issued: AtomicUsize::new(0),
                valid_from: AtomicUsize::new(0),
                reject_credentials: false,
                reject_refresh: false,
            }
        }

        /// Every access token below generation `n` reads as expired.
        fn expire_below(self, n: usize) -> Self {
            self.valid_from.store(n, Ordering::SeqCst);
            self
        }

        fn reject_credentials(mut self) -> Self {
            self.reject_credentials = true;
            self
        }

        fn reject_refresh(mut self) -> Self {
            self.reject_refresh = true;
            self
        }

        fn issue(&self) -> XrpcResponse {
            let generation = self.issued.fetch_add(1, Ordering::SeqCst);
            let body = format!(
                r#"{{"accessJwt":"access-{generation}","refreshJwt":"refresh-{generation}","handle":"bot.example","did":"did:plc:bot"}}"#
            );
            ok(body)
        }

        fn generation_of(token: &str) -> Option<usize> {
            token.strip_prefix("access-").and_then(|g| g.parse().ok())
        }
    }

    fn ok(body: impl Into<Bytes>) -> XrpcResponse {
        XrpcResponse {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    fn status_with(status: StatusCode, body: &'static str) -> XrpcResponse {
        XrpcResponse {
            status,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    impl Transport for Arc<MockTransport> {
        async fn send(
            &self,
            _service: &Url,
            request: &XrpcRequest,
            bearer: Option<&str>,
        ) -> Result<XrpcResponse, Error> {
            match request.nsid() {
                session::CREATE_SESSION => {
                    self.create_calls.fetch_add(1, Ordering::SeqCst);
                    if self.reject_credentials {
                        return Ok(status_with(
                            StatusCode::UNAUTHORIZED,
                            r#"{"error":"AuthenticationRequired","message":"Invalid identifier or password"}"#,
                        ));
                    }
                    Ok(self.issue())
                }
                session::REFRESH_SESSION => {
                    self.refresh_calls.fetch_add(1, Ordering::SeqCst);
                    if self.reject_refresh {
                        return Ok(status_with(
                            StatusCode::BAD_REQUEST,
                            r#"{"error":"ExpiredToken","message":"refresh token expired"}"#,
                        ));
                    }
                    Ok(self.issue())
                }
                _ => {
                    let expired = bearer
                        .and_then(MockTransport::generation_of)
                        .map(|generation| generation < self.valid_from.load(Ordering::SeqCst))
                        .unwrap_or(true);
                    if expired {
                        Ok(status_with(
                            StatusCode::UNAUTHORIZED,
                            r#"{"error":"ExpiredToken","message":"Token has expired"}"#,
                        ))
                    } else {
                        Ok(ok(r#"{"ok":true}"#))
                    }
                }
            }
        }
    }

    fn manager(transport: Arc<MockTransport>) -> SessionManager<Arc<MockTransport>> {
        SessionManager::new(
            transport,
            Url::parse("https://bsky.social").unwrap(),
            Credentials {
                identifier: "bot.example".into(),
                password: "app-password".into(),
            },
        )
    }

    #[tokio::test]
    async fn test_first_call_authenticates_once() {
        let transport = Arc::new(MockTransport::new());
        let manager = manager(transport.clone());

        let response = manager.execute(XrpcRequest::query(TEST_NSID, vec![])).await.unwrap();
        assert!(response.status.is_success());
        assert_eq!(transport.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 0);

        // Second call reuses the session.
        manager.execute(XrpcRequest::query(TEST_NSID, vec![])).await.unwrap();
        assert_eq!(transport.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_token_refreshes_and_retries_once() {
        // Generation 0 (from the initial login) reads as expired.
        let transport = Arc::new(MockTransport::new().expire_below(1));
        let manager = manager(transport.clone());

        let response = manager.execute(XrpcRequest::query(TEST_NSID, vec![])).await.unwrap();
        assert!(response.status.is_success());
        assert_eq!(transport.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_falls_back_to_login() {
        let transport = Arc::new(MockTransport::new().expire_below(1).reject_refresh());
        let manager = manager(transport.clone());

        let response = manager.execute(XrpcRequest::query(TEST_NSID, vec![])).await.unwrap();
        assert!(response.status.is_success());
        // Initial login, then the fallback login after the rejected refresh.
        assert_eq!(transport.create_calls.load(Ordering::SeqCst), 2);
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_persistent_unauthorized_surfaces_auth_error() {
        // No generation is ever accepted.
        let transport = Arc::new(MockTransport::new().expire_below(usize::MAX));
        let manager = manager(transport.clone());

        let err = manager
            .execute(XrpcRequest::query(TEST_NSID, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth { .. }));
        // Exactly one refresh and one retry, no loop.
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_fatal() {
        let transport = Arc::new(MockTransport::new().reject_credentials());
        let manager = manager(transport.clone());

        let err = manager
            .execute(XrpcRequest::query(TEST_NSID, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth { .. }));
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_expiry_refreshes_single_flight() {
        let transport = Arc::new(MockTransport::new().expire_below(1));
        let manager = Arc::new(manager(transport.clone()));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let manager = manager.clone();
            tasks.push(tokio::spawn(async move {
                manager.execute(XrpcRequest::query(TEST_NSID, vec![])).await
            }));
        }
        for task in tasks {
            let response = task.await.unwrap().unwrap();
            assert!(response.status.is_success());
        }

        // One login and one refresh serve all sixteen callers.
        assert_eq!(transport.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    }
}

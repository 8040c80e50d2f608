//! Session lifecycle and thread fetching against the Bluesky XRPC API.
//!
//! The [`SessionManager`] owns the token pair and refreshes it behind a
//! single-flight gate; the [`PostThreadFetcher`] resolves handles and
//! fetches post threads through it. Transport is injected via the
//! [`client::Transport`] trait so tests can run without a network.

pub mod client;
pub mod error;
pub mod fetcher;
pub mod session;
pub mod telemetry;

pub use client::{ReqwestTransport, Transport, XrpcRequest, XrpcResponse};
pub use error::Error;
pub use fetcher::{parse_post_url, PostThreadFetcher};
pub use session::{Credentials, SessionManager};

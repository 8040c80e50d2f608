//! `com.atproto.identity` records.

use serde::Deserialize;

pub const RESOLVE_HANDLE: &str = "com.atproto.identity.resolveHandle";

/// Result of resolving a human-readable handle to its durable DID.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveHandleResponse {
    pub did: String,
}

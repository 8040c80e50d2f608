//! `com.atproto.server` session records.

use serde::{Deserialize, Serialize};

pub const CREATE_SESSION: &str = "com.atproto.server.createSession";
pub const REFRESH_SESSION: &str = "com.atproto.server.refreshSession";

/// Body of a `createSession` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub identifier: String,
    pub password: String,
}

/// Token pair returned by `createSession` and `refreshSession`.
///
/// Replaced wholesale on every refresh or re-authentication.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_jwt: String,
    pub refresh_jwt: String,
    pub handle: String,
    pub did: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_session() {
        let json = r#"{
            "accessJwt": "access.jwt.token",
            "refreshJwt": "refresh.jwt.token",
            "handle": "alice.bsky.social",
            "did": "did:plc:abc123"
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_jwt, "access.jwt.token");
        assert_eq!(session.refresh_jwt, "refresh.jwt.token");
        assert_eq!(session.handle, "alice.bsky.social");
        assert_eq!(session.did, "did:plc:abc123");
    }

    #[test]
    fn test_serialize_create_session_request() {
        let request = CreateSessionRequest {
            identifier: "alice.bsky.social".into(),
            password: "app-password".into(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["identifier"], "alice.bsky.social");
        assert_eq!(json["password"], "app-password");
    }
}

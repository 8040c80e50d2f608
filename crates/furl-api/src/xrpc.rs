//! XRPC error envelope.

use serde::Deserialize;

/// Error name carried by responses whose access token has lapsed. Some
/// endpoints report this with a 400 rather than a 401.
pub const EXPIRED_TOKEN: &str = "ExpiredToken";

/// Body of a non-success XRPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct XrpcErrorResponse {
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl XrpcErrorResponse {
    pub fn is_expired_token(&self) -> bool {
        self.error == EXPIRED_TOKEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_token_envelope() {
        let json = r#"{"error": "ExpiredToken", "message": "Token has expired"}"#;
        let envelope: XrpcErrorResponse = serde_json::from_str(json).unwrap();
        assert!(envelope.is_expired_token());
        assert_eq!(envelope.message.as_deref(), Some("Token has expired"));
    }

    #[test]
    fn test_envelope_without_message() {
        let json = r#"{"error": "NotFound"}"#;
        let envelope: XrpcErrorResponse = serde_json::from_str(json).unwrap();
        assert!(!envelope.is_expired_token());
        assert_eq!(envelope.message, None);
    }
}

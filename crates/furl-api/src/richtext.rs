//! `app.bsky.richtext` facets.
//!
//! Facet offsets address the UTF-8 *byte* representation of the owning
//! post's text, not char indices. Slicing by chars corrupts any text with
//! multi-byte code points ahead of a facet.

use serde::{Deserialize, Deserializer};

/// Byte range into a post's UTF-8 text, `[byte_start, byte_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

impl ByteSlice {
    pub fn new(byte_start: usize, byte_end: usize) -> Self {
        Self {
            byte_start,
            byte_end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.byte_start >= self.byte_end
    }
}

/// A rich-text annotation over a byte range of the post text.
#[derive(Debug, Clone, Deserialize)]
pub struct Facet {
    pub index: ByteSlice,
    #[serde(default)]
    pub features: Vec<FacetFeature>,
}

impl Facet {
    /// The facet's link target, if any feature carries a non-empty URI.
    pub fn link_uri(&self) -> Option<&str> {
        self.features.iter().find_map(|f| match f {
            FacetFeature::Link { uri } if !uri.is_empty() => Some(uri.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FacetFeature {
    Link { uri: String },
    Mention { did: String },
    Tag { tag: String },
    Unknown(serde_json::Value),
}

impl<'de> Deserialize<'de> for FacetFeature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };

        let feature = match value.get("$type").and_then(serde_json::Value::as_str) {
            Some("app.bsky.richtext.facet#link") => FacetFeature::Link { uri: field("uri") },
            Some("app.bsky.richtext.facet#mention") => {
                FacetFeature::Mention { did: field("did") }
            }
            Some("app.bsky.richtext.facet#tag") => FacetFeature::Tag { tag: field("tag") },
            _ => FacetFeature::Unknown(value),
        };
        Ok(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_link_facet() {
        let json = r#"{
            "index": {"byteStart": 6, "byteEnd": 10},
            "features": [
                {"$type": "app.bsky.richtext.facet#link", "uri": "https://example.com"}
            ]
        }"#;

        let facet: Facet = serde_json::from_str(json).unwrap();
        assert_eq!(facet.index.byte_start, 6);
        assert_eq!(facet.index.byte_end, 10);
        assert_eq!(facet.link_uri(), Some("https://example.com"));
    }

    #[test]
    fn test_mention_facet_is_not_link_like() {
        let json = r#"{
            "index": {"byteStart": 0, "byteEnd": 5},
            "features": [
                {"$type": "app.bsky.richtext.facet#mention", "did": "did:plc:abc123"}
            ]
        }"#;

        let facet: Facet = serde_json::from_str(json).unwrap();
        assert!(matches!(
            facet.features[0],
            FacetFeature::Mention { ref did } if did == "did:plc:abc123"
        ));
        assert_eq!(facet.link_uri(), None);
    }

    #[test]
    fn test_unknown_feature_is_tolerated() {
        let json = r#"{
            "index": {"byteStart": 0, "byteEnd": 3},
            "features": [
                {"$type": "app.bsky.richtext.facet#somethingNew", "extra": true}
            ]
        }"#;

        let facet: Facet = serde_json::from_str(json).unwrap();
        assert!(matches!(facet.features[0], FacetFeature::Unknown(_)));
        assert_eq!(facet.link_uri(), None);
    }

    #[test]
    fn test_empty_uri_is_not_link_like() {
        let facet = Facet {
            index: ByteSlice::new(0, 4),
            features: vec![FacetFeature::Link { uri: String::new() }],
        };
        assert_eq!(facet.link_uri(), None);
    }
}

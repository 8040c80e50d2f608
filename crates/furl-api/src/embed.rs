//! `app.bsky.embed` views.
//!
//! The hydrated embed of a post view is a `$type`-tagged union with exactly
//! one active case per node. Unrecognized cases deserialize into `Unknown`
//! and are skipped by the renderer rather than failing the whole post.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::feed::{Author, Post};

/// Hydrated embed attached to a post view.
#[derive(Debug, Clone)]
pub enum EmbedView {
    External(ExternalView),
    Images(ImagesView),
    Video(VideoView),
    Record(RecordView),
    RecordWithMedia(RecordWithMediaView),
    Unknown(serde_json::Value),
}

impl<'de> Deserialize<'de> for EmbedView {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value
            .get("$type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();

        match tag.as_str() {
            "app.bsky.embed.external#view" => serde_json::from_value(value)
                .map(EmbedView::External)
                .map_err(D::Error::custom),
            "app.bsky.embed.images#view" => serde_json::from_value(value)
                .map(EmbedView::Images)
                .map_err(D::Error::custom),
            "app.bsky.embed.video#view" => serde_json::from_value(value)
                .map(EmbedView::Video)
                .map_err(D::Error::custom),
            "app.bsky.embed.record#view" => serde_json::from_value(value)
                .map(EmbedView::Record)
                .map_err(D::Error::custom),
            "app.bsky.embed.recordWithMedia#view" => serde_json::from_value(value)
                .map(EmbedView::RecordWithMedia)
                .map_err(D::Error::custom),
            _ => Ok(EmbedView::Unknown(value)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalView {
    pub external: External,
}

/// Link card: uri, title, description, optional thumbnail.
#[derive(Debug, Clone, Deserialize)]
pub struct External {
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesView {
    pub images: Vec<ImageView>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub thumb: String,
    pub fullsize: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub playlist: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

/// `app.bsky.embed.record#view` payload: a quoted record.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordView {
    pub record: ViewRecord,
}

/// A quoted record plus its own media, distinct from the quote's embeds.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordWithMediaView {
    pub record: RecordView,
    pub media: Box<EmbedView>,
}

/// The quoted record itself.
///
/// `uri` can arrive empty on degenerate upstream shapes; in that case the
/// nested `record` envelope, when present, is the only usable reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewRecord {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub value: Option<Post>,
    #[serde(default)]
    pub embeds: Vec<EmbedView>,
    #[serde(default)]
    pub record: Option<Box<RecordView>>,
}

impl ViewRecord {
    pub fn author_handle(&self) -> &str {
        self.author.as_ref().map(|a| a.handle.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_external_view() {
        let json = r#"{
            "$type": "app.bsky.embed.external#view",
            "external": {
                "uri": "https://example.com",
                "title": "Example",
                "description": "desc",
                "thumb": "https://cdn.example/thumb.jpg"
            }
        }"#;

        let embed: EmbedView = serde_json::from_str(json).unwrap();
        let EmbedView::External(view) = embed else {
            panic!("expected external view");
        };
        assert_eq!(view.external.uri, "https://example.com");
        assert_eq!(view.external.thumb.as_deref(), Some("https://cdn.example/thumb.jpg"));
    }

    #[test]
    fn test_deserialize_images_view() {
        let json = r#"{
            "$type": "app.bsky.embed.images#view",
            "images": [
                {"thumb": "t1", "fullsize": "f1", "alt": "first"},
                {"thumb": "t2", "fullsize": "f2", "alt": "", "aspectRatio": {"width": 4, "height": 3}}
            ]
        }"#;

        let embed: EmbedView = serde_json::from_str(json).unwrap();
        let EmbedView::Images(view) = embed else {
            panic!("expected images view");
        };
        assert_eq!(view.images.len(), 2);
        assert_eq!(view.images[0].alt, "first");
        assert_eq!(
            view.images[1].aspect_ratio,
            Some(AspectRatio {
                width: 4,
                height: 3
            })
        );
    }

    #[test]
    fn test_deserialize_record_with_media_view() {
        let json = r#"{
            "$type": "app.bsky.embed.recordWithMedia#view",
            "record": {
                "record": {
                    "uri": "at://did:plc:abc/app.bsky.feed.post/xyz",
                    "author": {"handle": "bob.bsky.social"},
                    "value": {"text": "quoted"}
                }
            },
            "media": {
                "$type": "app.bsky.embed.images#view",
                "images": [{"thumb": "t", "fullsize": "f", "alt": "a"}]
            }
        }"#;

        let embed: EmbedView = serde_json::from_str(json).unwrap();
        let EmbedView::RecordWithMedia(view) = embed else {
            panic!("expected recordWithMedia view");
        };
        assert_eq!(view.record.record.author_handle(), "bob.bsky.social");
        assert!(matches!(*view.media, EmbedView::Images(_)));
    }

    #[test]
    fn test_unknown_embed_type_is_tolerated() {
        let json = r#"{"$type": "app.bsky.embed.somethingNew#view", "payload": 1}"#;
        let embed: EmbedView = serde_json::from_str(json).unwrap();
        assert!(matches!(embed, EmbedView::Unknown(_)));
    }

    #[test]
    fn test_missing_type_tag_is_unknown() {
        let embed: EmbedView = serde_json::from_str(r#"{"images": []}"#).unwrap();
        assert!(matches!(embed, EmbedView::Unknown(_)));
    }
}

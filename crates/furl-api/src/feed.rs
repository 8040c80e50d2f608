//! `app.bsky.feed` thread views.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::embed::EmbedView;
use crate::richtext::Facet;

pub const GET_POST_THREAD: &str = "app.bsky.feed.getPostThread";

/// The collection a post record lives in; used to build its AT-URI.
pub const POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub did: Option<String>,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// The post record: text, creation time and rich-text facets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub facets: Vec<Facet>,
}

/// A hydrated post: the record plus author identity and resolved embed.
#[derive(Debug, Clone, Deserialize)]
pub struct PostView {
    pub uri: String,
    pub author: Author,
    pub record: Post,
    #[serde(default)]
    pub embed: Option<EmbedView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadViewPost {
    pub post: PostView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPostThreadResponse {
    pub thread: ThreadViewPost,
}

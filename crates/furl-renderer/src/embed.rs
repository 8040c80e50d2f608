//! Embed resolution: walk a post's hydrated embed tree and produce a
//! flat, ordered list of render nodes.
//!
//! Ordering is part of the contract (banner, author/body, the shared
//! link, media, then quoted context), matching how the upstream network
//! composes a post visually. Quote recursion is capped at one nested
//! level: anything the quoted post quotes in turn degrades to a bare
//! link rather than rendering in full.

use url::Url;

use furl_api::embed::{EmbedView, External, ImageView, VideoView, ViewRecord};
use furl_api::feed::{Author, GetPostThreadResponse, Post};

use crate::facet::{mrkdwn_escape, render_faceted_mrkdwn};

/// Abstract, presentation-ready node. The block layer maps these onto
/// Slack primitives without further decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Banner,
    AuthorText {
        author_line: String,
        body: String,
        nested: bool,
    },
    LinkContext {
        hostname: String,
    },
    LinkPreview {
        uri: String,
        title: String,
        description: String,
        thumb: Option<String>,
    },
    Image {
        uri: String,
        alt: String,
    },
    VideoPlaceholder {
        thumb: Option<String>,
        alt: Option<String>,
    },
    QuoteLinkStub {
        url: String,
    },
}

/// Resolve a fetched thread into its ordered render nodes.
///
/// Deterministic and total: malformed or unknown embeds degrade to fewer
/// nodes, never to an error.
pub fn resolve_thread(thread: &GetPostThreadResponse) -> Vec<RenderNode> {
    let post = &thread.thread.post;

    let mut nodes = vec![RenderNode::Banner];
    nodes.push(RenderNode::AuthorText {
        author_line: author_line(Some(&post.author)),
        body: faceted_body(&post.record),
        nested: false,
    });

    match &post.embed {
        Some(EmbedView::External(view)) => push_external(&mut nodes, &view.external),
        Some(EmbedView::Images(view)) => push_images(&mut nodes, &view.images),
        Some(EmbedView::Video(view)) => push_video(&mut nodes, view),
        Some(EmbedView::Record(view)) => resolve_quote(&mut nodes, &view.record),
        Some(EmbedView::RecordWithMedia(view)) => {
            // The attached media renders strictly before the quoted context.
            push_media(&mut nodes, &view.media);
            resolve_quote(&mut nodes, &view.record.record);
        }
        Some(EmbedView::Unknown(_)) | None => {}
    }

    nodes
}

/// Media half of a recordWithMedia embed.
fn push_media(nodes: &mut Vec<RenderNode>, media: &EmbedView) {
    match media {
        EmbedView::External(view) => push_external(nodes, &view.external),
        EmbedView::Images(view) => push_images(nodes, &view.images),
        EmbedView::Video(view) => push_video(nodes, view),
        _ => {}
    }
}

fn push_external(nodes: &mut Vec<RenderNode>, external: &External) {
    nodes.push(RenderNode::LinkContext {
        hostname: hostname_of(&external.uri),
    });
    nodes.push(RenderNode::LinkPreview {
        uri: external.uri.clone(),
        title: external.title.clone(),
        description: external.description.clone(),
        thumb: external.thumb.clone(),
    });
}

fn push_images(nodes: &mut Vec<RenderNode>, images: &[ImageView]) {
    for image in images {
        nodes.push(RenderNode::Image {
            uri: image.thumb.clone(),
            alt: image.alt.clone(),
        });
    }
}

/// Video never plays in the target presentation; it degrades to a still
/// placeholder.
fn push_video(nodes: &mut Vec<RenderNode>, video: &VideoView) {
    nodes.push(RenderNode::VideoPlaceholder {
        thumb: video.thumbnail.clone(),
        alt: video.alt.clone(),
    });
}

/// Render the quoted post: a nested author/body pair plus a bounded look
/// at its own embeds.
fn resolve_quote(nodes: &mut Vec<RenderNode>, quote: &ViewRecord) {
    if quote.uri.is_empty() {
        // Degenerate double-wrapped shape: the only usable reference sits
        // one level further down and is worth no more than a bare link.
        if let Some(inner) = quote.record.as_deref() {
            if let Some(url) = record_web_url(&inner.record) {
                nodes.push(RenderNode::QuoteLinkStub { url });
            }
        }
        return;
    }

    let body = quote.value.as_ref().map(faceted_body).unwrap_or_default();
    nodes.push(RenderNode::AuthorText {
        author_line: author_line(quote.author.as_ref()),
        body,
        nested: true,
    });

    // The quoted post's own embeds, not recursed further. A nested record
    // wins over a nested external and degrades to a link; media carried by
    // any sub-embed is kept.
    let mut stub: Option<String> = None;
    let mut external: Option<&External> = None;
    let mut images: Vec<&ImageView> = Vec::new();
    let mut video: Option<&VideoView> = None;

    for embed in &quote.embeds {
        match embed {
            EmbedView::Record(view) => {
                if stub.is_none() {
                    stub = record_web_url(&view.record);
                }
            }
            EmbedView::RecordWithMedia(view) => {
                if stub.is_none() {
                    stub = record_web_url(&view.record.record);
                }
                match view.media.as_ref() {
                    EmbedView::Images(media) => images.extend(&media.images),
                    EmbedView::Video(media) => {
                        if video.is_none() {
                            video = Some(media);
                        }
                    }
                    _ => {}
                }
            }
            EmbedView::External(view) => {
                if external.is_none() {
                    external = Some(&view.external);
                }
            }
            EmbedView::Images(view) => images.extend(&view.images),
            EmbedView::Video(view) => {
                if video.is_none() {
                    video = Some(view);
                }
            }
            EmbedView::Unknown(_) => {}
        }
    }

    if let Some(url) = stub {
        nodes.push(RenderNode::QuoteLinkStub { url });
    } else if let Some(external) = external {
        push_external(nodes, external);
    }
    for image in images {
        nodes.push(RenderNode::Image {
            uri: image.thumb.clone(),
            alt: image.alt.clone(),
        });
    }
    if let Some(video) = video {
        push_video(nodes, video);
    }
}

/// Author line: bold profile link over the display name (falling back to
/// the handle), followed by the plain handle.
fn author_line(author: Option<&Author>) -> String {
    let Some(author) = author else {
        return String::new();
    };
    let name = author
        .display_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(&author.handle);
    format!(
        "*<https://bsky.app/profile/{}|{}>* (@{})",
        author.handle,
        mrkdwn_escape(name),
        author.handle
    )
}

fn faceted_body(post: &Post) -> String {
    render_faceted_mrkdwn(&post.text, &post.facets)
        .unwrap_or_else(|_| mrkdwn_escape(&post.text))
}

/// Web URL for a quoted record, built from the author handle and the
/// AT-URI's record key.
fn record_web_url(record: &ViewRecord) -> Option<String> {
    if record.uri.is_empty() {
        return None;
    }
    let rkey = record.uri.rsplit('/').next()?;
    let handle = record.author_handle();
    if handle.is_empty() {
        return None;
    }
    Some(format!("https://bsky.app/profile/{handle}/post/{rkey}"))
}

/// Hostname for the link-context line; degrades to the raw URI when it
/// does not parse.
fn hostname_of(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .unwrap_or_else(|| uri.to_owned())
}

//! Slack Block Kit mapping.
//!
//! A total, stateless mapping from render nodes to block values. The only
//! 1:N case is `AuthorText`, which becomes an author-line section and a
//! body section.

use serde::Serialize;

use crate::embed::RenderNode;
use crate::facet::mrkdwn_escape;

pub const BANNER_ICON_URL: &str = "https://bsky.app/static/apple-touch-icon.png";
pub const BANNER_LABEL: &str = "Bluesky Social";

/// Slack mrkdwn quote marker, applied per block since quote formatting
/// does not span blocks.
const QUOTE_MARKER: &str = ">>> ";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: TextObject,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
    Image {
        image_url: String,
        alt_text: String,
    },
    Context {
        elements: Vec<ContextElement>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    Mrkdwn { text: String },
    PlainText { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextElement {
    Image { image_url: String, alt_text: String },
    Mrkdwn { text: String },
    PlainText { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Image { image_url: String, alt_text: String },
}

fn section(text: String) -> Block {
    Block::Section {
        text: TextObject::Mrkdwn { text },
        accessory: None,
    }
}

/// Map resolved render nodes onto Slack blocks.
pub fn render_blocks(nodes: &[RenderNode]) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(nodes.len() + 1);

    for node in nodes {
        match node {
            RenderNode::Banner => blocks.push(Block::Context {
                elements: vec![
                    ContextElement::Image {
                        image_url: BANNER_ICON_URL.into(),
                        alt_text: "Bluesky Social logo".into(),
                    },
                    ContextElement::Mrkdwn {
                        text: BANNER_LABEL.into(),
                    },
                ],
            }),
            RenderNode::AuthorText {
                author_line,
                body,
                nested,
            } => {
                let marker = if *nested { QUOTE_MARKER } else { "" };
                blocks.push(section(format!("{marker}{author_line}")));
                // Slack rejects empty section text.
                if !body.is_empty() {
                    blocks.push(section(format!("{marker}{body}")));
                }
            }
            RenderNode::LinkContext { hostname } => blocks.push(Block::Context {
                elements: vec![ContextElement::PlainText {
                    text: hostname.clone(),
                }],
            }),
            RenderNode::LinkPreview {
                uri,
                title,
                description,
                thumb,
            } => {
                let label = if title.is_empty() { uri } else { title };
                let mut text = format!("*<{}|{}>*", uri, mrkdwn_escape(label));
                if !description.is_empty() {
                    text.push('\n');
                    text.push_str(&mrkdwn_escape(description));
                }
                blocks.push(Block::Section {
                    text: TextObject::Mrkdwn { text },
                    accessory: thumb.as_ref().map(|thumb| Accessory::Image {
                        image_url: thumb.clone(),
                        alt_text: label.clone(),
                    }),
                });
            }
            RenderNode::Image { uri, alt } => blocks.push(Block::Image {
                image_url: uri.clone(),
                alt_text: alt.clone(),
            }),
            RenderNode::VideoPlaceholder { thumb, alt } => match thumb {
                Some(thumb) => blocks.push(Block::Image {
                    image_url: thumb.clone(),
                    alt_text: alt.clone().unwrap_or_else(|| "Video".into()),
                }),
                None => blocks.push(Block::Context {
                    elements: vec![ContextElement::PlainText {
                        text: "Video".into(),
                    }],
                }),
            },
            RenderNode::QuoteLinkStub { url } => {
                blocks.push(section(format!("{QUOTE_MARKER}<{url}|{url}>")));
            }
        }
    }

    blocks
}

use std::fmt::Write;

use furl_api::richtext::Facet;

use super::types::normalize_link_facets;
use super::{process_link_facets, FacetOutput};

/// Slack mrkdwn sink. Escapes the three characters Slack requires
/// (`&`, `<`, `>`) as it writes and emits `<uri|label>` link tokens.
pub struct MrkdwnFacetOutput<W: Write> {
    writer: W,
}

impl<W: Write> MrkdwnFacetOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FacetOutput for MrkdwnFacetOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        write_escaped(&mut self.writer, text)
    }

    fn write_link(&mut self, uri: &str, label: &str) -> Result<(), Self::Error> {
        self.writer.write_char('<')?;
        // `|` and `>` terminate the token early; percent-encode them.
        for c in uri.chars() {
            match c {
                '|' => self.writer.write_str("%7C")?,
                '>' => self.writer.write_str("%3E")?,
                _ => self.writer.write_char(c)?,
            }
        }
        self.writer.write_char('|')?;
        write_escaped(&mut self.writer, label)?;
        self.writer.write_char('>')
    }
}

fn write_escaped<W: Write>(writer: &mut W, text: &str) -> std::fmt::Result {
    for c in text.chars() {
        match c {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            _ => writer.write_char(c)?,
        }
    }
    Ok(())
}

/// Escape a standalone string for inclusion in mrkdwn text.
pub fn mrkdwn_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = write_escaped(&mut out, text);
    out
}

/// Render a post's text with its link facets substituted as mrkdwn links.
pub fn render_faceted_mrkdwn(text: &str, facets: &[Facet]) -> Result<String, std::fmt::Error> {
    let links = normalize_link_facets(facets);
    let mut output = MrkdwnFacetOutput::new(String::new());
    process_link_facets(text, &links, &mut output)?;
    Ok(output.into_inner())
}

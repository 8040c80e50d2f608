mod mrkdwn_output;
mod processor;
mod types;

pub use mrkdwn_output::{mrkdwn_escape, render_faceted_mrkdwn, MrkdwnFacetOutput};
pub use processor::process_link_facets;
pub use types::{normalize_link_facets, LinkFacet};

/// Sink for the facet walk: verbatim text runs and link substitutions.
pub trait FacetOutput {
    type Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
    fn write_link(&mut self, uri: &str, label: &str) -> Result<(), Self::Error>;
}

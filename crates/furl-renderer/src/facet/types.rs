use furl_api::richtext::{ByteSlice, Facet};

/// A link-like facet: the byte range plus the URI it wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFacet<'a> {
    pub range: ByteSlice,
    pub uri: &'a str,
}

/// Pull the link-like facets out of a post's facet list, sorted ascending
/// by start offset. Facets without a link feature are dropped here; range
/// validation happens during the walk.
pub fn normalize_link_facets(facets: &[Facet]) -> Vec<LinkFacet<'_>> {
    let mut links: Vec<LinkFacet<'_>> = facets
        .iter()
        .filter(|facet| !facet.index.is_empty())
        .filter_map(|facet| {
            facet.link_uri().map(|uri| LinkFacet {
                range: facet.index,
                uri,
            })
        })
        .collect();
    links.sort_by_key(|link| (link.range.byte_start, link.range.byte_end));
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use furl_api::richtext::FacetFeature;

    fn link(start: usize, end: usize, uri: &str) -> Facet {
        Facet {
            index: ByteSlice::new(start, end),
            features: vec![FacetFeature::Link { uri: uri.into() }],
        }
    }

    #[test]
    fn test_normalize_sorts_by_start() {
        let facets = vec![link(10, 14, "https://b"), link(0, 4, "https://a")];
        let links = normalize_link_facets(&facets);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].uri, "https://a");
        assert_eq!(links[1].uri, "https://b");
    }

    #[test]
    fn test_normalize_drops_non_links_and_empty_ranges() {
        let facets = vec![
            Facet {
                index: ByteSlice::new(0, 5),
                features: vec![FacetFeature::Tag { tag: "rust".into() }],
            },
            link(5, 5, "https://empty-range"),
            link(6, 10, "https://kept"),
        ];
        let links = normalize_link_facets(&facets);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].uri, "https://kept");
    }
}
